//! Parsing core for World of Warcraft combat logs: a quote-aware line
//! tokenizer, a static field-schema registry, ordered per-event dispatch,
//! and an incremental [`ParserSession`] that learns unit and aura names as
//! it reads.

pub mod dispatch;
pub mod error;
pub mod events;
pub mod parser;
pub mod power;
pub mod record;
pub mod schema;
pub mod session;

// Re-exports for convenience
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use parser::{LogTimestamp, tokenize_line};
pub use power::PowerType;
pub use record::EventRecord;
pub use session::{ParserSession, SessionCache};
