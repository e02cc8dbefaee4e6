use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised while opening, tokenizing, or reading back parsed lines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("combat log not found: {}", path.display())]
    LogNotFound { path: PathBuf },

    /// The line does not match the combat-log grammar. Fatal for the current
    /// pass unless the session was told to skip and continue.
    #[error("malformed combat log line: {line:?}")]
    MalformedLine { line: String },

    /// Name-based field access for a name the event's schema does not define.
    /// Signals a handler bug, not a parse fault.
    #[error("event {event} has no field named {field:?}")]
    UnknownField { event: String, field: String },

    /// Positional field access past the end of the record.
    #[error("field index {index} out of range ({len} fields)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
