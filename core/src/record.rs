use std::fmt::Write as _;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::schema;
use crate::session::SessionCache;

/// One parsed combat log line: the resolved wall-clock time, the event-type
/// name, and every raw field value in log order (unit keys included).
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub timestamp: NaiveDateTime,
    pub event_type: String,
    pub fields: Vec<String>,
}

impl EventRecord {
    /// Positional field access.
    pub fn field_at(&self, index: usize) -> Result<&str> {
        self.fields
            .get(index)
            .map(String::as_str)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.fields.len(),
            })
    }

    /// Name-based field access through this event's schema. Unit-key names
    /// (`source_guid`, `dest_name`, ...) resolve whenever the event carries
    /// the unit key block.
    pub fn field(&self, name: &str) -> Result<&str> {
        let index =
            schema::field_index(&self.event_type, name).ok_or_else(|| Error::UnknownField {
                event: self.event_type.clone(),
                field: name.to_string(),
            })?;
        self.field_at(index)
    }

    /// Human-readable dump of every field. GUID values the session has seen
    /// a name for are annotated with that name.
    pub fn render(&self, cache: &SessionCache) -> String {
        let mut out = self.render_heading();
        for (index, value) in self.fields.iter().enumerate() {
            self.push_field_line(&mut out, cache, index, value);
        }
        out
    }

    /// Like [`render`](Self::render), but only the given field indexes.
    pub fn render_fields(&self, cache: &SessionCache, indexes: &[usize]) -> Result<String> {
        let mut out = self.render_heading();
        for &index in indexes {
            self.push_field_line(&mut out, cache, index, self.field_at(index)?);
        }
        Ok(out)
    }

    fn render_heading(&self) -> String {
        format!(
            "({}) Event: {}\n",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.event_type
        )
    }

    fn push_field_line(&self, out: &mut String, cache: &SessionCache, index: usize, value: &str) {
        // Infallible for String.
        let _ = match cache.unit_name(value) {
            Some(name) => writeln!(out, "    {index}: {value} ({name})"),
            None => writeln!(out, "    {index}: {value}"),
        };
    }
}
