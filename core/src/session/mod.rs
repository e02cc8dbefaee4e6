//! The stateful parse session: owns the log path, the derived caches, the
//! dispatcher, and the incremental parse passes over the file.

mod cache;

pub use cache::SessionCache;

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::events;
use crate::parser::tokenize_line;
use crate::record::EventRecord;
use crate::schema::{self, unit_keys};

type Hook<A, R> = Box<dyn FnMut(A) -> R>;

/// A parse session over one combat log file.
///
/// Records flow through a fixed pipeline per line: tokenize, resolve the
/// timestamp, populate the session caches, then dispatch to user handlers.
/// Unknown event types take the unhandled path first and are dispatched all
/// the same, so a handler registered for a name the schema registry has never
/// heard of still fires.
pub struct ParserSession {
    path: PathBuf,
    reference_year: i32,
    skip_malformed: bool,
    skipped_lines: Vec<String>,
    progress: f32,
    parsing: bool,
    cache: SessionCache,
    dispatcher: Dispatcher,
    unhandled: Option<Box<dyn FnMut(&EventRecord, &SessionCache)>>,
    pre_parse: Option<Hook<u64, u64>>,
    post_parse: Option<Hook<u64, ()>>,
}

impl ParserSession {
    /// Bind a session to `path`. Fails with [`Error::LogNotFound`] when the
    /// file does not exist; the reference year defaults to the current local
    /// year since log timestamps do not carry one.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(Error::LogNotFound { path });
        }
        Ok(Self {
            path,
            reference_year: chrono::Local::now().year(),
            skip_malformed: false,
            skipped_lines: Vec::new(),
            progress: 0.0,
            parsing: false,
            cache: SessionCache::default(),
            dispatcher: Dispatcher::default(),
            unhandled: None,
            pre_parse: None,
            post_parse: None,
        })
    }

    pub fn set_reference_year(&mut self, year: i32) {
        self.reference_year = year;
    }

    /// Record malformed lines in [`skipped_lines`](Self::skipped_lines) and
    /// keep parsing instead of failing the pass.
    pub fn set_skip_malformed(&mut self, skip: bool) {
        self.skip_malformed = skip;
    }

    /// Register `handler` for every event-type name in `event_types`.
    pub fn register<F>(&mut self, event_types: &[&str], handler: F)
    where
        F: FnMut(&EventRecord, &SessionCache) + 'static,
    {
        self.dispatcher.register(event_types, handler);
    }

    /// Callback for records whose event type has no schema. Runs before the
    /// regular dispatch of the same record.
    pub fn on_unhandled<F>(&mut self, callback: F)
    where
        F: FnMut(&EventRecord, &SessionCache) + 'static,
    {
        self.unhandled = Some(Box::new(callback));
    }

    /// Hook run at the start of [`parse_to_end`](Self::parse_to_end): given
    /// the current file length, return the offset to start from. Used to
    /// resume a follow loop where the previous pass left off.
    pub fn on_pre_parse<F>(&mut self, hook: F)
    where
        F: FnMut(u64) -> u64 + 'static,
    {
        self.pre_parse = Some(Box::new(hook));
    }

    /// Hook run after [`parse_to_end`](Self::parse_to_end) with the end
    /// offset of the pass.
    pub fn on_post_parse<F>(&mut self, hook: F)
    where
        F: FnMut(u64) + 'static,
    {
        self.post_parse = Some(Box::new(hook));
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Whether any handler is registered for `event_type`.
    pub fn is_routed(&self, event_type: &str) -> bool {
        self.dispatcher.is_routed(event_type)
    }

    /// Fraction of the current pass's byte span consumed so far, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_parsing(&self) -> bool {
        self.parsing
    }

    /// Raw lines skipped across all passes, in file order. Empty unless
    /// skip-malformed is on.
    pub fn skipped_lines(&self) -> &[String] {
        &self.skipped_lines
    }

    /// One full pass: consult the pre-parse hook for the start offset, parse
    /// to the end of file, then report the end offset to the post-parse hook.
    pub fn parse_to_end(&mut self) -> Result<u64> {
        let len = std::fs::metadata(&self.path)?.len();
        let start = match self.pre_parse.as_mut() {
            Some(hook) => hook(len).min(len),
            None => 0,
        };
        let end = self.parse_from(start)?;
        if let Some(hook) = self.post_parse.as_mut() {
            hook(end);
        }
        Ok(end)
    }

    /// Parse from byte offset `start` to the end of the file as it was sized
    /// when the pass opened it. Returns the byte offset after the last line
    /// consumed, suitable as the `start` of a later pass. A final line with
    /// no newline terminator is left unread, so a half-written tail is
    /// re-read whole by the next pass.
    pub fn parse_from(&mut self, start: u64) -> Result<u64> {
        let file = File::open(&self.path)?;
        let total = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(start))?;

        tracing::info!(path = %self.path.display(), start, total, "parse pass starting");
        self.parsing = true;
        self.progress = 0.0;

        let span = total.saturating_sub(start);
        let mut pos = start;
        let mut lines = 0u64;
        let mut line = String::new();

        let outcome = loop {
            if pos >= total {
                break Ok(());
            }
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                break Ok(());
            }
            // A final line still missing its terminator is mid-write; leave
            // it for a later pass so the resume offset stays on a line
            // boundary.
            if !line.ends_with('\n') {
                break Ok(());
            }
            pos += n as u64;
            self.progress = (pos - start) as f32 / span as f32;

            let raw = line.trim_end_matches(['\n', '\r']);
            if raw.is_empty() {
                continue;
            }
            lines += 1;
            match self.handle_line(raw) {
                Ok(()) => {}
                Err(err @ Error::MalformedLine { .. }) if self.skip_malformed => {
                    tracing::warn!(%err, "skipping line");
                    self.skipped_lines.push(raw.to_string());
                }
                Err(err) => break Err(err),
            }
        };

        self.parsing = false;
        match outcome {
            Ok(()) => {
                self.progress = 1.0;
                tracing::info!(lines, end = pos, "parse pass finished");
                Ok(pos)
            }
            Err(err) => Err(err),
        }
    }

    fn handle_line(&mut self, raw: &str) -> Result<()> {
        let (stamp, event, fields) = tokenize_line(raw)?;
        let timestamp = stamp
            .resolve(self.reference_year)
            .ok_or_else(|| Error::MalformedLine {
                line: raw.to_string(),
            })?;
        let record = EventRecord {
            timestamp,
            event_type: event.to_string(),
            fields,
        };

        match schema::get(event) {
            Some(schema) => {
                if schema.has_unit_keys {
                    self.cache_unit_keys(&record);
                }
                self.cache_auras(&record);
            }
            None => {
                tracing::debug!(event, "no schema for event");
                if let Some(callback) = self.unhandled.as_mut() {
                    callback(&record, &self.cache);
                }
            }
        }

        self.dispatcher.dispatch(&record, &self.cache);
        Ok(())
    }

    // The unit key block sits at fixed offsets 0-7 for every event that
    // carries it, regardless of where the event's own named fields start.
    fn cache_unit_keys(&mut self, record: &EventRecord) {
        if record.fields.len() < unit_keys::BLOCK_LEN {
            tracing::warn!(
                event = %record.event_type,
                fields = record.fields.len(),
                "record too short for unit keys"
            );
            return;
        }
        self.cache.learn_unit(
            &record.fields[unit_keys::SOURCE_GUID],
            &record.fields[unit_keys::SOURCE_NAME],
        );
        self.cache.learn_unit(
            &record.fields[unit_keys::DEST_GUID],
            &record.fields[unit_keys::DEST_NAME],
        );
    }

    fn cache_auras(&mut self, record: &EventRecord) {
        if record.event_type != events::SPELL_AURA_APPLIED
            && record.event_type != events::SPELL_AURA_REMOVED
        {
            return;
        }
        let (Ok(id), Ok(name)) = (record.field("aura_spell_id"), record.field("aura_spell_name"))
        else {
            return;
        };
        match id.parse::<u32>() {
            Ok(id) => self.cache.learn_aura(id, name),
            Err(_) => tracing::debug!(
                event = %record.event_type,
                id,
                "aura spell id is not numeric"
            ),
        }
    }
}

impl std::fmt::Debug for ParserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserSession")
            .field("path", &self.path)
            .field("reference_year", &self.reference_year)
            .field("progress", &self.progress)
            .field("parsing", &self.parsing)
            .field("skipped_lines", &self.skipped_lines.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod session_tests;
