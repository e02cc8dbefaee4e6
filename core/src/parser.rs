use chrono::{NaiveDate, NaiveDateTime};
use memchr::memchr_iter;

use crate::error::{Error, Result};

/// Wall-clock fields exactly as the log header carries them. The log omits
/// the year, so [`LogTimestamp::resolve`] combines these with a reference
/// year supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTimestamp {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
}

impl LogTimestamp {
    /// Absolute local wall-clock time. `None` when the fields do not form a
    /// valid date in the given year.
    pub fn resolve(&self, year: i32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)?.and_hms_milli_opt(
            self.hour,
            self.minute,
            self.second,
            self.millis,
        )
    }
}

/// Split one raw line into (timestamp, event-type name, raw field values).
///
/// Grammar: `M/D HH:MM:SS.mmm  EVENT_NAME,field0,...,fieldN` — two literal
/// spaces separate the header from the event body. A comma terminates a
/// field only outside double quotes; a wrapping quote pair is stripped from
/// the stored value. Any deviation fails with [`Error::MalformedLine`]
/// carrying the offending line.
pub fn tokenize_line(line: &str) -> Result<(LogTimestamp, &str, Vec<String>)> {
    let malformed = || Error::MalformedLine {
        line: line.to_string(),
    };

    let sep = find_double_space(line.as_bytes()).ok_or_else(malformed)?;
    let timestamp = parse_header(&line[..sep]).ok_or_else(malformed)?;

    let body = &line[sep + 2..];
    let comma = body.find(',').ok_or_else(malformed)?;
    let event = &body[..comma];
    let rest = &body[comma + 1..];
    if event.is_empty()
        || rest.is_empty()
        || !event.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        return Err(malformed());
    }

    Ok((timestamp, event, split_fields(rest)))
}

fn find_double_space(bytes: &[u8]) -> Option<usize> {
    memchr_iter(b' ', bytes).find(|&i| bytes.get(i + 1) == Some(&b' '))
}

// `M/D HH:MM:SS.mmm` with 1-2 digit month/day and fixed-width time-of-day.
fn parse_header(header: &str) -> Option<LogTimestamp> {
    let (date, time) = header.split_once(' ')?;
    let (month, day) = date.split_once('/')?;

    let t = time.as_bytes();
    if t.len() != 12 || t[2] != b':' || t[5] != b':' || t[8] != b'.' {
        return None;
    }

    Some(LogTimestamp {
        month: short_number(month)?,
        day: short_number(day)?,
        hour: digits(&t[0..2])?,
        minute: digits(&t[3..5])?,
        second: digits(&t[6..8])?,
        millis: digits(&t[9..12])?,
    })
}

fn short_number(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 {
        return None;
    }
    digits(s.as_bytes())
}

fn digits(bytes: &[u8]) -> Option<u32> {
    let mut value = 0u32;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(b - b'0');
    }
    Some(value)
}

// Character walk with an in-quote toggle; the final field is terminated by
// end of line rather than a comma.
fn split_fields(body: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut in_quote = false;
    let mut start = 0;

    for (i, ch) in body.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            ',' if !in_quote => {
                fields.push(strip_quotes(&body[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(strip_quotes(&body[start..]));

    fields
}

// Strips exactly one wrapping quote pair: `"Invoke Xuen, the White Tiger"`
// becomes `Invoke Xuen, the White Tiger`. Unquoted values are stored as-is.
fn strip_quotes(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMON_LINE: &str = r#"4/9 07:38:46.299  SPELL_SUMMON,Player-61-07B7D5D6,"Kildonne-Zul'jin",0x511,0x0,Creature-0-3019-1153-26151-73967-000008E9BF,"Xuen",0xa28,0x0,132578,"Invoke Xuen, the White Tiger",0x8"#;

    #[test]
    fn quoted_field_keeps_embedded_comma() {
        assert_eq!(split_fields(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn wrapping_quotes_stripped_once() {
        assert_eq!(strip_quotes(r#"""x"""#), r#""x""#);
        assert_eq!(strip_quotes(r#" "Xuen" "#), "Xuen");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn summon_line_tokenizes() {
        let (ts, event, fields) = tokenize_line(SUMMON_LINE).unwrap();
        assert_eq!(event, "SPELL_SUMMON");
        assert_eq!(fields.len(), 11);
        assert_eq!(fields[8], "132578");
        assert_eq!(fields[9], "Invoke Xuen, the White Tiger");
        assert_eq!(fields[10], "0x8");
        assert_eq!(
            ts,
            LogTimestamp {
                month: 4,
                day: 9,
                hour: 7,
                minute: 38,
                second: 46,
                millis: 299,
            }
        );
    }

    #[test]
    fn two_digit_month_and_day() {
        let (ts, _, _) = tokenize_line("12/31 23:59:59.999  UNIT_DIED,a,b,c,d,e,f,g,h").unwrap();
        assert_eq!((ts.month, ts.day), (12, 31));
    }

    #[test]
    fn missing_double_space_is_malformed() {
        let line = "4/9 07:38:46.299 SPELL_SUMMON,a,b";
        match tokenize_line(line) {
            Err(Error::MalformedLine { line: l }) => assert_eq!(l, line),
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn event_name_must_be_word_characters() {
        assert!(tokenize_line("4/9 07:38:46.299  SPELL-SUMMON,a").is_err());
        assert!(tokenize_line("4/9 07:38:46.299  ,a").is_err());
    }

    #[test]
    fn event_body_requires_fields() {
        assert!(tokenize_line("4/9 07:38:46.299  UNIT_DIED").is_err());
        assert!(tokenize_line("4/9 07:38:46.299  UNIT_DIED,").is_err());
    }

    #[test]
    fn blank_line_is_malformed() {
        assert!(tokenize_line("").is_err());
    }

    #[test]
    fn timestamp_resolves_against_reference_year() {
        let (ts, _, _) = tokenize_line(SUMMON_LINE).unwrap();
        let when = ts.resolve(2020).unwrap();
        assert_eq!(when.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2020-04-09 07:38:46.299");
    }

    #[test]
    fn invalid_calendar_date_does_not_resolve() {
        let (ts, _, _) = tokenize_line("2/30 10:00:00.000  UNIT_DIED,a,b,c,d,e,f,g,h").unwrap();
        assert!(ts.resolve(2021).is_none());
    }
}
