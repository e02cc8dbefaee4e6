use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::ParserSession;
use crate::error::Error;
use crate::events;

const SUMMON_LINE: &str = "4/9 07:38:46.299  SPELL_SUMMON,Player-61-07B7D5D6,\"Kildonne-Zul'jin\",0x511,0x0,Creature-0-3019-1153-26151-73967-000008E9BF,\"Xuen\",0xa28,0x0,132578,\"Invoke Xuen, the White Tiger\",0x8\n";

fn temp_log(tag: &str, contents: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "wowlog-{tag}-{}-{}.txt",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    fs::write(&path, contents).unwrap();
    path
}

fn append(path: &Path, contents: &str) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

fn build_line(event: &str, fields: &[&str]) -> String {
    format!("4/9 07:38:46.299  {event},{}\n", fields.join(","))
}

fn unit_died(guid: &str, name: &str) -> String {
    build_line(
        events::UNIT_DIED,
        &["0000000000000000", "nil", "0x80000000", "0x80000000", guid, name, "0xa48", "0x0"],
    )
}

fn aura_applied(spell_id: &str, spell_name: &str) -> String {
    build_line(
        events::SPELL_AURA_APPLIED,
        &["Player-1", "\"Alice\"", "0x511", "0x0", "Player-2", "\"Bob\"", "0x511", "0x0", spell_id, spell_name, "0x8", "BUFF"],
    )
}

#[test]
fn summon_line_populates_caches_and_dispatches() {
    let path = temp_log("summon", SUMMON_LINE);
    let mut session = ParserSession::open(&path).unwrap();
    session.set_reference_year(2020);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.register(&[events::SPELL_SUMMON], move |record, cache| {
        assert_eq!(record.fields.len(), 11);
        assert_eq!(record.field_at(8).unwrap(), "132578");
        assert_eq!(record.field("spell_name").unwrap(), "Invoke Xuen, the White Tiger");
        assert_eq!(record.timestamp.format("%Y").to_string(), "2020");
        // Both unit keys were learned before dispatch.
        assert_eq!(cache.unit_name("Player-61-07B7D5D6"), Some("Kildonne-Zul'jin"));
        sink.borrow_mut().push(record.event_type.clone());
    });

    let end = session.parse_from(0).unwrap();
    assert_eq!(end, SUMMON_LINE.len() as u64);
    assert_eq!(session.progress(), 1.0);
    assert!(!session.is_parsing());
    assert_eq!(*seen.borrow(), vec![events::SPELL_SUMMON.to_string()]);
    assert_eq!(
        session.cache().unit_name("Creature-0-3019-1153-26151-73967-000008E9BF"),
        Some("Xuen")
    );
    fs::remove_file(path).unwrap();
}

#[test]
fn unit_keys_cached_at_fixed_offsets_first_seen_wins() {
    let log = format!(
        "{}{}",
        unit_died("Creature-5", "\"Thok the Bloodthirsty\""),
        unit_died("Creature-5", "\"Renamed Thok\"")
    );
    let path = temp_log("unitkeys", &log);
    let mut session = ParserSession::open(&path).unwrap();
    session.parse_from(0).unwrap();

    assert_eq!(session.cache().unit_name("Creature-5"), Some("Thok the Bloodthirsty"));
    assert_eq!(session.cache().unit_name("0000000000000000"), Some("nil"));
    assert_eq!(session.cache().unit_count(), 2);
    fs::remove_file(path).unwrap();
}

#[test]
fn aura_cache_learns_applied_and_removed_names() {
    let log = format!(
        "{}{}{}",
        aura_applied("774", "\"Rejuvenation\""),
        aura_applied("774", "\"Not Rejuvenation\""),
        build_line(
            events::SPELL_AURA_REMOVED,
            &["Player-1", "\"Alice\"", "0x511", "0x0", "Player-2", "\"Bob\"", "0x511", "0x0", "8936", "\"Regrowth\"", "0x8", "BUFF"],
        )
    );
    let path = temp_log("auras", &log);
    let mut session = ParserSession::open(&path).unwrap();
    session.parse_from(0).unwrap();

    assert_eq!(session.cache().aura_name(774), Some("Rejuvenation"));
    assert_eq!(session.cache().aura_name(8936), Some("Regrowth"));
    assert_eq!(session.cache().aura_count(), 2);
    fs::remove_file(path).unwrap();
}

#[test]
fn malformed_line_halts_with_the_offending_line() {
    let bad = "4/9 07:38:46.299 ONLY_ONE_SPACE,a,b";
    let log = format!("{}{bad}\n{}", unit_died("Creature-1", "First"), unit_died("Creature-2", "Second"));
    let path = temp_log("malformed", &log);

    let mut session = ParserSession::open(&path).unwrap();
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    session.register(&[events::UNIT_DIED], move |_, _| *counter.borrow_mut() += 1);

    match session.parse_from(0) {
        Err(Error::MalformedLine { line }) => assert_eq!(line, bad),
        other => panic!("expected MalformedLine, got {other:?}"),
    }
    assert_eq!(*hits.borrow(), 1);
    assert!(!session.is_parsing());
    fs::remove_file(path).unwrap();
}

#[test]
fn skip_malformed_records_the_line_and_continues() {
    let bad = "not a combat log line";
    let log = format!("{}{bad}\n{}", unit_died("Creature-1", "First"), unit_died("Creature-2", "Second"));
    let path = temp_log("skip", &log);

    let mut session = ParserSession::open(&path).unwrap();
    session.set_skip_malformed(true);
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    session.register(&[events::UNIT_DIED], move |_, _| *counter.borrow_mut() += 1);

    session.parse_from(0).unwrap();
    assert_eq!(*hits.borrow(), 2);
    assert_eq!(session.skipped_lines(), [bad.to_string()]);
    fs::remove_file(path).unwrap();
}

#[test]
fn unknown_event_takes_unhandled_path_then_dispatches() {
    let log = build_line("ARENA_MATCH_START", &["1552", "0", "Skirmish", "0"]);
    let path = temp_log("unknown", &log);

    let mut session = ParserSession::open(&path).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&order);
    session.on_unhandled(move |record, _| {
        assert_eq!(record.event_type, "ARENA_MATCH_START");
        sink.borrow_mut().push("unhandled");
    });
    let sink = Rc::clone(&order);
    session.register(&["ARENA_MATCH_START"], move |_, _| {
        sink.borrow_mut().push("handler");
    });

    session.parse_from(0).unwrap();
    assert_eq!(*order.borrow(), vec!["unhandled", "handler"]);
    // No schema means no unit-key extraction.
    assert_eq!(session.cache().unit_count(), 0);
    fs::remove_file(path).unwrap();
}

#[test]
fn invalid_calendar_date_is_malformed() {
    let line = "2/30 10:00:00.000  UNIT_DIED,a,b,c,d,e,f,g,h";
    let path = temp_log("baddate", &format!("{line}\n"));
    let mut session = ParserSession::open(&path).unwrap();
    session.set_reference_year(2021);
    assert!(matches!(
        session.parse_from(0),
        Err(Error::MalformedLine { line: l }) if l == line
    ));
    fs::remove_file(path).unwrap();
}

#[test]
fn resume_hooks_drive_incremental_passes() {
    let path = temp_log("resume", &unit_died("Creature-1", "First"));
    let mut session = ParserSession::open(&path).unwrap();

    let offset = Rc::new(RefCell::new(0u64));
    let restore = Rc::clone(&offset);
    session.on_pre_parse(move |_len| *restore.borrow());
    let store = Rc::clone(&offset);
    session.on_post_parse(move |end| *store.borrow_mut() = end);

    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&names);
    session.register(&[events::UNIT_DIED], move |record, _| {
        sink.borrow_mut().push(record.field_at(5).unwrap().to_string());
    });

    session.parse_to_end().unwrap();
    assert_eq!(*names.borrow(), vec!["First".to_string()]);

    append(&path, &unit_died("Creature-2", "Second"));
    session.parse_to_end().unwrap();
    assert_eq!(*names.borrow(), vec!["First".to_string(), "Second".to_string()]);
    assert_eq!(*offset.borrow(), fs::metadata(&path).unwrap().len());
    fs::remove_file(path).unwrap();
}

#[test]
fn two_chunked_passes_match_one_full_pass() {
    let first = unit_died("Creature-1", "First");
    let log = format!("{first}{}", aura_applied("774", "\"Rejuvenation\""));
    let path = temp_log("chunked", &log);

    let record_events = |session: &mut ParserSession, sink: &Rc<RefCell<Vec<String>>>| {
        let sink = Rc::clone(sink);
        session.register(
            &[events::UNIT_DIED, events::SPELL_AURA_APPLIED],
            move |record, _| sink.borrow_mut().push(record.event_type.clone()),
        );
    };

    let whole_seen = Rc::new(RefCell::new(Vec::new()));
    let mut whole = ParserSession::open(&path).unwrap();
    record_events(&mut whole, &whole_seen);
    let end = whole.parse_from(0).unwrap();

    // Same file consumed as two passes split at a line boundary.
    let chunked_seen = Rc::new(RefCell::new(Vec::new()));
    let mut chunked = ParserSession::open(&path).unwrap();
    record_events(&mut chunked, &chunked_seen);
    let boundary = first.len() as u64;
    fs::write(&path, &first).unwrap();
    assert_eq!(chunked.parse_from(0).unwrap(), boundary);
    fs::write(&path, &log).unwrap();
    assert_eq!(chunked.parse_from(boundary).unwrap(), end);

    assert_eq!(
        *whole_seen.borrow(),
        vec![events::UNIT_DIED.to_string(), events::SPELL_AURA_APPLIED.to_string()]
    );
    assert_eq!(*chunked_seen.borrow(), *whole_seen.borrow());
    assert_eq!(chunked.cache().unit_count(), whole.cache().unit_count());
    assert_eq!(chunked.cache().aura_name(774), whole.cache().aura_name(774));
    fs::remove_file(path).unwrap();
}

#[test]
fn unterminated_final_line_waits_for_the_next_pass() {
    let full = aura_applied("774", "\"Rejuvenation\"");
    let (head, tail) = full.split_at(full.len() / 2);
    let path = temp_log("fragment", head);

    let mut session = ParserSession::open(&path).unwrap();
    session.set_skip_malformed(true);
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    session.register(&[events::SPELL_AURA_APPLIED], move |_, _| {
        *counter.borrow_mut() += 1;
    });

    // The half-written line is not consumed, skipped, or cached.
    let end = session.parse_from(0).unwrap();
    assert_eq!(end, 0);
    assert!(session.skipped_lines().is_empty());
    assert_eq!(session.cache().unit_count(), 0);
    assert_eq!(*hits.borrow(), 0);

    append(&path, tail);
    assert_eq!(session.parse_from(end).unwrap(), full.len() as u64);
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(session.cache().aura_name(774), Some("Rejuvenation"));
    fs::remove_file(path).unwrap();
}

#[test]
fn progress_reflects_the_position_of_a_mid_file_fault() {
    let good = [
        unit_died("Creature-1", "First"),
        unit_died("Creature-2", "Second"),
        unit_died("Creature-3", "Third"),
    ];
    let bad = "garbage that matches no grammar\n";

    // Fault the pass at each line position in turn; the reported fraction
    // must match the bytes consumed and grow with the fault position.
    let mut last = 0.0f32;
    for position in 0..=good.len() {
        let mut log = String::new();
        for line in &good[..position] {
            log.push_str(line);
        }
        log.push_str(bad);
        for line in &good[position..] {
            log.push_str(line);
        }

        let path = temp_log("fault", &log);
        let mut session = ParserSession::open(&path).unwrap();
        assert!(matches!(session.parse_from(0), Err(Error::MalformedLine { .. })));

        let consumed = good[..position].iter().map(String::len).sum::<usize>() + bad.len();
        let expected = consumed as f32 / log.len() as f32;
        assert!((session.progress() - expected).abs() < 1e-6);
        assert!(session.progress() < 1.0);
        assert!(session.progress() > last);
        last = session.progress();
        fs::remove_file(path).unwrap();
    }
}

#[test]
fn unknown_event_dispatches_without_an_unhandled_callback() {
    let log = build_line("ARENA_MATCH_END", &["1", "2", "3"]);
    let path = temp_log("nocallback", &log);

    let mut session = ParserSession::open(&path).unwrap();
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    session.register(&["ARENA_MATCH_END"], move |_, _| *counter.borrow_mut() += 1);

    session.parse_from(0).unwrap();
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(session.cache().unit_count(), 0);
    fs::remove_file(path).unwrap();
}

#[test]
fn empty_span_reports_complete_progress() {
    let path = temp_log("empty", "");
    let mut session = ParserSession::open(&path).unwrap();
    assert_eq!(session.parse_from(0).unwrap(), 0);
    assert_eq!(session.progress(), 1.0);
    fs::remove_file(path).unwrap();
}

#[test]
fn missing_file_fails_to_open() {
    let path = std::env::temp_dir().join("wowlog-does-not-exist.txt");
    match ParserSession::open(&path) {
        Err(Error::LogNotFound { path: p }) => assert_eq!(p, path),
        other => panic!("expected LogNotFound, got {other:?}"),
    }
}
