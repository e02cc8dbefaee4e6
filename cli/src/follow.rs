//! Live-tail mode: watch the log's directory and re-parse the tail of the
//! file on every write, printing encounter and death events as they land.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc;

use notify::{EventKind, RecursiveMode, Watcher};
use wowlog_core::{ParserSession, events};

pub fn run(path: &Path, from_start: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ParserSession::open(path)?;
    // A partially written last line must not kill the tail loop.
    session.set_skip_malformed(true);

    let offset = Rc::new(RefCell::new(None::<u64>));
    let restore = Rc::clone(&offset);
    session.on_pre_parse(move |len| {
        let mut slot = restore.borrow_mut();
        let start = match *slot {
            None if from_start => 0,
            None => len,
            // The log shrank underneath us; the game rotated or truncated it.
            Some(prev) if prev > len => 0,
            Some(prev) => prev,
        };
        *slot = Some(start);
        start
    });
    let store = Rc::clone(&offset);
    session.on_post_parse(move |end| *store.borrow_mut() = Some(end));

    register_printers(&mut session);
    session.parse_to_end()?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |event| {
        let _ = tx.send(event);
    })?;
    let watch_root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    watcher.watch(watch_root, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %path.display(), "following combat log");

    let file_name = path.file_name();
    for event in rx {
        let event = event?;
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            continue;
        }
        if !event.paths.iter().any(|p| p.file_name() == file_name) {
            continue;
        }
        session.parse_to_end()?;
    }
    Ok(())
}

fn register_printers(session: &mut ParserSession) {
    session.register(&[events::ENCOUNTER_START], |record, _| {
        if let Ok(name) = record.field("encounter_name") {
            println!("[{}] Encounter started: {name}", record.timestamp.format("%H:%M:%S"));
        }
    });
    session.register(&[events::ENCOUNTER_END], |record, _| {
        let name = record.field("encounter_name").unwrap_or("?");
        let wiped = record.field("wiped").unwrap_or("?");
        println!(
            "[{}] Encounter ended: {name} (wiped: {wiped})",
            record.timestamp.format("%H:%M:%S")
        );
    });
    session.register(&[events::UNIT_DIED], |record, cache| {
        if let (Ok(guid), Ok(name)) = (record.field("unit_guid"), record.field("unit_name")) {
            // Prefer the first-seen name so renames don't change the label.
            let name = cache.unit_name(guid).unwrap_or(name);
            println!("[{}] {name} died", record.timestamp.format("%H:%M:%S"));
        }
    });
    session.register(&[events::PARTY_KILL], |record, _| {
        if let (Ok(enemy), Ok(friendly)) =
            (record.field("enemy_name"), record.field("friendly_name"))
        {
            println!(
                "[{}] {enemy} slain by {friendly}",
                record.timestamp.format("%H:%M:%S")
            );
        }
    });
}
