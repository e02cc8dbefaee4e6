mod follow;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wowlog_core::{ParserSession, schema};

#[derive(Parser)]
#[command(name = "wowlog", version, about = "World of Warcraft combat log toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a whole log and print per-event counts.
    Parse {
        path: PathBuf,
        /// Year the log was recorded in (log timestamps carry none).
        #[arg(long)]
        year: Option<i32>,
        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
        /// Skip malformed lines instead of stopping at the first one.
        #[arg(long)]
        skip_malformed: bool,
    },
    /// Tail a live log, printing encounters and deaths as they land.
    Follow {
        path: PathBuf,
        /// Replay the existing file before following new writes.
        #[arg(long)]
        from_start: bool,
    },
    /// List recognized event types, or show one type's field layout.
    Events { event: Option<String> },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Parse { path, year, json, skip_malformed } => {
            parse_command(&path, year, json, skip_malformed)
        }
        Command::Follow { path, from_start } => follow::run(&path, from_start),
        Command::Events { event } => events_command(event.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn parse_command(
    path: &Path,
    year: Option<i32>,
    json: bool,
    skip_malformed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ParserSession::open(path)?;
    if let Some(year) = year {
        session.set_reference_year(year);
    }
    session.set_skip_malformed(skip_malformed);

    let counts = Rc::new(RefCell::new(BTreeMap::<String, u64>::new()));
    let known = Rc::clone(&counts);
    let all_types: Vec<&str> = schema::event_types().collect();
    session.register(&all_types, move |record, _| {
        *known.borrow_mut().entry(record.event_type.clone()).or_default() += 1;
    });
    let unknown = Rc::clone(&counts);
    session.on_unhandled(move |record, _| {
        *unknown.borrow_mut().entry(record.event_type.clone()).or_default() += 1;
    });

    session.parse_to_end()?;

    let counts = counts.borrow();
    let total: u64 = counts.values().sum();
    if json {
        let summary = serde_json::json!({
            "path": path,
            "events": total,
            "counts": &*counts,
            "units_seen": session.cache().unit_count(),
            "auras_seen": session.cache().aura_count(),
            "skipped_lines": session.skipped_lines().len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for (event, count) in counts.iter() {
            println!("{count:>9}  {event}");
        }
        println!("{total:>9}  total");
        println!(
            "units seen: {}, auras seen: {}, lines skipped: {}",
            session.cache().unit_count(),
            session.cache().aura_count(),
            session.skipped_lines().len()
        );
    }
    Ok(())
}

fn events_command(event: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(event) = event else {
        let mut names: Vec<&str> = schema::event_types().collect();
        names.sort_unstable();
        for name in names {
            println!("{name}");
        }
        return Ok(());
    };

    let Some(layout) = schema::get(event) else {
        return Err(format!("unrecognized event type: {event}").into());
    };
    println!("{event}");
    if layout.has_unit_keys {
        for &(name, index) in schema::UNIT_KEY_FIELDS {
            println!("  {index:>2}  {name}");
        }
    }
    for &(name, index) in layout.fields {
        println!("  {index:>2}  {name}");
    }
    Ok(())
}
