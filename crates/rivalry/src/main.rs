//! Rivalry CLI
//!
//! Start a rivalry, play contests and track both players' tiers.

use rivalry::{Character, Error, Result, Session, SessionConfig};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tier_core::Side;
use tracing_subscriber::EnvFilter;

const DEFAULT_STATE: &str = "rivalry.json";

fn print_usage() {
    println!("Rivalry tier tracker");
    println!();
    println!("Usage:");
    println!("  rivalry [--state PATH] [--config PATH] <command>");
    println!();
    println!("Commands:");
    println!("  new <user-a> <user-b> [--roster FILE]  Start a rivalry");
    println!("  next                                  Pick fighters for the next contest");
    println!("  shuffle <a|b>                         Pick another fighter for one side");
    println!("  resolve <result> [--nudge N]          Record a result, -3..=3, positive = A won");
    println!("  undo                                  Undo the last resolved contest");
    println!("  move <a|b> <from> <to>                Reorder one side's slots by hand");
    println!("  show                                  Print standings and tiers");
    println!();
    println!("Examples:");
    println!("  rivalry new ana ben --roster roster.txt");
    println!("  rivalry resolve -2 --nudge 1");
}

/// Options shared by every command
struct Options {
    state: PathBuf,
    config: Option<PathBuf>,
}

impl Options {
    fn config(&self) -> Result<SessionConfig> {
        match &self.config {
            Some(path) => SessionConfig::load(path),
            None => Ok(SessionConfig::default()),
        }
    }

    fn load(&self) -> Result<Session> {
        Session::load(&self.state)
    }
}

/// Pull the global flags out of `args`, leaving the command and its arguments.
fn parse_globals(args: &[String]) -> Result<(Options, Vec<String>)> {
    let mut options = Options {
        state: PathBuf::from(DEFAULT_STATE),
        config: None,
    };
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--state" | "-s" => {
                options.state = PathBuf::from(flag_value(args, i)?);
                i += 1;
            }
            "--config" | "-c" => {
                options.config = Some(PathBuf::from(flag_value(args, i)?));
                i += 1;
            }
            other => rest.push(other.to_string()),
        }
        i += 1;
    }
    Ok((options, rest))
}

fn flag_value(args: &[String], i: usize) -> Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidArgument(format!("{} needs a value", args[i])))
}

fn read_roster(path: &Path) -> Result<Vec<Character>> {
    let contents = std::fs::read_to_string(path)?;
    let roster: Vec<Character> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Character::new)
        .collect();
    if roster.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "roster {} lists no characters",
            path.display()
        )));
    }
    Ok(roster)
}

fn run_new(options: &Options, args: &[String]) -> Result<()> {
    if args.len() < 2 {
        return Err(Error::InvalidArgument("new requires two user names".into()));
    }

    let mut config = options.config()?;
    let mut roster_path = None;
    let mut i = 2;
    while i < args.len() {
        if matches!(args[i].as_str(), "--roster" | "-r") {
            roster_path = Some(PathBuf::from(flag_value(args, i)?));
            i += 1;
        }
        i += 1;
    }

    let characters = match roster_path {
        Some(path) => {
            let roster = read_roster(&path)?;
            config.total_slots = roster.len();
            roster
        }
        None => Session::numbered_roster(config.total_slots),
    };

    let mut session = Session::start(&args[0], &args[1], characters, config);
    session.save(&options.state)?;

    println!("=== Rivalry: {} vs {} ===", args[0], args[1]);
    println!(
        "Roster: {} characters, saved to {}",
        session.characters.len(),
        options.state.display()
    );
    Ok(())
}

fn run_next(options: &Options) -> Result<()> {
    let mut session = options.load()?;
    let mut rng = rand::thread_rng();
    let contest = session.next_contest(&mut rng)?.clone();
    print_contest(&session, contest.slot_a_id, contest.slot_b_id);
    session.save(&options.state)
}

fn parse_side(command: &str, arg: Option<&String>) -> Result<Side> {
    match arg.map(|s| s.to_lowercase()).as_deref() {
        Some("a") => Ok(Side::A),
        Some("b") => Ok(Side::B),
        _ => Err(Error::InvalidArgument(format!(
            "{} requires a side, a or b",
            command
        ))),
    }
}

fn parse_position(arg: Option<&String>) -> Result<i32> {
    let arg = arg.ok_or_else(|| Error::InvalidArgument("move requires <from> <to>".into()))?;
    arg.parse()
        .map_err(|_| Error::InvalidArgument(format!("bad position: {}", arg)))
}

fn run_shuffle(options: &Options, args: &[String]) -> Result<()> {
    let side = parse_side("shuffle", args.first())?;

    let mut session = options.load()?;
    let mut rng = rand::thread_rng();
    session.shuffle(side, &mut rng)?;
    let contest = session.current_contest().ok_or(Error::NoCurrentContest)?;
    print_contest(&session, contest.slot_a_id, contest.slot_b_id);
    session.save(&options.state)
}

fn print_contest(session: &Session, slot_a: tier_core::SlotId, slot_b: tier_core::SlotId) {
    for (side, slot_id) in [(Side::A, slot_a), (Side::B, slot_b)] {
        let Some(ledger) = session.rivalry.ledger(side) else {
            continue;
        };
        let Some(slot) = ledger.slot(slot_id) else {
            continue;
        };
        println!(
            "{:<20} {:<20} {} ({}/{})",
            session.name(side),
            session.character_name(slot.character_id),
            ledger.layout.tier_label_for_position(slot.position),
            slot.win_count,
            slot.contest_count
        );
    }
}

fn run_resolve(options: &Options, args: &[String]) -> Result<()> {
    let result: i32 = args
        .first()
        .ok_or_else(|| Error::InvalidArgument("resolve requires a result".into()))?
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("bad result: {}", args[0])))?;

    let mut nudge = None;
    let mut i = 1;
    while i < args.len() {
        if matches!(args[i].as_str(), "--nudge" | "-n") {
            let value = flag_value(args, i)?;
            nudge = Some(
                value
                    .parse::<i8>()
                    .map_err(|_| Error::InvalidArgument(format!("bad nudge: {}", value)))?,
            );
            i += 1;
        }
        i += 1;
    }

    let mut session = options.load()?;
    let mut rng = rand::thread_rng();
    let record = session.resolve_current(result, nudge, &mut rng)?;
    let (before, after) = (record.adjustment.before, record.adjustment.after);
    let contest_id = record.contest_id;

    let moves = session
        .contest(contest_id)
        .map_or(0, |contest| session.fighter_moves(contest));
    println!(
        "Standings {:?} -> {:?}, fighters moved {} slots",
        before, after, moves
    );
    for side in [Side::A, Side::B] {
        if let Some(ledger) = session.rivalry.ledger(side) {
            println!("  {:<20} {}", session.name(side), ledger.prestige_display());
        }
    }
    session.save(&options.state)
}

fn run_undo(options: &Options) -> Result<()> {
    let mut session = options.load()?;
    let contest_id = session.undo_last()?;
    println!("Undid contest {}", contest_id);
    for side in [Side::A, Side::B] {
        if let Some(ledger) = session.rivalry.ledger(side) {
            println!("  {:<20} {}", session.name(side), ledger.prestige_display());
        }
    }
    session.save(&options.state)
}

fn run_move(options: &Options, args: &[String]) -> Result<()> {
    let side = parse_side("move", args.first())?;
    let from = parse_position(args.get(1))?;
    let to = parse_position(args.get(2))?;

    let mut session = options.load()?;
    let changed = session.reorder(side, from, to)?;

    println!("{} slot(s) changed for {}:", changed.len(), session.name(side));
    if let Some(ledger) = session.rivalry.ledger(side) {
        for snapshot in &changed {
            let Some(slot) = ledger.slot(snapshot.id) else {
                continue;
            };
            println!(
                "  {:<20} {:>3} {}",
                session.character_name(slot.character_id),
                snapshot.position.map_or_else(|| "-".to_string(), |p| p.to_string()),
                ledger.layout.tier_label_for_position(snapshot.position)
            );
        }
    }
    session.save(&options.state)
}

fn show(options: &Options) -> Result<()> {
    match options.load() {
        Ok(session) => {
            session.print_report();
            Ok(())
        }
        Err(Error::Io(_)) => {
            println!("No rivalry found at {}. Start one with `rivalry new`.", options.state.display());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn run(args: &[String]) -> Result<()> {
    let (options, rest) = parse_globals(args)?;
    let Some(command) = rest.first() else {
        print_usage();
        return Ok(());
    };

    match command.as_str() {
        "new" => run_new(&options, &rest[1..]),
        "next" => run_next(&options),
        "shuffle" => run_shuffle(&options, &rest[1..]),
        "resolve" => run_resolve(&options, &rest[1..]),
        "undo" => run_undo(&options),
        "move" => run_move(&options, &rest[1..]),
        "show" | "tiers" => show(&options),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
