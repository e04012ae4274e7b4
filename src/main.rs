use std::time::Instant;

use anyhow::Context;
use itertools::Itertools;
use rugby_event_tracker::{
    EventSession, EventType, FieldBounds, Half, Notice, NoticeBoard, Player, TrackerBackend,
    TrackerClient, TrackerConfig,
};
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

/// Coordinates typed at the prompt are already percentages of the field.
const PERCENT_FIELD: FieldBounds = FieldBounds {
    left: 0.0,
    top: 0.0,
    width: 100.0,
    height: 100.0,
};

const HELP: &str = "\
commands:
  start | pause | reset        control the match clock
  half <1H|2H|ET> | switch     set or toggle the half
  roster                       list both teams
  player <id>                  select a player
  at <x> <y>                   select a field location (percent, 0-100)
  types                        list event types
  event <type>                 select an event type
  desc <text>                  set the description
  done                         record the event
  feed                         show recorded events, most recent first
  export                       print the log as CSV
  upload                       upload the log
  quit";

#[derive(Debug, PartialEq)]
enum Command {
    Start,
    Pause,
    Reset,
    Half(Half),
    SwitchHalf,
    Roster,
    Player(u32),
    At(f64, f64),
    Types,
    Event(EventType),
    Describe(String),
    Done,
    Feed,
    Export,
    Upload,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let number = |what: &str, raw: &str| {
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("{what} must be a number, got {raw:?}"))
    };

    let command = match word {
        "start" => Command::Start,
        "pause" => Command::Pause,
        "reset" => Command::Reset,
        "half" => Command::Half(rest.parse().map_err(|_| format!("unknown half {rest:?}"))?),
        "switch" => Command::SwitchHalf,
        "roster" => Command::Roster,
        "player" => Command::Player(
            rest.parse()
                .map_err(|_| format!("player id must be a number, got {rest:?}"))?,
        ),
        "at" => {
            let (x, y) = rest
                .split_whitespace()
                .collect_tuple()
                .ok_or("usage: at <x> <y>")?;
            Command::At(number("x", x)?, number("y", y)?)
        }
        "types" => Command::Types,
        "event" => Command::Event(EventType::from_tag(rest).map_err(|e| e.to_string())?),
        "desc" => Command::Describe(rest.to_string()),
        "done" => Command::Done,
        "feed" => Command::Feed,
        "export" => Command::Export,
        "upload" => Command::Upload,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}, try help")),
    };
    Ok(command)
}

fn player_line(player: &Player) -> String {
    format!(
        "  [{}] #{} {}",
        player.id, player.jersey_number, player.full_name
    )
}

fn print_status<B: TrackerBackend>(session: &EventSession<B>, notices: &mut NoticeBoard) {
    let clock = session.clock();
    let draft = session.draft();
    println!(
        "{} {}{} | player: {} | location: {} | event: {} | pending: {}",
        clock.half(),
        clock.display(),
        if clock.is_running() { "" } else { " (paused)" },
        draft
            .player
            .as_ref()
            .map(|p| format!("#{} {}", p.jersey_number, p.full_name))
            .unwrap_or_else(|| "-".to_string()),
        draft
            .location
            .map(|l| format!("{:.2},{:.2} {}", l.x, l.y, l.zone))
            .unwrap_or_else(|| "-".to_string()),
        draft
            .event_type
            .map(|e| e.label())
            .unwrap_or_else(|| "-".to_string()),
        session.pending_count(),
    );
    for notice in notices.active(Instant::now()) {
        println!("[{}] {}", notice.severity, notice.message);
    }
}

async fn confirm_upload<B: TrackerBackend>(
    session: &mut EventSession<B>,
    notices: &mut NoticeBoard,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    if session.pending_count() == 0 {
        notices.push(Notice::info("No events recorded yet"));
        return Ok(());
    }
    println!("{} [y/N]", session.upload_prompt());
    let answer = lines.next_line().await?.unwrap_or_default();
    if !answer.trim().eq_ignore_ascii_case("y") {
        notices.push(Notice::info("Upload cancelled"));
        return Ok(());
    }

    println!("Uploading...");
    match session.submit_log().await {
        Ok(count) => notices.push(Notice::upload_succeeded(count)),
        Err(e) => notices.push(Notice::from(&e)),
    }
    Ok(())
}

/// Apply one command. Returns `false` when the user asked to quit.
async fn run_command<B: TrackerBackend>(
    command: Command,
    session: &mut EventSession<B>,
    notices: &mut NoticeBoard,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<bool> {
    match command {
        Command::Start => session.start_clock(),
        Command::Pause => session.pause_clock(),
        Command::Reset => session.reset_clock(),
        Command::Half(half) => session.set_half(half),
        Command::SwitchHalf => {
            let next = match session.clock().half() {
                Half::First => Half::Second,
                _ => Half::First,
            };
            session.set_half(next);
        }
        Command::Roster => {
            let roster = session.roster();
            println!("Home");
            roster.home.iter().for_each(|p| println!("{}", player_line(p)));
            println!("Away");
            roster.away.iter().for_each(|p| println!("{}", player_line(p)));
        }
        Command::Player(id) => {
            if let Err(e) = session.select_player_by_id(id) {
                notices.push(Notice::from(&e));
            }
        }
        Command::At(x, y) => match session.select_location(x, y, PERCENT_FIELD) {
            Ok(location) => println!("Zone: {}", location.zone),
            Err(e) => notices.push(Notice::from(&e)),
        },
        Command::Types => {
            println!("{}", EventType::iter().map(|e| e.to_string()).join(" "));
        }
        Command::Event(event_type) => {
            if session.event_picker_open() {
                session.select_event_type(event_type);
            } else {
                notices.push(Notice::info("Select a player and a field location first"));
            }
        }
        Command::Describe(text) => session.set_description(text),
        Command::Done => match session.confirm_event() {
            Ok(_) => notices.push(Notice::event_recorded()),
            Err(e) => notices.push(Notice::from(&e)),
        },
        Command::Feed => {
            if session.pending_count() == 0 {
                println!("No events recorded yet");
            }
            for event in session.recent_events() {
                println!("{}", event.feed_line());
                if !event.description.is_empty() {
                    println!("    {}", event.description);
                }
            }
        }
        Command::Export => match session.export_log() {
            Ok(csv) => print!("{csv}"),
            Err(e) => notices.push(Notice::from(&e)),
        },
        Command::Upload => confirm_upload(session, notices, lines).await?,
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = TrackerConfig::from_env().context("loading configuration")?;
    let session_config = config.session;
    let mut session = EventSession::new(TrackerClient::new(config), session_config);
    let mut notices = NoticeBoard::new();

    if let Err(e) = session.load_roster().await {
        notices.push(Notice::from(&e));
    }

    println!("Rugby Match Event Tracker (match {})", session_config.match_id);
    println!("{HELP}");
    print_status(&session, &mut notices);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            print_status(&session, &mut notices);
            continue;
        }
        match parse_command(&line) {
            Ok(command) => {
                if !run_command(command, &mut session, &mut notices, &mut lines).await? {
                    break;
                }
            }
            Err(message) => notices.push(Notice::error(message)),
        }
        print_status(&session, &mut notices);
    }

    session.pause_clock();
    if session.pending_count() > 0 {
        println!(
            "{} events were not uploaded and will be lost",
            session.pending_count()
        );
    }
    Ok(())
}
