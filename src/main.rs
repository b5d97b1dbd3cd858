//! Line-driven shell around the event map store.
//!
//! The binary plays the part of the host application: it turns text commands
//! into [`Event`]s, executes the returned [`Action`]s against an in-process
//! [`EventMapWorker`], plays the map (every camera animation settles on its
//! target) and re-renders the list when the handler reports a change.
//!
//! ```text
//! stdin → parse_command → Event → handle_event → Actions
//!                           ↑                      │
//!                           └── WorkerResponse ────┤ PostToWorker
//!                           └── RegionSettled ─────┘ AnimateTo
//! ```
//!
//! Time is virtual: it starts at launch and only moves with `wait <ms>`, so a
//! script of commands always produces the same output.
//!
//! # Usage
//!
//! ```text
//! eventmap [config=<file.toml>] [key=value ...]
//! ```
//!
//! # Commands
//!
//! - `type`, `place`, `date`: open a filter panel
//! - `close`, `accept [n]`, `cancel`: leave the open panel
//! - `toggle <type>`, `all`: edit the Type panel selection
//! - `start <yyyy-mm-dd|->`, `end <yyyy-mm-dd|->`: edit the Date panel bounds
//! - `search [text]`, `focus`: the shared search input
//! - `sort center|user|date`
//! - `select <id>`, `marker <id>`, `fav <id>`
//! - `pan`, `region <lat> <lon> <dlat> <dlon>`, `me`
//! - `scroll <n>`, `top`, `expand`, `minimize`
//! - `wait <ms>`, `reload`, `list`, `quit`

#![allow(clippy::multiple_crate_versions)]

use chrono::NaiveDate;
use eventmap::app::{Action, ListSnap, MarkerPress, Panel, PanelKind, SortCriterion};
use eventmap::domain::Region;
use eventmap::observability::init_tracing;
use eventmap::worker::EventMapWorker;
use eventmap::{handle_event, initialize, AppState, Config, Event};
use std::collections::{BTreeMap, VecDeque};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

/// What a command line asks the shell to do.
#[derive(Debug, PartialEq)]
enum Command {
    Dispatch(Event),
    Wait(Duration),
    List,
    Quit,
}

struct Shell {
    state: AppState,
    worker: EventMapWorker,
    now: Instant,
}

impl Shell {
    /// Runs `event` and everything it sets off until the queue drains.
    /// Returns `true` if the view changed along the way.
    fn dispatch(&mut self, event: Event) -> bool {
        let mut queue = VecDeque::from([event]);
        let mut changed = false;

        while let Some(event) = queue.pop_front() {
            match handle_event(&mut self.state, &event, self.now) {
                Ok((event_changed, actions)) => {
                    changed |= event_changed;
                    for action in actions {
                        self.execute(action, &mut queue);
                    }
                }
                Err(e) => tracing::error!(error = %e, "error handling event"),
            }
        }
        changed
    }

    fn execute(&mut self, action: Action, queue: &mut VecDeque<Event>) {
        match action {
            Action::PostToWorker(message) => {
                let response = self.worker.handle_message(message);
                queue.push_back(Event::WorkerResponse(response));
            }
            Action::AnimateTo(region) => {
                tracing::debug!(?region, "map animating");
                queue.push_back(Event::RegionSettled(region));
            }
            Action::SnapList(snap) => tracing::debug!(?snap, "list snapped"),
            Action::ScrollListToTop => tracing::debug!("list scrolled to top"),
        }
    }

    fn print(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", eventmap::ui::render(&self.state, false))?;
        writeln!(out, "--")
    }
}

fn parse_args() -> Result<Config, String> {
    let mut pairs = BTreeMap::new();
    let mut config_file = None;
    for arg in std::env::args().skip(1) {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got {arg:?}"))?;
        if key == "config" {
            config_file = Some(eventmap::infrastructure::expand_tilde(value));
        } else {
            pairs.insert(key.to_string(), value.to_string());
        }
    }

    // Command-line pairs override the file.
    let mut merged = match config_file {
        Some(path) => {
            let contents = std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
            Config::toml_pairs(&contents).map_err(|e| e.to_string())?
        }
        None => BTreeMap::new(),
    };
    merged.extend(pairs);
    Ok(Config::from_map(&merged))
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    if raw == "-" {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| format!("bad date {raw:?}: {e}"))
}

fn parse_number<T: std::str::FromStr>(raw: Option<&str>, what: &str) -> Result<T, String> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| format!("expected {what}"))
}

fn parse_command(line: &str, panel: Panel) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').map_or((line, ""), |(w, r)| (w, r.trim()));
    let mut args = rest.split_whitespace();

    let event = match word {
        "" => return Ok(None),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "list" => return Ok(Some(Command::List)),
        "wait" => {
            let ms: u64 = parse_number(args.next(), "milliseconds")?;
            return Ok(Some(Command::Wait(Duration::from_millis(ms))));
        }
        "type" => Event::OpenPanel(PanelKind::Type),
        "place" => Event::OpenPanel(PanelKind::Place),
        "date" => Event::OpenPanel(PanelKind::Date),
        "close" => Event::ClosePanel,
        "accept" => match panel {
            Panel::Type => Event::AcceptTypes,
            Panel::Date => Event::AcceptDates,
            Panel::Place => Event::AcceptPlace {
                index: args.next().map_or(Ok(0), |n| parse_number(Some(n), "place index"))?,
            },
            Panel::None | Panel::EventDetails => return Err("no filter panel is open".to_string()),
        },
        "cancel" => match panel {
            Panel::Type => Event::Cancel(PanelKind::Type),
            Panel::Place => Event::Cancel(PanelKind::Place),
            Panel::Date => Event::Cancel(PanelKind::Date),
            Panel::EventDetails => Event::CloseEventDetails,
            Panel::None => return Err("no panel is open".to_string()),
        },
        "toggle" if !rest.is_empty() => Event::ToggleType(rest.to_string()),
        "all" => Event::SelectOrClearAllTypes,
        "start" => Event::SetStartDate(parse_date(rest)?),
        "end" => Event::SetEndDate(parse_date(rest)?),
        "search" => Event::SearchInput(rest.to_string()),
        "focus" => Event::SearchFocused,
        "sort" => Event::SetSortCriterion(match rest {
            "center" => SortCriterion::MapCenter,
            "user" | "me" => SortCriterion::UserLocation,
            "date" => SortCriterion::Date,
            other => return Err(format!("unknown sort criterion {other:?}")),
        }),
        "select" if !rest.is_empty() => Event::ListItemPressed {
            event_id: rest.to_string(),
        },
        "marker" if !rest.is_empty() => Event::MarkerPressed(MarkerPress::Point {
            event_id: rest.to_string(),
        }),
        "fav" if !rest.is_empty() => Event::ToggleFavorite {
            event_id: rest.to_string(),
        },
        "pan" => Event::MapPanned,
        "region" => Event::RegionSettled(Region {
            latitude: parse_number(args.next(), "latitude")?,
            longitude: parse_number(args.next(), "longitude")?,
            latitude_delta: parse_number(args.next(), "latitude delta")?,
            longitude_delta: parse_number(args.next(), "longitude delta")?,
        }),
        "me" => Event::CenterOnUser,
        "scroll" => Event::ListScrolled(parse_number(args.next(), "row index")?),
        "top" => Event::ScrollToTop,
        "expand" => Event::ListSnapChanged(ListSnap::Expanded),
        "minimize" => Event::ListSnapChanged(ListSnap::Minimized),
        "reload" => Event::Reload,
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(Some(Command::Dispatch(event)))
}

fn run(mut shell: Shell) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    shell.dispatch(Event::Mounted);
    shell.print(&mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match parse_command(&line, shell.state.panels.panel()) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "error: {message}")?;
                continue;
            }
        };

        let mut changed = match command {
            Command::Quit => break,
            Command::List => true,
            Command::Wait(duration) => {
                shell.now += duration;
                false
            }
            Command::Dispatch(event) => shell.dispatch(event),
        };
        changed |= shell.dispatch(Event::Tick);

        if changed {
            shell.print(&mut out)?;
        }
    }

    shell.dispatch(Event::Unmounted);
    Ok(())
}

fn main() -> ExitCode {
    let config = match parse_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("eventmap: {message}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);
    let span = tracing::debug_span!("eventmap_main");
    let _guard = span.enter();
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration parsed");

    let worker = match EventMapWorker::from_config(&config) {
        Ok(worker) => worker,
        Err(e) => {
            eprintln!("eventmap: {e}");
            return ExitCode::FAILURE;
        }
    };

    let shell = Shell {
        state: initialize(&config),
        worker,
        now: Instant::now(),
    };

    match run(shell) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("eventmap: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str, panel: Panel) -> Command {
        parse_command(line, panel).unwrap().unwrap()
    }

    #[test]
    fn accept_and_cancel_follow_the_open_panel() {
        assert_eq!(parse("accept", Panel::Type), Command::Dispatch(Event::AcceptTypes));
        assert_eq!(
            parse("accept 2", Panel::Place),
            Command::Dispatch(Event::AcceptPlace { index: 2 })
        );
        assert_eq!(parse("cancel", Panel::EventDetails), Command::Dispatch(Event::CloseEventDetails));
        assert!(parse_command("accept", Panel::None).is_err());
    }

    #[test]
    fn arguments_are_parsed() {
        assert_eq!(
            parse("start 2024-05-01", Panel::Date),
            Command::Dispatch(Event::SetStartDate(NaiveDate::from_ymd_opt(2024, 5, 1)))
        );
        assert_eq!(parse("end -", Panel::Date), Command::Dispatch(Event::SetEndDate(None)));
        assert_eq!(parse("wait 250", Panel::None), Command::Wait(Duration::from_millis(250)));
        assert_eq!(
            parse("search jazz night", Panel::None),
            Command::Dispatch(Event::SearchInput("jazz night".into()))
        );
        assert!(parse_command("region 1 2", Panel::None).is_err());
        assert!(parse_command("sort sideways", Panel::None).is_err());
        assert_eq!(parse_command("   ", Panel::None), Ok(None));
    }
}
