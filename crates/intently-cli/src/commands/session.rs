use clap::Subcommand;
use intently_core::{Event, IntentionWidget, SessionLength, SessionState};
use serde::Serialize;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Declare an intention for the session
    Intend {
        /// Intention text
        text: String,
        /// Tab identifier
        #[arg(long, default_value = "cli")]
        tab: String,
    },
    /// Start a session
    Start {
        /// Session length in minutes
        #[arg(long, conflicts_with = "infinite")]
        minutes: Option<u64>,
        /// Run without a countdown
        #[arg(long)]
        infinite: bool,
        /// Label of the chosen duration, e.g. "15 min"
        #[arg(long)]
        label: Option<String>,
        #[arg(long, default_value = "cli")]
        tab: String,
    },
    /// Print current session state as JSON
    Status {
        #[arg(long, default_value = "cli")]
        tab: String,
    },
    /// Tick the running countdown at 1 Hz until it completes
    Watch {
        #[arg(long, default_value = "cli")]
        tab: String,
    },
    /// Extend a completed session by the given minutes
    Extend {
        minutes: u64,
        #[arg(long, default_value = "cli")]
        tab: String,
    },
    /// Finish the session, recording a completion
    Finish {
        #[arg(long, default_value = "cli")]
        tab: String,
    },
    /// Abandon the session without recording a completion
    Reset {
        #[arg(long, default_value = "cli")]
        tab: String,
    },
}

#[derive(Serialize)]
struct Snapshot<'a> {
    state: SessionState,
    intention: Option<&'a str>,
    remaining_seconds: u64,
    total_seconds: u64,
}

fn print_snapshot(widget: &IntentionWidget) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot {
        state: widget.state(),
        intention: widget.intention(),
        remaining_seconds: widget.remaining_seconds(),
        total_seconds: widget.timer().total_seconds(),
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Print events worth showing on the terminal; ticks are just display
/// refreshes and stay silent.
fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        if matches!(event, Event::Tick { .. }) {
            continue;
        }
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

fn open(tab: &str) -> (IntentionWidget, Vec<Event>) {
    let mut widget = IntentionWidget::open(tab);
    let events = widget.restore();
    (widget, events)
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Intend { text, tab } => {
            let (mut widget, _) = open(&tab);
            widget.set_intention(&text);
            print_snapshot(&widget)?;
        }
        SessionAction::Start {
            minutes,
            infinite,
            label,
            tab,
        } => {
            let (mut widget, _) = open(&tab);
            let length = if infinite {
                SessionLength::Infinite
            } else {
                let minutes = minutes.ok_or("either --minutes or --infinite is required")?;
                SessionLength::Minutes(minutes)
            };
            let events = widget.start_session(length, label)?;
            print_events(&events)?;
            print_snapshot(&widget)?;
        }
        SessionAction::Status { tab } => {
            let (mut widget, restored) = open(&tab);
            // A deadline that passed while the CLI was away completes here.
            print_events(&restored)?;
            let events = widget.tick();
            print_events(&events)?;
            print_snapshot(&widget)?;
        }
        SessionAction::Watch { tab } => {
            let (mut widget, restored) = open(&tab);
            print_events(&restored)?;
            if widget.state() != SessionState::Running {
                eprintln!("no running countdown to watch");
                std::process::exit(1);
            }
            loop {
                for event in widget.tick() {
                    match event {
                        Event::Tick {
                            remaining_seconds,
                            total_seconds,
                            ..
                        } => println!("{remaining_seconds}/{total_seconds}s remaining"),
                        other => println!("{}", serde_json::to_string_pretty(&other)?),
                    }
                }
                if widget.state() != SessionState::Running {
                    break;
                }
                std::thread::sleep(std::time::Duration::from_secs(1));
            }
        }
        SessionAction::Extend { minutes, tab } => {
            let (mut widget, restored) = open(&tab);
            print_events(&restored)?;
            let events = widget.extend_session(minutes)?;
            if events.is_empty() {
                eprintln!("no completed session to extend");
                std::process::exit(1);
            }
            print_events(&events)?;
            print_snapshot(&widget)?;
        }
        SessionAction::Finish { tab } => {
            let (mut widget, restored) = open(&tab);
            print_events(&restored)?;
            let events = widget.finish_session();
            print_events(&events)?;
        }
        SessionAction::Reset { tab } => {
            let (mut widget, _) = open(&tab);
            let events = widget.reset_intention();
            print_events(&events)?;
        }
    }
    Ok(())
}
