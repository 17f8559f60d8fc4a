//! Interactive session on stdin/stdout.
//!
//! Each stdin line is one input in the shared line grammar; output is one
//! JSON document per line (events, snapshots, errors). Every typed line also
//! counts as a key press for the activity watchdog.

use std::path::Path;
use std::time::Duration;

use focuspet_core::{parse_line, Config, Event, Input, SessionController, Signal};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::load_config;

type CliResult = Result<(), Box<dyn std::error::Error>>;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(path: Option<&Path>, focus_secs: Option<u64>) -> CliResult {
    let mut config = load_config(path)?;
    if let Some(secs) = focus_secs {
        config.set("session.focus_duration_secs", &secs.to_string())?;
    }
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(session_loop(config))
}

async fn session_loop(config: Config) -> CliResult {
    let mut controller = SessionController::with_system_clock(&config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        focus_secs = config.session.focus_duration_secs,
        "interactive session started"
    );
    print_json(&controller.snapshot())?;

    loop {
        tokio::select! {
            _ = ticker.tick() => emit(&controller.poll())?,
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                let line = line.trim();
                if line == "quit" {
                    break;
                }
                emit(&controller.signal(Signal::Activity))?;
                handle_line(&mut controller, &config, line)?;
            }
        }
    }

    emit(&controller.poll())?;
    Ok(())
}

fn handle_line(
    controller: &mut SessionController,
    config: &Config,
    line: &str,
) -> CliResult {
    let input = match parse_line(line, controller.tasks()) {
        Ok(input) => input,
        Err(e) => return print_error(&e),
    };
    match input {
        Input::Command(command) => match controller.dispatch(command) {
            Ok(events) => emit(&events)?,
            Err(e) => print_error(&e)?,
        },
        Input::Signal(signal) => emit(&controller.signal(signal))?,
        Input::Status => print_json(&controller.snapshot())?,
        Input::Tasks => print_json(controller.tasks().tasks())?,
        Input::Stats => print_json(&controller.stats(config.stats.average_window_days))?,
        Input::Wait => emit(&controller.poll())?,
    }
    Ok(())
}

fn emit(events: &[Event]) -> CliResult {
    for event in events {
        if event.is_notification() {
            info!(?event, "notification");
        }
        print_json(event)?;
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn print_error(error: &focuspet_core::CoreError) -> CliResult {
    #[derive(Serialize)]
    struct ErrorLine<'a> {
        error: String,
        upgrade_required: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<&'a str>,
    }

    let upgrade_required = error.is_upgrade_required();
    print_json(&ErrorLine {
        error: error.to_string(),
        upgrade_required,
        hint: upgrade_required.then_some("set quota.unlocked = true to add more tasks"),
    })
}
