use std::time::Duration;

use clap::Subcommand;
use randfocus_core::session::now_ms;
use randfocus_core::{Config, Event, SessionConfigInput};

use super::{open_controller, CliResult, Controller};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a focus session
    Start {
        /// What you will focus on
        #[arg(default_value = "")]
        description: String,
        /// Focus duration in minutes
        #[arg(long)]
        focus: Option<String>,
        /// Minutes at the start with no breaks
        #[arg(long)]
        no_break_start: Option<String>,
        /// Minutes at the end with no breaks
        #[arg(long)]
        no_break_end: Option<String>,
        /// Shortest gap between breaks, in minutes
        #[arg(long)]
        min_interval: Option<String>,
        /// Longest gap between breaks, in minutes
        #[arg(long)]
        max_interval: Option<String>,
    },
    /// Stop the running session early
    Stop,
    /// Fire due breaks, then print the current session state as JSON
    Status,
    /// Keep polling until the session ends or Ctrl-C
    Watch {
        /// Seconds between polls
        #[arg(long, default_value = "20")]
        interval_secs: u64,
    },
}

fn print_event(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Poll once and print any event produced. Returns whether a session is still running.
fn poll_once(ctl: &mut Controller) -> Result<bool, Box<dyn std::error::Error>> {
    match ctl.poll_stored(now_ms())? {
        Some((state, event)) => {
            if let Some(event) = event {
                print_event(&event)?;
            }
            Ok(state.active)
        }
        None => Ok(false),
    }
}

async fn watch(ctl: &mut Controller, every: Duration) -> CliResult {
    let mut interval = tokio::time::interval(every);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if !poll_once(ctl)? {
                    tracing::info!("no running session, stopping watch");
                    return Ok(());
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted, session keeps running");
                return Ok(());
            }
        }
    }
}

pub fn run(action: SessionAction) -> CliResult {
    let config = Config::load_or_default();
    let mut ctl = open_controller(&config)?;

    match action {
        SessionAction::Start {
            description,
            focus,
            no_break_start,
            no_break_end,
            min_interval,
            max_interval,
        } => {
            let flags = SessionConfigInput {
                focus_duration_min: focus.map(Into::into),
                no_break_at_start_min: no_break_start.map(Into::into),
                no_break_at_end_min: no_break_end.map(Into::into),
                min_break_interval_min: min_interval.map(Into::into),
                max_break_interval_min: max_interval.map(Into::into),
            };
            let input = flags.or(config.session_input());
            let (_, event) = ctl.start(&description, &input, now_ms())?;
            print_event(&event)?;
        }
        SessionAction::Stop => {
            let event = ctl.stop_stored(now_ms())?;
            print_event(&event)?;
        }
        SessionAction::Status => {
            poll_once(&mut ctl)?;
            let snapshot = ctl.status(now_ms())?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        SessionAction::Watch { interval_secs } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(watch(&mut ctl, Duration::from_secs(interval_secs.max(1))))?;
        }
    }
    Ok(())
}
