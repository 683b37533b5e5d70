use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use mindpause_core::{Config, Event, PauseCountdown, SessionController};
use serde_json::json;
use tracing::{debug, info};

use super::{open_ledger, print_json, CommandResult};

#[derive(Subcommand)]
pub enum PauseAction {
    /// Start a pause and run its countdown; Ctrl-C leaves early
    Start {
        /// Only open the record and print its id
        #[arg(long)]
        no_wait: bool,
    },
    /// Conclude a pause started with --no-wait
    Finish {
        /// Record id
        id: String,
        /// Record the pause as left early instead of completed
        #[arg(long)]
        exited_early: bool,
    },
    /// Print the running pause, if any
    Status,
}

pub fn run(action: PauseAction) -> CommandResult {
    let config = Config::load()?;
    let ledger = open_ledger(&config)?;
    let controller = SessionController::with_duration(ledger, config.pause.duration_secs);

    match action {
        PauseAction::Start { no_wait } => {
            let id = controller.start_pause()?;
            if no_wait {
                let state = controller.session_state(&id)?;
                print_json(&json!({ "id": id, "state": state }))?;
                return Ok(());
            }
            let countdown = PauseCountdown::new(
                id,
                controller.pause_duration(),
                config.pause.messages.clone(),
            );
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_countdown(&controller, countdown))?;
        }
        PauseAction::Finish { id, exited_early } => {
            let record = controller.complete_pause(&id, !exited_early, exited_early)?;
            print_json(&record)?;
        }
        PauseAction::Status => match controller.ledger().active_record() {
            Some(record) => {
                let countdown = PauseCountdown::resume(
                    record.id.clone(),
                    controller.pause_duration(),
                    config.pause.messages.clone(),
                    record.start_time,
                );
                print_json(&countdown.snapshot(Utc::now()))?;
            }
            None => print_json(&json!({ "state": controller.current_state() }))?,
        },
    }
    Ok(())
}

/// Drive the countdown once per second until it completes or the user
/// interrupts, printing every event and recording the outcome.
async fn run_countdown(controller: &SessionController, mut countdown: PauseCountdown) -> CommandResult {
    if let Some(event) = countdown.start(Utc::now()) {
        print_json(&event)?;
    }

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        // Ctrl-C is polled first, so its handler is installed before the
        // first tick prints anything.
        tokio::select! {
            biased;
            signal = &mut ctrl_c => {
                signal?;
                debug!(id = countdown.record_id(), "interrupted");
                if let Some(event) = countdown.exit_early(Utc::now()) {
                    print_json(&event)?;
                    return conclude(controller, &event);
                }
                return Ok(());
            }
            _ = interval.tick() => {
                for event in countdown.tick(Utc::now()) {
                    print_json(&event)?;
                    if event.is_terminal() {
                        return conclude(controller, &event);
                    }
                }
            }
        }
    }
}

fn conclude(controller: &SessionController, event: &Event) -> CommandResult {
    let record = match event {
        Event::PauseCompleted { record_id, .. } => controller.complete_pause(record_id, true, false)?,
        Event::PauseExited { record_id, .. } => controller.complete_pause(record_id, false, true)?,
        _ => return Ok(()),
    };
    info!(id = %record.id, success = record.is_success(), "pause recorded");
    print_json(&record)?;
    Ok(())
}
