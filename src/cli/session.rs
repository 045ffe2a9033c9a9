//! Interactive playback session: obtain a plan (with explicit retry when the
//! service is unavailable), then drive a controller from keyboard commands until
//! the plan finishes or the user quits.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::broadcast::error::RecvError;

use crate::api::{ApiError, TrainingClient};
use crate::plan::TrainingPlan;
use crate::player::{IntervalTickSource, PlaybackController, PlaybackEvent};
use crate::settings::{SettingsStore, TrainingParams};
use crate::timeline::{flatten, section_widths, LayoutBasis};

use super::render;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const HELP: &str = "commands: p = play/pause, s = skip step, n = skip section, q = quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    Training(TrainingParams),
    Combo(u32),
    File(PathBuf),
}

pub async fn obtain_plan(client: &TrainingClient, source: &PlanSource) -> Result<TrainingPlan> {
    match source {
        PlanSource::Training(params) => Ok(client.generate_training(params).await?),
        PlanSource::Combo(movements) => Ok(client.generate_combo(*movements).await?),
        PlanSource::File(path) => read_plan_file(path),
    }
}

pub fn read_plan_file(path: &Path) -> Result<TrainingPlan> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse plan in {}", path.display()))
}

pub async fn run_playback(
    client: &TrainingClient,
    settings: &SettingsStore,
    source: PlanSource,
    json: bool,
) -> Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let Some(plan) = obtain_with_retry(client, &source, &mut input).await? else {
        return Ok(());
    };

    if !json {
        let widths = section_widths(&plan, LayoutBasis::Flattened);
        println!("{}", render::render_plan(&plan));
        println!("{}\n", render::render_bar(&plan, &widths, 60));
        println!("{HELP}");
    }

    let playback = settings.playback();
    let controller = PlaybackController::new(
        Arc::new(IntervalTickSource::new(playback.tick_interval())),
        playback.event_buffer,
    );
    let mut events = controller.subscribe();

    controller.load(flatten(&plan)).await;
    controller.play().await;

    let mut stdin_open = true;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let finished = matches!(event, PlaybackEvent::Finished { .. });
                    print_event(&event, json)?;
                    if finished {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    log_warn!("Display fell behind, {} playback events skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            line = input.next_line(), if stdin_open => match line {
                Ok(Some(command)) => {
                    if !handle_command(&controller, command.trim()).await {
                        break;
                    }
                }
                Ok(None) => {
                    log_info!("Input closed; playback continues until the plan ends");
                    stdin_open = false;
                }
                Err(err) => {
                    log_error!("Failed to read command: {}", err);
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                controller.stop().await;
                break;
            }
        }
    }

    Ok(())
}

/// Returns `false` once the user asked to quit.
async fn handle_command(controller: &PlaybackController, command: &str) -> bool {
    match command {
        "p" => {
            controller.toggle().await;
        }
        "s" => {
            controller.skip().await;
        }
        "n" => {
            controller.skip_section().await;
        }
        "q" => {
            controller.stop().await;
            return false;
        }
        "" => {}
        _ => println!("{HELP}"),
    }
    true
}

/// Keeps asking the source until it yields a plan or the user gives up. Each
/// retry is a fresh request. Only an unavailable service is worth a retry; any
/// other failure is returned as is.
pub async fn obtain_with_retry<R>(
    client: &TrainingClient,
    source: &PlanSource,
    input: &mut Lines<R>,
) -> Result<Option<TrainingPlan>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let err = match obtain_plan(client, source).await {
            Ok(plan) => return Ok(Some(plan)),
            Err(err) => err,
        };

        let retryable = err
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_retryable);
        if !retryable {
            return Err(err);
        }

        log_warn!("Plan request to {} failed: {:#}", client.base_url(), err);
        println!("Training plan unavailable: {err:#}");
        println!("[r]etry or [q]uit?");

        match input.next_line().await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("r") => continue,
            _ => return Ok(None),
        }
    }
}

fn print_event(event: &PlaybackEvent, json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    if json {
        let line = serde_json::to_string(event).context("Failed to encode playback event")?;
        writeln!(stdout, "{line}")?;
        return Ok(());
    }

    match event {
        PlaybackEvent::StepStarted { snapshot, step } => {
            let position = snapshot.engine.position.unwrap_or_default();
            writeln!(
                stdout,
                "\n{}",
                render::render_step(step, position, snapshot.engine.step_count)
            )?;
        }
        PlaybackEvent::Tick { snapshot } => {
            write!(stdout, "\r{}    ", render::render_status(snapshot))?;
        }
        PlaybackEvent::StateChanged { snapshot } | PlaybackEvent::Finished { snapshot } => {
            writeln!(stdout, "\n{}", render::render_status(snapshot))?;
        }
    }
    stdout.flush()?;
    Ok(())
}
