use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::timeline::PlaybackStep;

use super::ticker::{TickSource, TickerHandle};
use super::{EngineSnapshot, PlaybackEngine, PlaybackStatus, Transition};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub session_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub engine: EngineSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PlaybackEvent {
    StateChanged { snapshot: PlaybackSnapshot },
    Tick { snapshot: PlaybackSnapshot },
    StepStarted {
        snapshot: PlaybackSnapshot,
        step: PlaybackStep,
    },
    Finished { snapshot: PlaybackSnapshot },
}

#[derive(Debug, Default)]
struct SessionState {
    engine: PlaybackEngine,
    session_id: Option<String>,
    started_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            session_id: self.session_id.clone(),
            started_at: self.started_at,
            engine: self.engine.snapshot(),
        }
    }

    fn event_for(&self, transition: Transition) -> Option<PlaybackEvent> {
        let snapshot = self.snapshot();
        match transition {
            Transition::Ignored => None,
            Transition::Counted => Some(PlaybackEvent::Tick { snapshot }),
            Transition::StatusChanged => Some(PlaybackEvent::StateChanged { snapshot }),
            Transition::StepChanged => self.engine.current_step().map(|step| {
                PlaybackEvent::StepStarted {
                    snapshot,
                    step: step.clone(),
                }
            }),
            Transition::Finished => Some(PlaybackEvent::Finished { snapshot }),
        }
    }
}

/// Single owner of a playback engine.
///
/// Commands are serialized on the ticker slot and ticks share the state mutex
/// with them, so the engine sees a strictly sequential command stream. Ticks
/// come from the injected [`TickSource`] and only flow while the engine is
/// running.
#[derive(Clone)]
pub struct PlaybackController {
    state: Arc<Mutex<SessionState>>,
    ticker: Arc<Mutex<Option<TickerHandle>>>,
    tick_source: Arc<dyn TickSource>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackController {
    pub fn new(tick_source: Arc<dyn TickSource>, event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            ticker: Arc::new(Mutex::new(None)),
            tick_source,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn current_step(&self) -> Option<PlaybackStep> {
        self.state.lock().await.engine.current_step().cloned()
    }

    pub async fn status(&self) -> PlaybackStatus {
        self.state.lock().await.engine.status()
    }

    /// Starts a fresh session over `steps`. Any running ticker is stopped.
    pub async fn load(&self, steps: Vec<PlaybackStep>) -> PlaybackSnapshot {
        self.command(move |state| {
            let session_id = Uuid::new_v4().to_string();
            info!(
                "Loading playback session {} with {} steps",
                session_id,
                steps.len()
            );

            state.session_id = Some(session_id);
            state.started_at = Some(Utc::now());
            state.engine.load(steps)
        })
        .await
    }

    pub async fn play(&self) -> PlaybackSnapshot {
        self.command(|state| state.engine.play()).await
    }

    pub async fn pause(&self) -> PlaybackSnapshot {
        self.command(|state| state.engine.pause()).await
    }

    pub async fn toggle(&self) -> PlaybackSnapshot {
        self.command(|state| match state.engine.status() {
            PlaybackStatus::Running => state.engine.pause(),
            _ => state.engine.play(),
        })
        .await
    }

    /// Explicit skip to the next step.
    pub async fn skip(&self) -> PlaybackSnapshot {
        self.command(|state| state.engine.advance()).await
    }

    pub async fn skip_section(&self) -> PlaybackSnapshot {
        self.command(|state| state.engine.skip_section()).await
    }

    /// Ends the session and returns the engine to `Idle`.
    pub async fn stop(&self) -> PlaybackSnapshot {
        self.command(|state| {
            if let Some(session_id) = state.session_id.take() {
                info!("Stopping playback session {}", session_id);
            }
            state.started_at = None;
            state.engine.unload();
            Transition::StatusChanged
        })
        .await
    }

    /// Runs one command. The ticker slot stays locked for the whole command, so
    /// the ticker always matches the status the command left behind.
    async fn command<F>(&self, command: F) -> PlaybackSnapshot
    where
        F: FnOnce(&mut SessionState) -> Transition,
    {
        let mut ticker = self.ticker.lock().await;

        let (event, snapshot, running) = {
            let mut state = self.state.lock().await;
            let transition = command(&mut *state);
            (
                state.event_for(transition),
                state.snapshot(),
                state.engine.status() == PlaybackStatus::Running,
            )
        };

        if running {
            if !ticker.as_ref().is_some_and(TickerHandle::is_live) {
                if let Some(stale) = ticker.take() {
                    stale.cancel();
                }
                *ticker = Some(self.spawn_ticker());
            }
        } else if let Some(handle) = ticker.take() {
            handle.cancel();
        }

        if let Some(event) = event {
            send_event(&self.events, event);
        }
        snapshot
    }

    fn spawn_ticker(&self) -> TickerHandle {
        let cancel = CancellationToken::new();
        let mut ticks = self.tick_source.start(cancel.clone());
        let state = self.state.clone();
        let events = self.events.clone();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    tick = ticks.recv() => {
                        if tick.is_none() {
                            break;
                        }

                        let (transition, event) = {
                            let mut guard = state.lock().await;
                            if guard.engine.status() != PlaybackStatus::Running {
                                break;
                            }
                            let transition = guard.engine.tick();
                            (transition, guard.event_for(transition))
                        };

                        if let Some(event) = event {
                            send_event(&events, event);
                        }

                        if transition == Transition::Finished {
                            token.cancel();
                            break;
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }
        });

        TickerHandle::new(cancel, handle)
    }
}

fn send_event(events: &broadcast::Sender<PlaybackEvent>, event: PlaybackEvent) {
    if let PlaybackEvent::Finished { snapshot } = &event {
        info!(
            "Playback session {} finished after {}s",
            snapshot.session_id.as_deref().unwrap_or("-"),
            snapshot.engine.elapsed_seconds
        );
    }

    // No subscribers is fine.
    let _ = events.send(event);
}
