//! Async front for a [`BattleRunner`]: paces event playback and runs the auto-battle timer.
//!
//! Resolution itself stays synchronous inside the runner. The driver only decides how long to
//! dwell on each event before the processing flag is released, and makes sure at most one
//! action (human or automated) is ever in flight.

use crate::battle::runner::{BattleRunner, PlaybackMode, TurnResult};
use crate::battle::state::{BattleEvent, BattleSession};
use crate::config::PacingConfig;
use crate::errors::BattleResult;
use crate::player::PlayerAction;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// How long the presentation should dwell on `event`. Silent events take no time.
pub fn dwell(event: &BattleEvent, pacing: &PacingConfig) -> Duration {
    match event {
        BattleEvent::MonFainted { .. } => pacing.faint_delay(),
        event if event.format().is_none() && event.notification().is_none() => Duration::ZERO,
        _ => pacing.event_delay(),
    }
}

#[derive(Clone)]
struct Shared {
    runner: Arc<Mutex<BattleRunner>>,
    snapshots: Arc<watch::Sender<BattleSession>>,
    /// Bumped by every human action. A timer tick that sees a different value than when it was
    /// scheduled does nothing.
    intent: Arc<AtomicU64>,
    pacing: PacingConfig,
}

impl Shared {
    fn publish(&self, runner: &BattleRunner) {
        self.snapshots.send_replace(runner.snapshot());
    }

    async fn play_back(&self, result: &TurnResult) {
        for event in &result.events {
            let delay = dwell(event, &self.pacing);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        let mut runner = self.runner.lock().await;
        runner.acknowledge_playback(result.epoch);
        self.publish(&runner);
    }
}

pub struct BattleDriver {
    shared: Shared,
    auto_task: Option<JoinHandle<()>>,
}

impl BattleDriver {
    /// Wrap `runner`, switching it to paced playback.
    pub fn new(mut runner: BattleRunner, pacing: PacingConfig) -> Self {
        runner.set_playback_mode(PlaybackMode::Paced);
        let (snapshots, _) = watch::channel(runner.snapshot());
        Self {
            shared: Shared {
                runner: Arc::new(Mutex::new(runner)),
                snapshots: Arc::new(snapshots),
                intent: Arc::new(AtomicU64::new(0)),
                pacing,
            },
            auto_task: None,
        }
    }

    /// Receive a fresh session snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<BattleSession> {
        self.shared.snapshots.subscribe()
    }

    pub async fn snapshot(&self) -> BattleSession {
        self.shared.runner.lock().await.snapshot()
    }

    /// Run a synchronous runner operation (team select, start) and publish the result.
    pub async fn with_runner<R>(&self, operation: impl FnOnce(&mut BattleRunner) -> R) -> R {
        let mut runner = self.shared.runner.lock().await;
        let output = operation(&mut runner);
        self.shared.publish(&runner);
        output
    }

    /// Submit a human action. Any pending auto-battle tick is invalidated, and the call returns
    /// after the resulting events have been played back.
    pub async fn submit(&self, action: PlayerAction) -> BattleResult<TurnResult> {
        let result = {
            let mut runner = self.shared.runner.lock().await;
            self.shared.intent.fetch_add(1, Ordering::SeqCst);
            let result = runner.submit(action);
            self.shared.publish(&runner);
            result?
        };
        self.shared.play_back(&result).await;
        Ok(result)
    }

    pub async fn toggle_auto_battle(&mut self) -> BattleResult<bool> {
        let enabled = self
            .with_runner(|runner| runner.toggle_auto_battle())
            .await?;
        if enabled {
            self.stop_auto_battle().await;
            let shared = self.shared.clone();
            self.auto_task = Some(tokio::spawn(run_auto_battle(shared)));
        } else {
            self.stop_auto_battle().await;
        }
        Ok(enabled)
    }

    /// Stop the auto-battle timer and start over at team select.
    pub async fn reset(&mut self) -> BattleResult<()> {
        self.stop_auto_battle().await;
        let mut runner = self.shared.runner.lock().await;
        self.shared.intent.fetch_add(1, Ordering::SeqCst);
        runner.reset()?;
        self.shared.publish(&runner);
        Ok(())
    }

    async fn stop_auto_battle(&mut self) {
        if let Some(task) = self.auto_task.take() {
            task.abort();
            // Wait for the abort so no tick can land after this returns.
            let _ = task.await;

            // The tick may have been cut off mid-playback.
            let mut runner = self.shared.runner.lock().await;
            let epoch = runner.session().epoch;
            runner.acknowledge_playback(epoch);
            self.shared.publish(&runner);
        }
    }
}

impl Drop for BattleDriver {
    fn drop(&mut self) {
        if let Some(task) = self.auto_task.take() {
            task.abort();
        }
    }
}

async fn run_auto_battle(shared: Shared) {
    loop {
        let scheduled = shared.intent.load(Ordering::SeqCst);
        tokio::time::sleep(shared.pacing.auto_battle_interval()).await;

        let step = {
            let mut runner = shared.runner.lock().await;
            if !runner.session().auto_battle {
                break;
            }
            if shared.intent.load(Ordering::SeqCst) != scheduled {
                continue;
            }
            let step = runner.auto_battle_step();
            shared.publish(&runner);
            step
        };

        match step {
            Ok(Some(result)) => shared.play_back(&result).await,
            Ok(None) => {}
            Err(error) => tracing::debug!(error = %error, "auto-battle tick rejected"),
        }
    }
    tracing::debug!("auto-battle timer stopped");
}
