//! Async host for one game session.
//!
//! `SessionDriver` serializes everything that can touch a session through a
//! single task:
//! - host input arriving on an mpsc queue
//! - one-second ticks from a `tokio::time::interval`
//! - delayed resolutions (quiz feedback, mismatch flip-back), each a spawned
//!   sleep that posts its event back into the loop
//!
//! When the session ends the score is committed once through a
//! `PersistenceGuard`. The save runs on its own task so input keeps flowing
//! while the store is slow. A failed save is retried on the next host input.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::core::{EngineConfig, GameError, Result};
use crate::persistence::{PersistenceGuard, SaveOutcome, ScoreKey, ScoreStore};
use crate::rules::{InputOutcome, SessionEngine, TerminalCallback, TerminalReport};
use crate::session::{GameEvent, GameSession, SessionSnapshot};

#[derive(Debug)]
enum Command {
    Input(GameEvent),
    Shutdown,
}

/// What happened over a driver's lifetime.
#[derive(Debug, Default)]
pub struct DriverReport {
    pub terminal: Option<TerminalReport>,
    /// Result of the most recent save attempt.
    pub save: Option<Result<SaveOutcome>>,
    pub applied: usize,
    pub ignored: usize,
}

/// Host-side handle to a running driver.
#[derive(Clone, Debug)]
pub struct DriverHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<SessionSnapshot>,
    terminal: watch::Receiver<Option<TerminalReport>>,
}

impl DriverHandle {
    /// Queue an input event.
    pub fn send(&self, event: impl Into<GameEvent>) -> Result<()> {
        self.commands
            .send(Command::Input(event.into()))
            .map_err(|_| GameError::SessionClosed)
    }

    /// Latest published session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Wait until the session ends. `None` if the driver stopped first.
    pub async fn wait_terminal(&mut self) -> Option<TerminalReport> {
        let report = self.terminal.wait_for(Option::is_some).await.ok()?;
        (*report).clone()
    }

    /// Stop the driver. Pending timers are cancelled; an in-flight save is
    /// allowed to finish.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

/// Runs one `GameSession` on the tokio runtime.
pub struct SessionDriver {
    session: GameSession,
    key: ScoreKey,
    store: Arc<dyn ScoreStore>,
    guard: Arc<PersistenceGuard>,
    tick_interval: Duration,
}

impl SessionDriver {
    pub fn new(session: GameSession, key: ScoreKey, store: Arc<dyn ScoreStore>, config: &EngineConfig) -> Self {
        Self {
            session,
            key,
            store,
            guard: Arc::new(PersistenceGuard::new()),
            tick_interval: config.tick_interval(),
        }
    }

    /// The session's persistence guard.
    #[must_use]
    pub fn guard(&self) -> Arc<PersistenceGuard> {
        Arc::clone(&self.guard)
    }

    /// Start the event loop on the current runtime.
    pub fn spawn(self) -> (DriverHandle, JoinHandle<DriverReport>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(self.session.snapshot());
        let (terminal_tx, terminal_rx) = watch::channel(self.session.terminal_report());

        let handle = DriverHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
            terminal: terminal_rx,
        };
        let task = tokio::spawn(self.run(commands_rx, snapshot_tx, terminal_tx));
        (handle, task)
    }

    async fn run(
        self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
        terminal_tx: watch::Sender<Option<TerminalReport>>,
    ) -> DriverReport {
        let SessionDriver { mut session, key, store, guard, tick_interval } = self;

        let (delayed_tx, mut delayed_rx) = mpsc::unbounded_channel::<GameEvent>();
        let (report_tx, mut report_rx) = mpsc::unbounded_channel::<TerminalReport>();
        let (saved_tx, mut saved_rx) = mpsc::unbounded_channel::<Result<SaveOutcome>>();

        let callback: TerminalCallback = Box::new(move |report: &TerminalReport| {
            let _ = report_tx.send(report.clone());
        });
        session.set_on_terminal(callback);

        let mut ticks = time::interval_at(Instant::now() + tick_interval, tick_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut timers: Vec<JoinHandle<()>> = Vec::new();
        let mut save_task: Option<JoinHandle<()>> = None;
        let mut retry_save = false;
        let mut report = DriverReport::default();

        loop {
            let (event, from_host) = tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Input(event)) => (event, true),
                    Some(Command::Shutdown) | None => break,
                },
                Some(event) = delayed_rx.recv() => (event, false),
                _ = ticks.tick() => (session.tick_event(), false),
                Some(terminal) = report_rx.recv() => {
                    terminal_tx.send_replace(Some(terminal.clone()));
                    save_task = Some(spawn_save(&store, &guard, &key, &terminal, &saved_tx));
                    report.terminal = Some(terminal);
                    continue;
                }
                Some(result) = saved_rx.recv() => {
                    if let Err(err) = &result {
                        warn!(error = %err, "score not saved; will retry on next input");
                    }
                    retry_save = result.is_err();
                    report.save = Some(result);
                    continue;
                }
            };

            match session.on_input(event) {
                InputOutcome::Applied => report.applied += 1,
                InputOutcome::Ignored(reason) => {
                    debug!(?reason, "input ignored");
                    report.ignored += 1;
                }
                InputOutcome::Deferred { event, after } => {
                    report.applied += 1;
                    timers.retain(|t| !t.is_finished());
                    let tx = delayed_tx.clone();
                    timers.push(tokio::spawn(async move {
                        time::sleep(after).await;
                        let _ = tx.send(event);
                    }));
                }
            }
            snapshot_tx.send_replace(session.snapshot());

            if retry_save && from_host {
                if let Some(terminal) = session.terminal_report() {
                    retry_save = false;
                    save_task = Some(spawn_save(&store, &guard, &key, &terminal, &saved_tx));
                }
            }
        }

        for timer in timers {
            timer.abort();
        }
        if let Some(task) = save_task {
            let _ = task.await;
        }
        while let Ok(result) = saved_rx.try_recv() {
            report.save = Some(result);
        }
        debug!(applied = report.applied, ignored = report.ignored, "driver stopped");
        report
    }
}

fn spawn_save(
    store: &Arc<dyn ScoreStore>,
    guard: &Arc<PersistenceGuard>,
    key: &ScoreKey,
    terminal: &TerminalReport,
    saved_tx: &mpsc::UnboundedSender<Result<SaveOutcome>>,
) -> JoinHandle<()> {
    let store = Arc::clone(store);
    let guard = Arc::clone(guard);
    let key = key.clone();
    let (score, details) = (terminal.score, terminal.details.clone());
    let tx = saved_tx.clone();
    tokio::spawn(async move {
        let result = guard.commit(store.as_ref(), &key, score, details).await;
        let _ = tx.send(result);
    })
}
