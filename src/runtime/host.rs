//! Session Host
//!
//! Owns a [`GameEngine`] behind a command channel: UI collaborators
//! hold a cloneable [`HostHandle`], operations are processed one at a
//! time in arrival order, and every state transition's events are
//! fanned out over a broadcast channel. Because the host runs each
//! command to completion before admitting the next, round settlement
//! and the total-score recomputation are atomic from any observer's
//! point of view.
//!
//! The host also owns the round clock: it arms a [`RoundTimer`] when
//! the engine enters awaiting-guess and cancels it on every transition
//! out, so a stale timer can never tick against a settled round.

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, trace};

use crate::core::geo::Location;
use crate::game::engine::{EngineError, GameEngine};
use crate::game::events::GameEvent;
use crate::game::locations::LocationProvider;
use crate::game::settings::SettingsUpdate;
use crate::game::state::SessionState;
use crate::runtime::timer::RoundTimer;

/// Capacity of the host's command queue.
const COMMAND_BUFFER: usize = 64;

/// Capacity of the event broadcast channel.
const EVENT_BUFFER: usize = 256;

/// Failure talking to a session host.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum HostError {
    /// The engine rejected the operation; session state is untouched.
    #[error("operation rejected: {0}")]
    Rejected(#[from] EngineError),

    /// The host task has shut down.
    #[error("session host has shut down")]
    Closed,
}

type ReplyTx = oneshot::Sender<Result<(), EngineError>>;

pub(crate) enum HostCommand {
    Start(ReplyTx),
    SubmitGuess(Location, ReplyTx),
    NextRound(ReplyTx),
    Reset(ReplyTx),
    UpdateSettings(SettingsUpdate, ReplyTx),
    PauseTimer(ReplyTx),
    ResumeTimer(ReplyTx),
    Snapshot(oneshot::Sender<SessionState>),
    Shutdown,
}

/// Spawns session host tasks.
pub struct SessionHost;

impl SessionHost {
    /// Spawn a host task owning `engine`, returning a handle to it.
    pub fn spawn<P>(engine: GameEngine<P>) -> HostHandle
    where
        P: LocationProvider + Send + 'static,
    {
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        tokio::spawn(run_session(engine, command_rx, events.clone()));

        HostHandle { commands, events }
    }
}

/// Cloneable handle to a running session host.
#[derive(Clone)]
pub struct HostHandle {
    commands: mpsc::Sender<HostCommand>,
    events: broadcast::Sender<GameEvent>,
}

impl HostHandle {
    /// Start a new game.
    pub async fn start(&self) -> Result<(), HostError> {
        let (tx, rx) = oneshot::channel();
        self.request(HostCommand::Start(tx), rx).await
    }

    /// Submit a guess for the current round.
    pub async fn submit_guess(&self, guess: Location) -> Result<(), HostError> {
        let (tx, rx) = oneshot::channel();
        self.request(HostCommand::SubmitGuess(guess, tx), rx).await
    }

    /// Leave the result screen and move on.
    pub async fn next_round(&self) -> Result<(), HostError> {
        let (tx, rx) = oneshot::channel();
        self.request(HostCommand::NextRound(tx), rx).await
    }

    /// Reset the session to its pre-start state.
    pub async fn reset(&self) -> Result<(), HostError> {
        let (tx, rx) = oneshot::channel();
        self.request(HostCommand::Reset(tx), rx).await
    }

    /// Validate and apply a settings update.
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<(), HostError> {
        let (tx, rx) = oneshot::channel();
        self.request(HostCommand::UpdateSettings(update, tx), rx).await
    }

    /// Pause the round clock.
    pub async fn pause_timer(&self) -> Result<(), HostError> {
        let (tx, rx) = oneshot::channel();
        self.request(HostCommand::PauseTimer(tx), rx).await
    }

    /// Resume the round clock.
    pub async fn resume_timer(&self) -> Result<(), HostError> {
        let (tx, rx) = oneshot::channel();
        self.request(HostCommand::ResumeTimer(tx), rx).await
    }

    /// Fetch a snapshot of the current session state.
    pub async fn snapshot(&self) -> Result<SessionState, HostError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(HostCommand::Snapshot(tx))
            .await
            .map_err(|_| HostError::Closed)?;
        rx.await.map_err(|_| HostError::Closed)
    }

    /// Subscribe to the session's event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Stop the host task. Pending state is discarded.
    pub async fn shutdown(&self) -> Result<(), HostError> {
        self.commands
            .send(HostCommand::Shutdown)
            .await
            .map_err(|_| HostError::Closed)
    }

    async fn request(
        &self,
        command: HostCommand,
        reply: oneshot::Receiver<Result<(), EngineError>>,
    ) -> Result<(), HostError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HostError::Closed)?;
        reply
            .await
            .map_err(|_| HostError::Closed)?
            .map_err(HostError::Rejected)
    }
}

/// The host task: command loop plus timer management.
async fn run_session<P: LocationProvider>(
    mut engine: GameEngine<P>,
    mut commands: mpsc::Receiver<HostCommand>,
    events: broadcast::Sender<GameEvent>,
) {
    let (tick_tx, mut ticks) = mpsc::channel::<()>(8);
    let mut timer: Option<RoundTimer> = None;

    loop {
        let shutdown = tokio::select! {
            maybe_command = commands.recv() => {
                let Some(command) = maybe_command else {
                    // All handles dropped.
                    break;
                };
                let shutdown = matches!(command, HostCommand::Shutdown);
                handle_command(&mut engine, command);
                shutdown
            }
            Some(()) = ticks.recv() => {
                let outcome = engine.timer_tick();
                trace!(?outcome, "timer tick");
                false
            }
        };

        for event in engine.take_events() {
            debug!(event = ?event, "session event");
            // Send fails only when nobody is subscribed; that's fine.
            let _ = events.send(event);
        }

        // Reconcile the tick task with the round clock: arm on entry
        // to awaiting-guess, cancel on every exit.
        let clock_running = engine.session().timer_active;
        if clock_running && timer.is_none() {
            timer = Some(RoundTimer::spawn(tick_tx.clone()));
        } else if !clock_running {
            if let Some(t) = timer.take() {
                t.cancel();
            }
        }

        if shutdown {
            break;
        }
    }

    if let Some(t) = timer.take() {
        t.cancel();
    }
    debug!("session host stopped");
}

fn handle_command<P: LocationProvider>(engine: &mut GameEngine<P>, command: HostCommand) {
    match command {
        HostCommand::Start(reply) => {
            engine.start();
            let _ = reply.send(Ok(()));
        }
        HostCommand::SubmitGuess(guess, reply) => {
            let _ = reply.send(engine.submit_guess(guess));
        }
        HostCommand::NextRound(reply) => {
            let _ = reply.send(engine.next_round());
        }
        HostCommand::Reset(reply) => {
            engine.reset();
            let _ = reply.send(Ok(()));
        }
        HostCommand::UpdateSettings(update, reply) => {
            let _ = reply.send(engine.update_settings(update));
        }
        HostCommand::PauseTimer(reply) => {
            let _ = reply.send(engine.pause_timer());
        }
        HostCommand::ResumeTimer(reply) => {
            let _ = reply.send(engine.resume_timer());
        }
        HostCommand::Snapshot(reply) => {
            let _ = reply.send(engine.session().clone());
        }
        HostCommand::Shutdown => {}
    }
}
