//! The agent actor and its handle.

use tokio::sync::{mpsc, oneshot};
use vigil_activity::{IdleSweeper, Interaction, SweepConfig};
use vigil_model::{Role, Timestamp, UserRecord};
use vigil_session::SessionController;

use crate::AgentError;

/// Default command channel size. Session commands are human-paced, so a
/// small bounded channel is plenty.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Commands sent to the agent through its channel.
///
/// Variants with a `oneshot::Sender` are request/reply; the rest are
/// fire-and-forget signals.
enum AgentCommand {
    Login {
        identifier: String,
        secret: String,
        remember_me: bool,
        reply: oneshot::Sender<Result<(), AgentError>>,
    },
    Logout {
        reply: oneshot::Sender<()>,
    },
    SetRole {
        role: Role,
    },
    Interaction {
        interaction: Interaction,
    },
    ToggleFund {
        fund_id: String,
    },
    ClearFunds,
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown,
}

/// A point-in-time copy of the consumer-facing session state.
///
/// This is the read surface the presentation layer consumes: everything it
/// needs to decide what to render, in one coherent read.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    pub user: Option<UserRecord>,
    pub role: Role,
    pub login_time: Option<Timestamp>,
    pub last_activity_time: Option<Timestamp>,
    /// The one-shot "session expired" notice for the login view.
    pub is_session_expired: bool,
    pub selected_funds: Vec<String>,
}

impl SessionSnapshot {
    fn of(controller: &SessionController) -> Self {
        Self {
            is_authenticated: controller.is_authenticated(),
            user: controller.user().cloned(),
            role: controller.role(),
            login_time: controller.login_time(),
            last_activity_time: controller.last_activity_time(),
            is_session_expired: controller.is_session_expired(),
            selected_funds: controller.selected_funds().to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionHandle
// ---------------------------------------------------------------------------

/// Handle to the running session agent.
///
/// Cheap to clone — it's just an `mpsc::Sender` wrapper. Hand one to every
/// consumer that needs to read or mutate session state.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<AgentCommand>,
}

impl SessionHandle {
    /// Attempts a login. A credential rejection comes back as
    /// [`AgentError::Auth`]; the message is safe to surface verbatim.
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
        remember_me: bool,
    ) -> Result<(), AgentError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(AgentCommand::Login {
                identifier: identifier.to_owned(),
                secret: secret.to_owned(),
                remember_me,
                reply: reply_tx,
            })
            .await
            .map_err(|_| AgentError::Unavailable)?;
        reply_rx.await.map_err(|_| AgentError::Unavailable)?
    }

    /// Ends the session. Resolves once the agent has processed it.
    pub async fn logout(&self) -> Result<(), AgentError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(AgentCommand::Logout { reply: reply_tx })
            .await
            .map_err(|_| AgentError::Unavailable)?;
        reply_rx.await.map_err(|_| AgentError::Unavailable)
    }

    /// Switches the acting role (fire-and-forget; a no-op while logged
    /// out).
    pub async fn set_role(&self, role: Role) -> Result<(), AgentError> {
        self.sender
            .send(AgentCommand::SetRole { role })
            .await
            .map_err(|_| AgentError::Unavailable)
    }

    /// Reports a user interaction signal (fire-and-forget).
    pub async fn interaction(&self, interaction: Interaction) -> Result<(), AgentError> {
        self.sender
            .send(AgentCommand::Interaction { interaction })
            .await
            .map_err(|_| AgentError::Unavailable)
    }

    /// Toggles a fund in the ephemeral selection.
    pub async fn toggle_fund_selection(&self, fund_id: &str) -> Result<(), AgentError> {
        self.sender
            .send(AgentCommand::ToggleFund {
                fund_id: fund_id.to_owned(),
            })
            .await
            .map_err(|_| AgentError::Unavailable)
    }

    pub async fn clear_selected_funds(&self) -> Result<(), AgentError> {
        self.sender
            .send(AgentCommand::ClearFunds)
            .await
            .map_err(|_| AgentError::Unavailable)
    }

    /// Requests a coherent copy of the current session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, AgentError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(AgentCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| AgentError::Unavailable)?;
        reply_rx.await.map_err(|_| AgentError::Unavailable)
    }

    /// Tells the agent to shut down. The task detaches its sweeper and
    /// exits; subsequent calls on any handle return
    /// [`AgentError::Unavailable`].
    pub async fn shutdown(&self) -> Result<(), AgentError> {
        self.sender
            .send(AgentCommand::Shutdown)
            .await
            .map_err(|_| AgentError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// Agent actor
// ---------------------------------------------------------------------------

/// The internal agent state. Runs inside a Tokio task.
struct AgentActor {
    controller: SessionController,
    sweep: SweepConfig,
    receiver: mpsc::Receiver<AgentCommand>,
}

impl AgentActor {
    /// Runs the agent loop, processing commands and sweeps until shutdown.
    async fn run(mut self) {
        tracing::info!("session agent started");

        // Restore once at startup, before any command can arrive.
        self.controller.restore();

        let mut sweeper = IdleSweeper::new(self.sweep);

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if self.handle(cmd) {
                                break;
                            }
                        }
                        // Every handle dropped — tear down.
                        None => break,
                    }
                }
                _ = sweeper.wait_for_sweep() => {
                    self.controller.check_idle();
                }
            }
        }

        tracing::info!("session agent stopped");
    }

    /// Processes one command. Returns `true` on shutdown.
    fn handle(&mut self, cmd: AgentCommand) -> bool {
        match cmd {
            AgentCommand::Login {
                identifier,
                secret,
                remember_me,
                reply,
            } => {
                let result = self
                    .controller
                    .login(&identifier, &secret, remember_me)
                    .map_err(AgentError::from);
                let _ = reply.send(result);
            }
            AgentCommand::Logout { reply } => {
                self.controller.logout();
                let _ = reply.send(());
            }
            AgentCommand::SetRole { role } => {
                self.controller.set_role(role);
            }
            AgentCommand::Interaction { interaction } => {
                self.controller.record_interaction(interaction);
            }
            AgentCommand::ToggleFund { fund_id } => {
                self.controller.toggle_fund_selection(&fund_id);
            }
            AgentCommand::ClearFunds => {
                self.controller.clear_selected_funds();
            }
            AgentCommand::Snapshot { reply } => {
                let _ = reply.send(SessionSnapshot::of(&self.controller));
            }
            AgentCommand::Shutdown => {
                tracing::info!("session agent shutting down");
                return true;
            }
        }
        false
    }
}

/// Spawns the session agent task and returns a handle to it.
///
/// The agent restores any persisted session before processing its first
/// command, so an immediate [`SessionHandle::snapshot`] already reflects
/// the restored state.
pub fn spawn_agent(controller: SessionController, sweep: SweepConfig) -> SessionHandle {
    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

    let actor = AgentActor {
        controller,
        sweep,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle { sender: tx }
}
