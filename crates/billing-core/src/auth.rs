//! # Auth State Gate
//!
//! A barrier that lets callers wait until a shared authentication state has
//! settled. The auth subsystem publishes through `AuthStateChannel`; each
//! `AuthStateGate` observes transitions in order and resolves on the first
//! terminal value it sees.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{timeout, Duration};

/// Authentication state of the current user session.
///
/// `Unknown` is the only non-terminal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthState {
    Unknown,
    Authed,
    NotAuthed,
}

impl AuthState {
    /// Terminal states need no further waiting
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthState::Unknown => "unknown",
            AuthState::Authed => "authed",
            AuthState::NotAuthed => "not-authed",
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        AuthState::Unknown
    }
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a gate stopped waiting without a terminal state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthGateError {
    /// Every publisher handle was dropped while the state was still unknown
    #[error("auth state publisher closed before a terminal state was reached")]
    Closed,

    /// The bounded wait expired
    #[error("timed out after {0:?} waiting for a terminal auth state")]
    TimedOut(Duration),
}

/// Typed publisher for the shared auth state.
///
/// Held by the authentication subsystem; everything else only subscribes.
/// Uses `tokio::sync::watch` so each gate sees state changes in order.
#[derive(Debug, Clone)]
pub struct AuthStateChannel {
    sender: std::sync::Arc<watch::Sender<AuthState>>,
}

impl AuthStateChannel {
    /// Create a channel starting at `Unknown`.
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(AuthState::Unknown);
        Self {
            sender: std::sync::Arc::new(sender),
        }
    }

    /// Publish a new state to all gates.
    pub fn set(&self, state: AuthState) {
        self.sender.send_replace(state);
    }

    /// The state as of now.
    pub fn current(&self) -> AuthState {
        *self.sender.borrow()
    }

    /// Install a new gate. Each gate is independent; dropping it
    /// unsubscribes.
    pub fn subscribe(&self) -> AuthStateGate {
        AuthStateGate {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for AuthStateChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// A one-shot barrier over the auth state.
///
/// Consumed by waiting: the gate resolves exactly once, to the first terminal
/// state it observes, and its subscription is removed when it resolves or is
/// dropped. Cancellation is by dropping the future (`tokio::select!`).
pub struct AuthStateGate {
    receiver: watch::Receiver<AuthState>,
}

impl AuthStateGate {
    /// Wait until the state is terminal and yield it.
    ///
    /// A state already terminal at subscription time resolves immediately.
    /// If the state never leaves `Unknown` this never completes; use
    /// [`wait_resolved_timeout`](Self::wait_resolved_timeout) for a bounded
    /// wait.
    pub async fn wait_resolved(mut self) -> Result<AuthState, AuthGateError> {
        loop {
            let state = *self.receiver.borrow_and_update();
            if state.is_terminal() {
                return Ok(state);
            }
            if self.receiver.changed().await.is_err() {
                return Err(AuthGateError::Closed);
            }
        }
    }

    /// Bounded-wait variant: expiry yields `AuthGateError::TimedOut` instead
    /// of hanging forever on a stalled auth state.
    pub async fn wait_resolved_timeout(
        self,
        max_wait: Duration,
    ) -> Result<AuthState, AuthGateError> {
        match timeout(max_wait, self.wait_resolved()).await {
            Ok(result) => result,
            Err(_) => Err(AuthGateError::TimedOut(max_wait)),
        }
    }
}
