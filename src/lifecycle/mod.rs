//! Lifecycle runner
//!
//! Drives a service through Init, Start, the wait for a termination
//! request, and Stop. The whole run executes inside its own tokio task so a
//! panic in a callback surfaces at the join point as an error instead of
//! taking the process down with the service manager unaware.

mod state;

pub use state::LifecycleState;

use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::config::{Callback, CallbackError, ServiceConfig};
use crate::signals::TerminationRequest;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Init failed: {0}")]
    Init(#[source] CallbackError),

    #[error("Start failed: {0}")]
    Start(#[source] CallbackError),

    #[error("Stop failed: {0}")]
    Stop(#[source] CallbackError),

    #[error("Service panicked: {0}")]
    Panicked(String),
}

impl LifecycleError {
    /// The error returned by the user callback, if this came from one
    pub fn callback_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Init(e) | Self::Start(e) | Self::Stop(e) => Some(e.as_ref()),
            Self::Panicked(_) => None,
        }
    }
}

/// One run of a service's lifecycle
pub struct Lifecycle {
    config: Arc<ServiceConfig>,
    transitions: Mutex<Vec<LifecycleState>>,
}

impl Lifecycle {
    pub fn new(config: Arc<ServiceConfig>) -> Arc<Self> {
        Arc::new(Self {
            config,
            transitions: Mutex::new(vec![LifecycleState::Idle]),
        })
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        self.lock_transitions()
            .last()
            .copied()
            .unwrap_or(LifecycleState::Idle)
    }

    /// Every state entered so far, starting with `Idle`
    pub fn transitions(&self) -> Vec<LifecycleState> {
        self.lock_transitions().clone()
    }

    /// Run Init and Start, wait for one termination request, then run Stop.
    ///
    /// Only the first request is acted on; the channel is closed once it has
    /// been received. Errors from Init or Start skip every later phase. A
    /// Stop error is returned after the run reaches `Stopped`.
    pub async fn run(
        self: &Arc<Self>,
        termination: mpsc::Receiver<TerminationRequest>,
    ) -> Result<(), LifecycleError> {
        let this = Arc::clone(self);
        let task = tokio::spawn(async move { this.drive(termination).await });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                let message = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    "lifecycle task cancelled".to_string()
                };
                log::error!("SERVICE PANIC in {}: {}", self.config.name(), message);
                self.enter(LifecycleState::Failed);
                Err(LifecycleError::Panicked(message))
            }
        }
    }

    async fn drive(
        &self,
        mut termination: mpsc::Receiver<TerminationRequest>,
    ) -> Result<(), LifecycleError> {
        self.enter(LifecycleState::Initializing);
        if let Err(e) = self.init().await {
            self.enter(LifecycleState::Failed);
            return Err(LifecycleError::Init(e));
        }

        self.enter(LifecycleState::Starting);
        if let Err(e) = invoke(self.config.start.as_ref()) {
            self.enter(LifecycleState::Failed);
            return Err(LifecycleError::Start(e));
        }

        self.enter(LifecycleState::Running);

        let request = termination
            .recv()
            .await
            .unwrap_or(TerminationRequest::ChannelClosed);
        termination.close();

        if request == TerminationRequest::ChannelClosed {
            log::warn!("Termination channel closed, shutting down");
        } else {
            log::info!("Termination requested ({})", request.as_str());
        }

        self.enter(LifecycleState::Stopping);
        let result = invoke(self.config.stop.as_ref());
        self.enter(LifecycleState::Stopped);

        result.map_err(LifecycleError::Stop)
    }

    /// Init may block, so it runs on the blocking pool. A panic there is
    /// re-raised on this task to reach the fault barrier in `run`.
    async fn init(&self) -> Result<(), CallbackError> {
        let init = self.config.init.clone();
        match tokio::task::spawn_blocking(move || invoke(init.as_ref())).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(e.into()),
        }
    }

    fn enter(&self, next: LifecycleState) {
        let mut transitions = self.lock_transitions();
        let current = transitions.last().copied().unwrap_or(LifecycleState::Idle);

        if !current.can_transition_to(next) {
            log::warn!(
                "Unexpected lifecycle transition {} -> {}",
                current.as_str(),
                next.as_str()
            );
        }
        transitions.push(next);
        drop(transitions);

        let name = self.config.name();
        match next {
            LifecycleState::Idle => {}
            LifecycleState::Initializing => log::info!("Initing service {}", name),
            LifecycleState::Starting => log::info!("Starting service {}", name),
            LifecycleState::Running => log::info!("Service {} started", name),
            LifecycleState::Stopping => log::info!("Service {} shutting down", name),
            LifecycleState::Stopped => log::info!("Service {} down", name),
            LifecycleState::Failed => log::error!("Service {} failed", name),
        }
    }

    fn lock_transitions(&self) -> std::sync::MutexGuard<'_, Vec<LifecycleState>> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Call an optional callback; an absent one succeeds
fn invoke(callback: Option<&Callback>) -> Result<(), CallbackError> {
    match callback {
        Some(f) => f(),
        None => Ok(()),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
