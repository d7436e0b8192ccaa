//! Lifecycle state machine
//!
//! ```text
//!     ┌──────────────┐
//!     │     Idle     │
//!     └──────┬───────┘
//!            │ run
//!     ┌──────▼───────┐
//!     │ Initializing │───────────┐
//!     └──────┬───────┘           │
//!            │ init ok           │
//!     ┌──────▼───────┐           │ callback error
//!     │   Starting   │───────────┤ or panic
//!     └──────┬───────┘           │
//!            │ start ok          │
//!     ┌──────▼───────┐      ┌────▼────┐
//!     │   Running    │─────►│ Failed  │
//!     └──────┬───────┘      └────▲────┘
//!            │ termination       │
//!     ┌──────▼───────┐           │
//!     │   Stopping   │───────────┘
//!     └──────┬───────┘
//!            │ stop returned
//!     ┌──────▼───────┐
//!     │   Stopped    │
//!     └──────────────┘
//! ```
//!
//! A Stop callback error still ends in `Stopped`; the error is returned to
//! the caller.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Initializing,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;

        match (self, next) {
            (Idle, Initializing)
            | (Initializing, Starting)
            | (Starting, Running)
            | (Running, Stopping)
            | (Stopping, Stopped) => true,
            (current, Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}
