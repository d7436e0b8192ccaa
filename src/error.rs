//! Errors reported by install/remove/start/stop and the dispatcher

use std::path::PathBuf;

use crate::control::ControlError;
use crate::lifecycle::LifecycleError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid service name '{0}': {1}")]
    InvalidName(String, &'static str),

    #[error("Executable name must not be empty")]
    MissingExecutable,

    #[error("Init already exists: {}", .0.display())]
    AlreadyInstalled(PathBuf),

    #[error("Service is not installed: {}", .0.display())]
    NotInstalled(PathBuf),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Signal setup failed: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Failed to read console input: {0}")]
    Console(#[source] std::io::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
