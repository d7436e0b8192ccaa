//! nativesvc - run a process as a native OS service
//!
//! An application supplies its metadata and three optional callbacks
//! (Init, Start, Stop). The crate then:
//! - Renders and installs the init system's descriptor (upstart job,
//!   launchd plist, or systemd unit)
//! - Starts and stops the installed service through the control program
//! - Runs the process as the service, calling Stop exactly once when the OS
//!   asks it to terminate
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Command dispatcher                  │
//! ├─────────────────────────────────────────────────┤
//! │        Service adapter         │   Lifecycle    │
//! ├────────────────────────────────┤    runner      │
//! │  Descriptors  │ Control program│  (signals)     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ```no_run
//! use nativesvc::ServiceConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::from_current_exe("mysvc")?
//!         .display_name("My Service")
//!         .on_start(|| Ok(()))
//!         .on_stop(|| Ok(()))
//!         .build()?;
//!
//!     nativesvc::dispatch(config).await?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod commands;
pub mod config;
pub mod control;
pub mod descriptor;
pub mod error;
pub mod lifecycle;
pub mod platform;
pub mod signals;

pub use adapter::ServiceAdapter;
pub use commands::{dispatch, dispatch_from, Verb};
pub use config::{Callback, CallbackError, ServiceConfig, ServiceMetadata};
pub use error::ServiceError;
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleState};
pub use platform::Platform;
pub use signals::TerminationRequest;
