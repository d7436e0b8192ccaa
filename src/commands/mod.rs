//! Command dispatcher
//!
//! The first argument selects a verb: `install | remove | debug | start | stop`.
//! With no argument the process runs as the service itself, which is how the
//! init system launches it.

mod debug;
mod install;
mod remove;
mod start;
mod stop;

pub use debug::{debug, debug_with_input};
pub use install::install;
pub use remove::remove;
pub use start::start;
pub use stop::stop;

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::adapter::ServiceAdapter;
use crate::config::ServiceConfig;
use crate::error::ServiceError;

#[derive(Parser)]
#[command(disable_help_subcommand = true)]
struct Args {
    #[command(subcommand)]
    verb: Option<Verb>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Install the running executable as a service
    Install,
    /// Remove the service from the system
    Remove,
    /// Run Start/Stop in the foreground, stopping on a line of input
    Debug,
    /// Start the service via the init system
    Start,
    /// Stop the service via the init system
    Stop,
}

/// Parse the verb from a full argument list (program name first).
///
/// `Ok(None)` means run as the service; `Err` carries the usage line for an
/// unrecognised invocation.
pub fn parse_verb<I, T>(args: I) -> Result<Option<Verb>, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let program = args
        .first()
        .map(|a| a.to_string_lossy().into_owned())
        .unwrap_or_else(|| "service".to_string());

    match Args::try_parse_from(&args) {
        Ok(parsed) => Ok(parsed.verb),
        Err(e) => {
            log::debug!("Argument parsing failed: {}", e);
            Err(usage(&program))
        }
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Options for \"{}\": (install | remove | debug | start | stop)",
        program
    )
}

/// Handle the process's command line for `config`.
///
/// Blocks until the service stops when no verb is given.
pub async fn dispatch(config: ServiceConfig) -> Result<(), ServiceError> {
    dispatch_from(config, std::env::args_os()).await
}

pub async fn dispatch_from<I, T>(config: ServiceConfig, args: I) -> Result<(), ServiceError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let verb = match parse_verb(args) {
        Ok(verb) => verb,
        Err(usage) => {
            println!("{}", usage);
            return Ok(());
        }
    };

    // debug only needs the callbacks, not an init system
    if verb == Some(Verb::Debug) {
        return log_failure(verb, debug(&config).await);
    }

    let adapter = ServiceAdapter::native(Arc::new(config)).map_err(|e| {
        log::error!("Service unable to start: {}", e);
        e
    })?;

    execute(&adapter, verb).await
}

/// Run one verb (or the service itself) against an adapter
pub async fn execute(adapter: &ServiceAdapter, verb: Option<Verb>) -> Result<(), ServiceError> {
    let result = match verb {
        None => adapter.run().await,
        Some(Verb::Install) => install(adapter).await,
        Some(Verb::Remove) => remove(adapter).await,
        Some(Verb::Debug) => debug(adapter.config()).await,
        Some(Verb::Start) => start(adapter).await,
        Some(Verb::Stop) => stop(adapter).await,
    };

    log_failure(verb, result)
}

fn log_failure(verb: Option<Verb>, result: Result<(), ServiceError>) -> Result<(), ServiceError> {
    if let Err(e) = &result {
        let action = match verb {
            None => "run",
            Some(Verb::Install) => "install",
            Some(Verb::Remove) => "remove",
            Some(Verb::Debug) => "debug",
            Some(Verb::Start) => "start",
            Some(Verb::Stop) => "stop",
        };
        log::error!("Failed to {}: {}", action, e);
    }

    result
}
