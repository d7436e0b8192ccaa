//! Run the service in the foreground
//!
//! Start is called, then one line of console input (or EOF) triggers Stop.
//! Init is not called in this mode.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::lifecycle::LifecycleError;

pub async fn debug(config: &ServiceConfig) -> Result<(), ServiceError> {
    debug_with_input(config, BufReader::new(tokio::io::stdin())).await
}

pub async fn debug_with_input<R>(config: &ServiceConfig, mut input: R) -> Result<(), ServiceError>
where
    R: AsyncBufRead + Unpin,
{
    if let Some(start) = &config.start {
        start().map_err(LifecycleError::Start)?;
    }

    println!("Starting Up In Debug Mode");

    let mut line = String::new();
    input
        .read_line(&mut line)
        .await
        .map_err(ServiceError::Console)?;

    println!("Shutting Down");

    if let Some(stop) = &config.stop {
        stop().map_err(LifecycleError::Stop)?;
    }

    Ok(())
}
