//! Stop the running service through the init system

use crate::adapter::ServiceAdapter;
use crate::error::ServiceError;

pub async fn stop(adapter: &ServiceAdapter) -> Result<(), ServiceError> {
    log::debug!("Running {}", adapter.stop_command());
    adapter.stop().await?;

    println!("Service \"{}\" stopped.", adapter.config().display_name());

    Ok(())
}
