//! Start the installed service through the init system

use crate::adapter::ServiceAdapter;
use crate::error::ServiceError;

pub async fn start(adapter: &ServiceAdapter) -> Result<(), ServiceError> {
    log::debug!("Running {}", adapter.start_command());
    adapter.start().await?;

    println!("Service \"{}\" started.", adapter.config().display_name());

    Ok(())
}
