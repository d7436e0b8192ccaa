//! Install the service descriptor

use crate::adapter::ServiceAdapter;
use crate::error::ServiceError;

pub async fn install(adapter: &ServiceAdapter) -> Result<(), ServiceError> {
    let path = adapter.install().await?;

    println!(
        "Service \"{}\" installed.",
        adapter.config().display_name()
    );
    log::debug!("Descriptor written to {}", path.display());

    Ok(())
}
