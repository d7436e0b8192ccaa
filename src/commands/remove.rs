//! Remove the service descriptor

use crate::adapter::ServiceAdapter;
use crate::error::ServiceError;

pub async fn remove(adapter: &ServiceAdapter) -> Result<(), ServiceError> {
    adapter.remove().await?;

    println!("Service \"{}\" removed.", adapter.config().display_name());

    Ok(())
}
