use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::Job;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobCatalog: Send + Sync {
    /// Every job, active or not. Filtering happens in `services::jobs`.
    async fn list_jobs(&self) -> Result<Vec<Job>, ServiceError>;
}
