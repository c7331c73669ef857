//! Approval decisions recorded against a daily record.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::DailyRecord;
use crate::types::DailyRecordId;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApprovalActions: Send + Sync {
    async fn set_supervisor_approval(
        &self,
        record_id: DailyRecordId,
        approved: bool,
        comment: Option<String>,
    ) -> Result<DailyRecord, ServiceError>;

    async fn set_hr_approval(
        &self,
        record_id: DailyRecordId,
        approved: bool,
        comment: Option<String>,
    ) -> Result<DailyRecord, ServiceError>;
}
