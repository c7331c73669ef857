use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ServiceError;
use crate::models::DayPolicySnapshot;
use crate::types::EmployeeId;

/// Source of the backend-computed policy for an employee and date.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulePolicyService: Send + Sync {
    async fn get_policy(
        &self,
        employee_id: Option<EmployeeId>,
        date: NaiveDate,
    ) -> Result<DayPolicySnapshot, ServiceError>;
}
