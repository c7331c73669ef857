//! Persistence seam for daily records.
//!
//! The store replaces a whole day at a time; there is no partial update of
//! individual activities.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ServiceError;
use crate::models::{DailyRecord, DayReplacement};
use crate::types::EmployeeId;

/// Use `MockDailyRecordStore` in unit tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyRecordStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved for the date yet.
    async fn fetch_by_date(
        &self,
        employee_id: Option<EmployeeId>,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, ServiceError>;

    /// Replaces everything held for `day.date` and returns the stored record.
    async fn replace_day(
        &self,
        employee_id: Option<EmployeeId>,
        day: &DayReplacement,
    ) -> Result<DailyRecord, ServiceError>;
}
