use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::schedule::ShiftLabel;
use crate::types::{ActivityId, DailyRecordId, JobId};
use crate::utils::time::instant_to_time;

/// One logged work item within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ActivityId>,
    pub description: String,
    pub duration_hours: f64,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub is_extra: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_compensatory: bool,
}

impl Activity {
    pub fn interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.start_time.zip(self.end_time)
    }

    pub fn is_time_bounded(&self) -> bool {
        self.interval().is_some()
    }

    /// Start and end as wall-clock `"HH:MM"`.
    pub fn wall_clock(&self) -> Option<(String, String)> {
        self.interval()
            .map(|(start, end)| (instant_to_time(&start), instant_to_time(&end)))
    }
}

/// Outcome of the two approval levels on a daily record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    SupervisorApproved,
    SupervisorRejected,
    HrApproved,
    HrRejected,
}

/// The persisted aggregate for one employee and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: DailyRecordId,
    pub date: NaiveDate,
    #[serde(default)]
    pub entry_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exit_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shift_label: Option<ShiftLabel>,
    #[serde(default)]
    pub is_rest_day: bool,
    #[serde(default)]
    pub is_disability_leave: bool,
    #[serde(default)]
    pub is_continuous_shift: bool,
    #[serde(default)]
    pub employee_comment: String,
    #[serde(default)]
    pub supervisor_approval: Option<bool>,
    #[serde(default)]
    pub hr_approval: Option<bool>,
    #[serde(default)]
    pub supervisor_comment: Option<String>,
    #[serde(default)]
    pub hr_comment: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl DailyRecord {
    pub fn approval_status(&self) -> ApprovalStatus {
        match (self.supervisor_approval, self.hr_approval) {
            (_, Some(true)) => ApprovalStatus::HrApproved,
            (_, Some(false)) => ApprovalStatus::HrRejected,
            (Some(true), None) => ApprovalStatus::SupervisorApproved,
            (Some(false), None) => ApprovalStatus::SupervisorRejected,
            (None, None) => ApprovalStatus::Pending,
        }
    }

    /// Any approval decision freezes the record for the employee.
    pub fn is_locked(&self) -> bool {
        self.supervisor_approval.is_some() || self.hr_approval.is_some()
    }
}

/// Whole-day payload for the store. The backend replaces everything it has
/// for `date` with this content; there is no partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReplacement {
    pub date: NaiveDate,
    pub entry_timestamp: DateTime<Utc>,
    pub exit_timestamp: DateTime<Utc>,
    pub shift_label: Option<ShiftLabel>,
    pub is_rest_day: bool,
    pub is_disability_leave: bool,
    pub is_continuous_shift: bool,
    pub employee_comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_hours: Option<f64>,
    pub activities: Vec<Activity>,
}
