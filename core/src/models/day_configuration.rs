use serde::{Deserialize, Serialize};

use crate::models::daily_record::DailyRecord;
use crate::models::schedule::{DayPolicySnapshot, ShiftLabel};
use crate::utils::time::{day_bounds, instant_to_time, time_to_minutes, DayBounds};

/// Mutable form state for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayConfiguration {
    #[serde(default)]
    pub entry_time: String,
    #[serde(default)]
    pub exit_time: String,
    #[serde(default)]
    pub shift_label: Option<ShiftLabel>,
    #[serde(default)]
    pub is_rest_day: bool,
    /// Client-only. Zeroes the day without making it a rest day and is
    /// never serialized, so it cannot reach the backend.
    #[serde(skip)]
    pub is_non_working_day: bool,
    #[serde(default)]
    pub is_disability_leave: bool,
    #[serde(default)]
    pub is_continuous_shift: bool,
    #[serde(default)]
    pub employee_comment: String,
}

impl DayConfiguration {
    pub fn from_record(record: &DailyRecord) -> Self {
        Self {
            entry_time: record
                .entry_timestamp
                .as_ref()
                .map(instant_to_time)
                .unwrap_or_default(),
            exit_time: record
                .exit_timestamp
                .as_ref()
                .map(instant_to_time)
                .unwrap_or_default(),
            shift_label: record.shift_label,
            is_rest_day: record.is_rest_day,
            is_non_working_day: false,
            is_disability_leave: record.is_disability_leave,
            is_continuous_shift: record.is_continuous_shift,
            employee_comment: record.employee_comment.clone(),
        }
    }

    pub fn bounds(&self) -> Option<DayBounds> {
        day_bounds(&self.entry_time, &self.exit_time)
    }

    pub fn has_same_entry_exit(&self) -> bool {
        match (
            time_to_minutes(&self.entry_time),
            time_to_minutes(&self.exit_time),
        ) {
            (Some(entry), Some(exit)) => entry == exit,
            _ => self.entry_time == self.exit_time,
        }
    }

    /// Rest, holiday, non-working, disability or an empty window.
    pub fn is_zero_hour_day(&self, policy: Option<&DayPolicySnapshot>) -> bool {
        policy.is_some_and(|policy| policy.is_holiday)
            || self.is_rest_day
            || self.is_non_working_day
            || self.is_disability_leave
            || self.has_same_entry_exit()
    }

    /// Field-by-field comparison with what the backend holds.
    pub fn differs_from(&self, record: &DailyRecord) -> bool {
        let persisted = Self::from_record(record);
        self.entry_time != persisted.entry_time
            || self.exit_time != persisted.exit_time
            || self.shift_label != persisted.shift_label
            || self.is_rest_day != persisted.is_rest_day
            || self.is_disability_leave != persisted.is_disability_leave
            || self.is_continuous_shift != persisted.is_continuous_shift
            || self.employee_comment != persisted.employee_comment
    }
}
