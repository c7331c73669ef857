use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned code naming the policy family of an employee's day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleTypeCode(String);

impl ScheduleTypeCode {
    pub const DEFAULT: &'static str = "DEFAULT";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ScheduleTypeCode {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ScheduleTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScheduleTypeCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftLabel {
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "N")]
    Night,
}

impl ShiftLabel {
    pub fn code(&self) -> &'static str {
        match self {
            ShiftLabel::Day => "D",
            ShiftLabel::Night => "N",
        }
    }
}

/// Facts the backend computed for one employee and date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPolicySnapshot {
    #[serde(default)]
    pub schedule_type: ScheduleTypeCode,
    #[serde(default)]
    pub policy_start_time: String,
    #[serde(default)]
    pub policy_end_time: String,
    #[serde(default)]
    pub is_rest_day: bool,
    #[serde(default)]
    pub is_holiday: bool,
    #[serde(default)]
    pub holiday_name: Option<String>,
    #[serde(default)]
    pub expected_labor_hours: f64,
    #[serde(default)]
    pub expected_labor_hours_if_not_holiday: f64,
}

impl DayPolicySnapshot {
    /// The policy window when both ends are present.
    pub fn window(&self) -> Option<(&str, &str)> {
        if self.policy_start_time.is_empty() || self.policy_end_time.is_empty() {
            None
        } else {
            Some((&self.policy_start_time, &self.policy_end_time))
        }
    }

    /// Expected hours the backend would have required on a regular day,
    /// sent along with holiday saves.
    pub fn holiday_hours_override(&self) -> Option<f64> {
        self.is_holiday
            .then_some(self.expected_labor_hours_if_not_holiday)
    }
}
