//! Per-schedule-type policies for the day configuration form.
//!
//! Every schedule type code maps to exactly one [`ScheduleVariant`], and each
//! variant owns a complete [`RuleEngine`]. Engines share small helpers from
//! [`shared`] but never delegate to one another, so a change to one policy
//! stays local to its file.

mod default;
mod fixed;
mod flexible;
pub(crate) mod shared;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DayConfiguration, DayPolicySnapshot, ScheduleTypeCode, ShiftLabel};

pub use default::DefaultRules;
pub use fixed::{FixedEditableRules, FixedLockedRestDayRules, FixedRules, FixedTwelveHourRules};
pub use flexible::{FlexibleLockedRules, FlexibleRotatingRules, FlexibleRules};

/// Fields of the day configuration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayField {
    EntryTime,
    ExitTime,
    ShiftLabel,
    IsRestDay,
    IsNonWorkingDay,
    IsDisabilityLeave,
    IsContinuousShift,
    EmployeeComment,
}

impl DayField {
    pub const ALL: [DayField; 8] = [
        DayField::EntryTime,
        DayField::ExitTime,
        DayField::ShiftLabel,
        DayField::IsRestDay,
        DayField::IsNonWorkingDay,
        DayField::IsDisabilityLeave,
        DayField::IsContinuousShift,
        DayField::EmployeeComment,
    ];
}

/// How a form field is presented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub visible: bool,
    pub enabled: bool,
    pub required: bool,
    pub default_value: Option<String>,
    pub helper_text: Option<&'static str>,
}

impl FieldState {
    pub fn editable() -> Self {
        Self {
            visible: true,
            enabled: true,
            ..Default::default()
        }
    }

    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::editable()
        }
    }

    pub fn read_only() -> Self {
        Self {
            visible: true,
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_helper(mut self, text: &'static str) -> Self {
        self.helper_text = Some(text);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_editable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// A user edit to one field, carrying the new value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    EntryTime(String),
    ExitTime(String),
    ShiftLabel(Option<ShiftLabel>),
    RestDay(bool),
    NonWorkingDay(bool),
    DisabilityLeave(bool),
    ContinuousShift(bool),
    EmployeeComment(String),
}

impl FieldChange {
    pub fn field(&self) -> DayField {
        match self {
            FieldChange::EntryTime(_) => DayField::EntryTime,
            FieldChange::ExitTime(_) => DayField::ExitTime,
            FieldChange::ShiftLabel(_) => DayField::ShiftLabel,
            FieldChange::RestDay(_) => DayField::IsRestDay,
            FieldChange::NonWorkingDay(_) => DayField::IsNonWorkingDay,
            FieldChange::DisabilityLeave(_) => DayField::IsDisabilityLeave,
            FieldChange::ContinuousShift(_) => DayField::IsContinuousShift,
            FieldChange::EmployeeComment(_) => DayField::EmployeeComment,
        }
    }
}

/// What an engine may consult besides the form itself: the calendar date
/// being edited, the backend's snapshot for it and the local date of the
/// moment the rule runs.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub date: NaiveDate,
    pub today: NaiveDate,
    pub policy: Option<&'a DayPolicySnapshot>,
}

impl<'a> RuleContext<'a> {
    /// `today` starts out equal to `date`; see [`RuleContext::with_today`].
    pub fn new(date: NaiveDate, policy: Option<&'a DayPolicySnapshot>) -> Self {
        Self {
            date,
            today: date,
            policy,
        }
    }

    pub fn with_today(self, today: NaiveDate) -> Self {
        Self { today, ..self }
    }
}

pub trait RuleEngine: Send + Sync {
    fn variant(&self) -> ScheduleVariant;

    fn field_state(&self, field: DayField) -> FieldState;

    /// Hours the employee is expected to work. Zero on holidays, rest days,
    /// non-working days, disability leave and empty windows.
    fn normal_hours(&self, config: &DayConfiguration, ctx: &RuleContext<'_>) -> f64;

    fn lunch_hours(&self, config: &DayConfiguration) -> f64;

    /// Merges the backend snapshot into `prev`, which already carries the
    /// persisted record when `has_existing_record` is set.
    fn apply_policy_defaults(
        &self,
        prev: &DayConfiguration,
        policy: &DayPolicySnapshot,
        has_existing_record: bool,
    ) -> DayConfiguration;

    fn on_field_change(
        &self,
        change: FieldChange,
        prev: &DayConfiguration,
        ctx: &RuleContext<'_>,
    ) -> DayConfiguration;
}

/// Closed set of schedule policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleVariant {
    Default,
    Fixed,
    FixedEditable,
    FixedLockedRestDay,
    FixedTwelveHour,
    Flexible,
    FlexibleLocked,
    FlexibleRotating,
}

impl ScheduleVariant {
    /// Exact-match lookup; unknown codes fall back to [`ScheduleVariant::Default`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "H1" => ScheduleVariant::Fixed,
            "H1_1" | "H1_2" | "H1_3" | "H1_4" | "H1_5" => ScheduleVariant::FixedEditable,
            "H1_6" => ScheduleVariant::FixedLockedRestDay,
            "H1_7" => ScheduleVariant::FixedTwelveHour,
            "H2" => ScheduleVariant::Flexible,
            "H2_1" => ScheduleVariant::FlexibleLocked,
            "H2_2" => ScheduleVariant::FlexibleRotating,
            _ => ScheduleVariant::Default,
        }
    }

    pub fn engine(self) -> &'static dyn RuleEngine {
        match self {
            ScheduleVariant::Default => &DefaultRules,
            ScheduleVariant::Fixed => &FixedRules,
            ScheduleVariant::FixedEditable => &FixedEditableRules,
            ScheduleVariant::FixedLockedRestDay => &FixedLockedRestDayRules,
            ScheduleVariant::FixedTwelveHour => &FixedTwelveHourRules,
            ScheduleVariant::Flexible => &FlexibleRules,
            ScheduleVariant::FlexibleLocked => &FlexibleLockedRules,
            ScheduleVariant::FlexibleRotating => &FlexibleRotatingRules,
        }
    }
}

/// Selects the engine for a schedule type code.
pub fn resolve(code: &ScheduleTypeCode) -> &'static dyn RuleEngine {
    ScheduleVariant::from_code(code.as_str()).engine()
}
