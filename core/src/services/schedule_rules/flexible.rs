//! The flexible-shift family (`H2` and its variants): twelve-hour day or
//! night rotations chosen with the shift selector.

use chrono::{Datelike, Weekday};

use crate::models::{DayConfiguration, DayPolicySnapshot, ShiftLabel};
use crate::services::schedule_rules::shared::{
    apply_locked_times_change, apply_plain_edit, collapse_window, default_entry,
    fill_blank_times, label_for_window, overwrite_times, seed_zero_hour_window,
    span_minus_lunch, standard_lunch, toggle_zero_hour_flag,
};
use crate::services::schedule_rules::{
    DayField, FieldChange, FieldState, RuleContext, RuleEngine, ScheduleVariant,
};

const DAY_WINDOW: (&str, &str) = ("07:00", "19:00");
const NIGHT_WINDOW: (&str, &str) = ("19:00", "07:00");
/// Tuesday nights end at one in the morning on the rotating calendar.
const SHORT_NIGHT_WINDOW: (&str, &str) = ("19:00", "01:00");
const SHORT_NIGHT_WEEKDAY: Weekday = Weekday::Tue;
const SHORT_NIGHT_HOURS: f64 = 6.0;
const ROTATING_REST_TIME: &str = "07:00";

fn owned((entry, exit): (&str, &str)) -> (String, String) {
    (entry.to_string(), exit.to_string())
}

/// Keyed on the day the rule runs, not on the date being edited.
fn is_short_night(config: &DayConfiguration, ctx: &RuleContext<'_>) -> bool {
    config.shift_label == Some(ShiftLabel::Night) && ctx.today.weekday() == SHORT_NIGHT_WEEKDAY
}

/// Lunch-free hours with the short Tuesday night.
fn rotation_hours(config: &DayConfiguration, ctx: &RuleContext<'_>) -> f64 {
    if config.is_zero_hour_day(ctx.policy) {
        return 0.0;
    }
    if is_short_night(config, ctx) {
        return SHORT_NIGHT_HOURS;
    }
    span_minus_lunch(config, ctx, 0.0)
}

fn rotation_field_state(field: DayField) -> FieldState {
    match field {
        DayField::EntryTime | DayField::ExitTime | DayField::ShiftLabel => FieldState::required(),
        DayField::IsNonWorkingDay | DayField::IsContinuousShift => FieldState::hidden(),
        DayField::IsRestDay | DayField::IsDisabilityLeave | DayField::EmployeeComment => {
            FieldState::editable()
        }
    }
}

fn rotation_defaults(
    prev: &DayConfiguration,
    policy: &DayPolicySnapshot,
    has_existing_record: bool,
) -> DayConfiguration {
    let mut next = prev.clone();
    fill_blank_times(&mut next, policy);
    next.is_continuous_shift = false;
    if !has_existing_record {
        next.is_rest_day = policy.is_rest_day;
    }
    if next.shift_label.is_none() {
        next.shift_label = label_for_window(&next.entry_time, &next.exit_time);
    }
    seed_zero_hour_window(&mut next, policy, has_existing_record);
    next
}

fn policy_or_day_window(policy: Option<&DayPolicySnapshot>) -> (String, String) {
    policy
        .and_then(DayPolicySnapshot::window)
        .map(owned)
        .unwrap_or_else(|| owned(DAY_WINDOW))
}

/// `H2`: the selector picks a fixed day or night window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleRules;

impl RuleEngine for FlexibleRules {
    fn variant(&self) -> ScheduleVariant {
        ScheduleVariant::Flexible
    }

    fn field_state(&self, field: DayField) -> FieldState {
        rotation_field_state(field)
    }

    fn normal_hours(&self, config: &DayConfiguration, ctx: &RuleContext<'_>) -> f64 {
        rotation_hours(config, ctx)
    }

    fn lunch_hours(&self, _config: &DayConfiguration) -> f64 {
        0.0
    }

    fn apply_policy_defaults(
        &self,
        prev: &DayConfiguration,
        policy: &DayPolicySnapshot,
        has_existing_record: bool,
    ) -> DayConfiguration {
        rotation_defaults(prev, policy, has_existing_record)
    }

    fn on_field_change(
        &self,
        change: FieldChange,
        prev: &DayConfiguration,
        ctx: &RuleContext<'_>,
    ) -> DayConfiguration {
        if let Some(next) = apply_plain_edit(prev, &change) {
            return next;
        }
        let restore = |_: &DayConfiguration| Some(policy_or_day_window(ctx.policy));
        match change {
            FieldChange::ShiftLabel(label) => {
                let mut next = DayConfiguration {
                    shift_label: label,
                    ..prev.clone()
                };
                let window = match label {
                    Some(ShiftLabel::Day) => Some(DAY_WINDOW),
                    Some(ShiftLabel::Night) => Some(NIGHT_WINDOW),
                    None => None,
                };
                if let Some((entry, exit)) = window.map(owned) {
                    next.entry_time = entry;
                    next.exit_time = exit;
                }
                next
            }
            FieldChange::RestDay(value) => {
                toggle_zero_hour_flag(prev, |c| c.is_rest_day = value, ctx, restore)
            }
            FieldChange::DisabilityLeave(value) => {
                toggle_zero_hour_flag(prev, |c| c.is_disability_leave = value, ctx, restore)
            }
            _ => prev.clone(),
        }
    }
}

/// `H2_2`: windows depend on the weekday of the edited date and rest days
/// park the form at seven in the morning with no shift.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleRotatingRules;

impl FlexibleRotatingRules {
    fn window_for(label: ShiftLabel, ctx: &RuleContext<'_>) -> (&'static str, &'static str) {
        match label {
            ShiftLabel::Day => DAY_WINDOW,
            ShiftLabel::Night if ctx.date.weekday() == SHORT_NIGHT_WEEKDAY => SHORT_NIGHT_WINDOW,
            ShiftLabel::Night => NIGHT_WINDOW,
        }
    }

    fn toggle_rest(
        prev: &DayConfiguration,
        apply: impl FnOnce(&mut DayConfiguration),
        ctx: &RuleContext<'_>,
    ) -> DayConfiguration {
        let mut next = prev.clone();
        apply(&mut next);
        let was_off = prev.is_rest_day || prev.is_disability_leave;
        let is_off = next.is_rest_day || next.is_disability_leave;
        if is_off && !was_off {
            collapse_window(&mut next, ROTATING_REST_TIME.to_string());
            next.shift_label = None;
        } else if was_off && !is_off {
            let (entry, exit) = policy_or_day_window(ctx.policy);
            next.shift_label = label_for_window(&entry, &exit);
            next.entry_time = entry;
            next.exit_time = exit;
        }
        next
    }
}

impl RuleEngine for FlexibleRotatingRules {
    fn variant(&self) -> ScheduleVariant {
        ScheduleVariant::FlexibleRotating
    }

    fn field_state(&self, field: DayField) -> FieldState {
        rotation_field_state(field)
    }

    fn normal_hours(&self, config: &DayConfiguration, ctx: &RuleContext<'_>) -> f64 {
        rotation_hours(config, ctx)
    }

    fn lunch_hours(&self, _config: &DayConfiguration) -> f64 {
        0.0
    }

    fn apply_policy_defaults(
        &self,
        prev: &DayConfiguration,
        policy: &DayPolicySnapshot,
        has_existing_record: bool,
    ) -> DayConfiguration {
        let mut next = rotation_defaults(prev, policy, has_existing_record);
        if !has_existing_record && next.is_rest_day {
            collapse_window(&mut next, ROTATING_REST_TIME.to_string());
            next.shift_label = None;
        }
        next
    }

    fn on_field_change(
        &self,
        change: FieldChange,
        prev: &DayConfiguration,
        ctx: &RuleContext<'_>,
    ) -> DayConfiguration {
        if let Some(next) = apply_plain_edit(prev, &change) {
            return next;
        }
        match change {
            FieldChange::ShiftLabel(label) => {
                let mut next = DayConfiguration {
                    shift_label: label,
                    ..prev.clone()
                };
                if let Some(label) = label {
                    let (entry, exit) = owned(Self::window_for(label, ctx));
                    next.entry_time = entry;
                    next.exit_time = exit;
                }
                next
            }
            FieldChange::RestDay(value) => Self::toggle_rest(prev, |c| c.is_rest_day = value, ctx),
            FieldChange::DisabilityLeave(value) => {
                Self::toggle_rest(prev, |c| c.is_disability_leave = value, ctx)
            }
            _ => prev.clone(),
        }
    }
}

/// `H2_1`: a flexible employee pinned to the policy window. Hours follow
/// the fixed lunch rule and there is no short Tuesday night.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlexibleLockedRules;

impl RuleEngine for FlexibleLockedRules {
    fn variant(&self) -> ScheduleVariant {
        ScheduleVariant::FlexibleLocked
    }

    fn field_state(&self, field: DayField) -> FieldState {
        match field {
            DayField::EntryTime | DayField::ExitTime | DayField::IsRestDay => {
                FieldState::read_only()
            }
            DayField::ShiftLabel | DayField::IsNonWorkingDay => FieldState::hidden(),
            DayField::IsDisabilityLeave
            | DayField::IsContinuousShift
            | DayField::EmployeeComment => FieldState::editable(),
        }
    }

    fn normal_hours(&self, config: &DayConfiguration, ctx: &RuleContext<'_>) -> f64 {
        span_minus_lunch(config, ctx, self.lunch_hours(config))
    }

    fn lunch_hours(&self, config: &DayConfiguration) -> f64 {
        standard_lunch(config)
    }

    fn apply_policy_defaults(
        &self,
        prev: &DayConfiguration,
        policy: &DayPolicySnapshot,
        _has_existing_record: bool,
    ) -> DayConfiguration {
        let mut next = prev.clone();
        overwrite_times(&mut next, policy);
        next.shift_label = policy
            .window()
            .and_then(|(entry, exit)| label_for_window(entry, exit));
        next.is_rest_day = policy.is_rest_day;
        if next.is_rest_day || policy.is_holiday || next.is_disability_leave {
            let entry = default_entry(&next, Some(policy));
            collapse_window(&mut next, entry);
        }
        next
    }

    fn on_field_change(
        &self,
        change: FieldChange,
        prev: &DayConfiguration,
        ctx: &RuleContext<'_>,
    ) -> DayConfiguration {
        apply_locked_times_change(change, prev, ctx)
    }
}
