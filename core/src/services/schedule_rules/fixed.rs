//! The fixed-schedule family (`H1` and its variants). Days follow the
//! assigned policy window and the shift selector is always hidden.

use crate::models::{DayConfiguration, DayPolicySnapshot, ShiftLabel};
use crate::services::schedule_rules::shared::{
    apply_locked_times_change, apply_plain_edit, collapse_window, default_entry,
    fill_blank_times, overwrite_times, restore_policy_window, seed_zero_hour_window,
    span_minus_lunch, standard_lunch, toggle_continuous_shift, toggle_zero_hour_flag,
};
use crate::services::schedule_rules::{
    DayField, FieldChange, FieldState, RuleContext, RuleEngine, ScheduleVariant,
};

const POLICY_TIMES_HELPER: &str = "Set by your assigned schedule";
const REST_DAY_HELPER: &str = "Rest days come from your assigned schedule";
const TWELVE_HOUR_HELPER: &str = "12-hour shifts are always continuous";

fn hidden_day_label() -> FieldState {
    FieldState::hidden().with_default(ShiftLabel::Day.code())
}

/// Field layout shared by the variants whose times come from the policy.
fn locked_times_field_state(field: DayField) -> FieldState {
    match field {
        DayField::EntryTime | DayField::ExitTime => {
            FieldState::read_only().with_helper(POLICY_TIMES_HELPER)
        }
        DayField::ShiftLabel => hidden_day_label(),
        DayField::IsRestDay => FieldState::read_only().with_helper(REST_DAY_HELPER),
        DayField::IsNonWorkingDay => FieldState::hidden(),
        DayField::IsDisabilityLeave | DayField::IsContinuousShift | DayField::EmployeeComment => {
            FieldState::editable()
        }
    }
}

/// `H1`: entry and exit always come from the policy, even over a
/// persisted record.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRules;

impl RuleEngine for FixedRules {
    fn variant(&self) -> ScheduleVariant {
        ScheduleVariant::Fixed
    }

    fn field_state(&self, field: DayField) -> FieldState {
        locked_times_field_state(field)
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
        next.shift_label = Some(ShiftLabel::Day);
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

/// `H1_1` to `H1_5`: editable times, no rest-day control, and a
/// client-only non-working day in its place.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedEditableRules;

impl RuleEngine for FixedEditableRules {
    fn variant(&self) -> ScheduleVariant {
        ScheduleVariant::FixedEditable
    }

    fn field_state(&self, field: DayField) -> FieldState {
        match field {
            DayField::EntryTime | DayField::ExitTime => FieldState::required(),
            DayField::ShiftLabel => hidden_day_label(),
            DayField::IsRestDay => FieldState::hidden().with_default("false"),
            DayField::IsNonWorkingDay
            | DayField::IsDisabilityLeave
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
        has_existing_record: bool,
    ) -> DayConfiguration {
        let mut next = prev.clone();
        fill_blank_times(&mut next, policy);
        next.shift_label = Some(ShiftLabel::Day);
        next.is_rest_day = false;
        if !has_existing_record && (policy.is_rest_day || policy.is_holiday) {
            next.is_non_working_day = policy.is_rest_day;
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
        if let Some(next) = apply_plain_edit(prev, &change) {
            return next;
        }
        match change {
            FieldChange::NonWorkingDay(value) => toggle_zero_hour_flag(
                prev,
                |c| c.is_non_working_day = value,
                ctx,
                restore_policy_window(ctx.policy),
            ),
            FieldChange::DisabilityLeave(value) => toggle_zero_hour_flag(
                prev,
                |c| c.is_disability_leave = value,
                ctx,
                restore_policy_window(ctx.policy),
            ),
            FieldChange::ContinuousShift(value) => toggle_continuous_shift(prev, value),
            _ => prev.clone(),
        }
    }
}

/// `H1_6`: like `H1`, but a persisted record keeps its own times.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLockedRestDayRules;

impl RuleEngine for FixedLockedRestDayRules {
    fn variant(&self) -> ScheduleVariant {
        ScheduleVariant::FixedLockedRestDay
    }

    fn field_state(&self, field: DayField) -> FieldState {
        locked_times_field_state(field)
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
        has_existing_record: bool,
    ) -> DayConfiguration {
        let mut next = prev.clone();
        if has_existing_record {
            fill_blank_times(&mut next, policy);
        } else {
            overwrite_times(&mut next, policy);
        }
        next.shift_label = Some(ShiftLabel::Day);
        next.is_rest_day = policy.is_rest_day;
        seed_zero_hour_window(&mut next, policy, has_existing_record);
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

/// `H1_7`: twelve-hour shifts, always continuous and therefore lunch-free.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTwelveHourRules;

impl FixedTwelveHourRules {
    /// The raw policy window; the exit is never shortened for these shifts.
    fn restore(
        policy: Option<&DayPolicySnapshot>,
    ) -> impl FnOnce(&DayConfiguration) -> Option<(String, String)> + '_ {
        move |_| {
            policy
                .and_then(|policy| policy.window())
                .map(|(entry, exit)| (entry.to_string(), exit.to_string()))
        }
    }
}

impl RuleEngine for FixedTwelveHourRules {
    fn variant(&self) -> ScheduleVariant {
        ScheduleVariant::FixedTwelveHour
    }

    fn field_state(&self, field: DayField) -> FieldState {
        match field {
            DayField::EntryTime | DayField::ExitTime => FieldState::required(),
            DayField::ShiftLabel => hidden_day_label(),
            DayField::IsNonWorkingDay => FieldState::hidden(),
            DayField::IsContinuousShift => FieldState::read_only()
                .with_default("true")
                .with_helper(TWELVE_HOUR_HELPER),
            DayField::IsRestDay | DayField::IsDisabilityLeave | DayField::EmployeeComment => {
                FieldState::editable()
            }
        }
    }

    fn normal_hours(&self, config: &DayConfiguration, ctx: &RuleContext<'_>) -> f64 {
        span_minus_lunch(config, ctx, self.lunch_hours(config))
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
        let mut next = prev.clone();
        fill_blank_times(&mut next, policy);
        next.shift_label = Some(ShiftLabel::Day);
        next.is_continuous_shift = true;
        if !has_existing_record {
            next.is_rest_day = policy.is_rest_day;
        }
        seed_zero_hour_window(&mut next, policy, has_existing_record);
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
            FieldChange::RestDay(value) => toggle_zero_hour_flag(
                prev,
                |c| c.is_rest_day = value,
                ctx,
                Self::restore(ctx.policy),
            ),
            FieldChange::DisabilityLeave(value) => toggle_zero_hour_flag(
                prev,
                |c| c.is_disability_leave = value,
                ctx,
                Self::restore(ctx.policy),
            ),
            _ => prev.clone(),
        }
    }
}
