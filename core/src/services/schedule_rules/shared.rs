//! Building blocks the schedule engines assemble their policies from.

use crate::models::{DayConfiguration, DayPolicySnapshot, ShiftLabel};
use crate::services::schedule_rules::{FieldChange, RuleContext};
use crate::utils::time::{
    day_bounds, minutes_to_time, round_hours, time_to_minutes, MINUTES_PER_DAY,
};

pub(crate) const CONTINUOUS_SHIFT_MINUTES: i32 = 60;
pub(crate) const STANDARD_LUNCH_HOURS: f64 = 1.0;
pub(crate) const MIDNIGHT: &str = "00:00";

pub(crate) fn standard_lunch(config: &DayConfiguration) -> f64 {
    if config.is_continuous_shift {
        0.0
    } else {
        STANDARD_LUNCH_HOURS
    }
}

/// Span of the configured window minus `lunch`, or zero for zero-hour days.
pub(crate) fn span_minus_lunch(
    config: &DayConfiguration,
    ctx: &RuleContext<'_>,
    lunch: f64,
) -> f64 {
    if config.is_zero_hour_day(ctx.policy) {
        return 0.0;
    }
    config
        .bounds()
        .map(|bounds| round_hours((bounds.hours() - lunch).max(0.0)))
        .unwrap_or(0.0)
}

pub(crate) fn fill_blank_times(config: &mut DayConfiguration, policy: &DayPolicySnapshot) {
    if config.entry_time.is_empty() {
        config.entry_time = policy.policy_start_time.clone();
    }
    if config.exit_time.is_empty() {
        config.exit_time = policy.policy_end_time.clone();
    }
}

/// Policy window, with the exit pulled back an hour when the shift is
/// continuous so the worked hours stay what the policy intends.
pub(crate) fn policy_window(
    policy: &DayPolicySnapshot,
    is_continuous_shift: bool,
) -> Option<(String, String)> {
    let (entry, exit) = policy.window()?;
    let exit = if is_continuous_shift {
        shortened_exit(entry, exit).unwrap_or_else(|| exit.to_string())
    } else {
        exit.to_string()
    };
    Some((entry.to_string(), exit))
}

pub(crate) fn overwrite_times(config: &mut DayConfiguration, policy: &DayPolicySnapshot) {
    if let Some((entry, exit)) = policy_window(policy, config.is_continuous_shift) {
        config.entry_time = entry;
        config.exit_time = exit;
    }
}

/// Entry time used when a day collapses to an empty window.
pub(crate) fn default_entry(
    config: &DayConfiguration,
    policy: Option<&DayPolicySnapshot>,
) -> String {
    policy
        .map(|policy| policy.policy_start_time.clone())
        .filter(|entry| !entry.is_empty())
        .or_else(|| Some(config.entry_time.clone()).filter(|entry| !entry.is_empty()))
        .unwrap_or_else(|| MIDNIGHT.to_string())
}

pub(crate) fn collapse_window(config: &mut DayConfiguration, entry: String) {
    config.exit_time = entry.clone();
    config.entry_time = entry;
}

/// Empties the window of rest days and holidays on first load.
pub(crate) fn seed_zero_hour_window(
    config: &mut DayConfiguration,
    policy: &DayPolicySnapshot,
    has_existing_record: bool,
) {
    if !has_existing_record && (config.is_rest_day || policy.is_holiday) {
        let entry = default_entry(config, Some(policy));
        collapse_window(config, entry);
    }
}

fn collapsing_flag_set(config: &DayConfiguration) -> bool {
    config.is_rest_day || config.is_non_working_day || config.is_disability_leave
}

/// Applies a rest/non-working/disability toggle. Turning a flag on empties
/// the window; clearing the last flag restores `restore`.
pub(crate) fn toggle_zero_hour_flag(
    prev: &DayConfiguration,
    apply: impl FnOnce(&mut DayConfiguration),
    ctx: &RuleContext<'_>,
    restore: impl FnOnce(&DayConfiguration) -> Option<(String, String)>,
) -> DayConfiguration {
    let mut next = prev.clone();
    apply(&mut next);
    if collapsing_flag_set(&next) {
        if !collapsing_flag_set(prev) {
            let entry = default_entry(prev, ctx.policy);
            collapse_window(&mut next, entry);
        }
    } else if collapsing_flag_set(prev) {
        if let Some((entry, exit)) = restore(&next) {
            next.entry_time = entry;
            next.exit_time = exit;
        }
    }
    next
}

/// Restores the policy window for the fixed families.
pub(crate) fn restore_policy_window(
    policy: Option<&DayPolicySnapshot>,
) -> impl FnOnce(&DayConfiguration) -> Option<(String, String)> + '_ {
    move |config| policy_window(policy?, config.is_continuous_shift)
}

fn shortened_exit(entry: &str, exit: &str) -> Option<String> {
    let bounds = day_bounds(entry, exit)?;
    if bounds.crosses_midnight || bounds.minutes() <= CONTINUOUS_SHIFT_MINUTES {
        return None;
    }
    Some(minutes_to_time(bounds.end - CONTINUOUS_SHIFT_MINUTES))
}

fn lengthened_exit(entry: &str, exit: &str) -> Option<String> {
    let bounds = day_bounds(entry, exit)?;
    let end = bounds.end + CONTINUOUS_SHIFT_MINUTES;
    if bounds.crosses_midnight || end >= MINUTES_PER_DAY {
        return None;
    }
    Some(minutes_to_time(end))
}

/// Toggles the continuous-shift flag, moving the exit an hour earlier when
/// it turns on and an hour later when it turns off. Night shifts and empty
/// windows keep their exit.
pub(crate) fn toggle_continuous_shift(prev: &DayConfiguration, enabled: bool) -> DayConfiguration {
    let mut next = prev.clone();
    if prev.is_continuous_shift == enabled {
        return next;
    }
    next.is_continuous_shift = enabled;
    if prev.has_same_entry_exit() {
        return next;
    }
    let moved = if enabled {
        shortened_exit(&prev.entry_time, &prev.exit_time)
    } else {
        lengthened_exit(&prev.entry_time, &prev.exit_time)
    };
    if let Some(exit) = moved {
        next.exit_time = exit;
    }
    next
}

/// Day or night depending on whether the window wraps midnight.
pub(crate) fn label_for_window(entry: &str, exit: &str) -> Option<ShiftLabel> {
    if time_to_minutes(entry) == time_to_minutes(exit) {
        return None;
    }
    let bounds = day_bounds(entry, exit)?;
    Some(if bounds.crosses_midnight {
        ShiftLabel::Night
    } else {
        ShiftLabel::Day
    })
}

/// Edits shared by every engine that lets the user type times.
pub(crate) fn apply_plain_edit(
    prev: &DayConfiguration,
    change: &FieldChange,
) -> Option<DayConfiguration> {
    let mut next = prev.clone();
    match change {
        FieldChange::EntryTime(value) => next.entry_time = value.clone(),
        FieldChange::ExitTime(value) => next.exit_time = value.clone(),
        FieldChange::EmployeeComment(value) => next.employee_comment = value.clone(),
        _ => return None,
    }
    Some(next)
}

/// Edits accepted when entry, exit and the rest flag belong to the policy.
pub(crate) fn apply_locked_times_change(
    change: FieldChange,
    prev: &DayConfiguration,
    ctx: &RuleContext<'_>,
) -> DayConfiguration {
    match change {
        FieldChange::EmployeeComment(value) => DayConfiguration {
            employee_comment: value,
            ..prev.clone()
        },
        FieldChange::DisabilityLeave(value) => toggle_zero_hour_flag(
            prev,
            |c| c.is_disability_leave = value,
            ctx,
            restore_policy_window(ctx.policy),
        ),
        FieldChange::ContinuousShift(value) => toggle_continuous_shift(prev, value),
        FieldChange::EntryTime(_)
        | FieldChange::ExitTime(_)
        | FieldChange::ShiftLabel(_)
        | FieldChange::RestDay(_)
        | FieldChange::NonWorkingDay(_) => prev.clone(),
    }
}
