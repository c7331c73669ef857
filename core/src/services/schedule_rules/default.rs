use crate::models::{DayConfiguration, DayPolicySnapshot};
use crate::services::schedule_rules::shared::{
    apply_plain_edit, fill_blank_times, policy_window, seed_zero_hour_window, span_minus_lunch,
    standard_lunch, toggle_continuous_shift, toggle_zero_hour_flag,
};
use crate::services::schedule_rules::{
    DayField, FieldChange, FieldState, RuleContext, RuleEngine, ScheduleVariant,
};

/// Fallback for schedule types without a dedicated policy: every field is
/// the user's to edit and hours are plain arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRules;

impl RuleEngine for DefaultRules {
    fn variant(&self) -> ScheduleVariant {
        ScheduleVariant::Default
    }

    fn field_state(&self, field: DayField) -> FieldState {
        match field {
            DayField::EntryTime | DayField::ExitTime => FieldState::required(),
            DayField::IsNonWorkingDay => FieldState::hidden(),
            DayField::ShiftLabel
            | DayField::IsRestDay
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
        let restore = |config: &DayConfiguration| {
            ctx.policy
                .and_then(|policy| policy_window(policy, config.is_continuous_shift))
        };
        match change {
            FieldChange::ShiftLabel(label) => DayConfiguration {
                shift_label: label,
                ..prev.clone()
            },
            FieldChange::RestDay(value) => {
                toggle_zero_hour_flag(prev, |c| c.is_rest_day = value, ctx, restore)
            }
            FieldChange::DisabilityLeave(value) => {
                toggle_zero_hour_flag(prev, |c| c.is_disability_leave = value, ctx, restore)
            }
            FieldChange::ContinuousShift(value) => toggle_continuous_shift(prev, value),
            _ => prev.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn policy() -> DayPolicySnapshot {
        DayPolicySnapshot {
            policy_start_time: "08:00".into(),
            policy_end_time: "17:00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn fills_blank_times_without_touching_persisted_ones() {
        let blank =
            DefaultRules.apply_policy_defaults(&DayConfiguration::default(), &policy(), false);
        assert_eq!(blank.entry_time, "08:00");
        assert_eq!(blank.exit_time, "17:00");

        let persisted = DayConfiguration {
            entry_time: "09:00".into(),
            exit_time: "18:30".into(),
            ..Default::default()
        };
        let merged = DefaultRules.apply_policy_defaults(&persisted, &policy(), true);
        assert_eq!(merged.entry_time, "09:00");
        assert_eq!(merged.exit_time, "18:30");
    }

    #[test]
    fn rest_day_policy_seeds_empty_window_for_new_day() {
        let rest = DayPolicySnapshot {
            is_rest_day: true,
            ..policy()
        };
        let config = DefaultRules.apply_policy_defaults(&DayConfiguration::default(), &rest, false);
        assert!(config.is_rest_day);
        assert_eq!(config.entry_time, "08:00");
        assert_eq!(config.exit_time, "08:00");
    }

    #[test]
    fn normal_hours_deduct_lunch_unless_continuous() {
        let ctx = RuleContext::new(monday(), None);
        let mut config = DayConfiguration {
            entry_time: "08:00".into(),
            exit_time: "17:00".into(),
            ..Default::default()
        };
        assert_eq!(DefaultRules.normal_hours(&config, &ctx), 8.0);
        config.is_continuous_shift = true;
        assert_eq!(DefaultRules.normal_hours(&config, &ctx), 9.0);
    }

    #[test]
    fn clearing_rest_day_restores_policy_window() {
        let policy = policy();
        let ctx = RuleContext::new(monday(), Some(&policy));
        let start =
            DefaultRules.apply_policy_defaults(&DayConfiguration::default(), &policy, false);
        let rest = DefaultRules.on_field_change(FieldChange::RestDay(true), &start, &ctx);
        assert_eq!(rest.exit_time, "08:00");
        let back = DefaultRules.on_field_change(FieldChange::RestDay(false), &rest, &ctx);
        assert_eq!(back.exit_time, "17:00");
    }

    #[test]
    fn non_working_toggle_is_ignored() {
        let ctx = RuleContext::new(monday(), None);
        let start = DayConfiguration::default();
        let next = DefaultRules.on_field_change(FieldChange::NonWorkingDay(true), &start, &ctx);
        assert!(!next.is_non_working_day);
    }
}
