//! Owner of the day being edited: loads it, applies form edits through the
//! schedule engine, validates submissions and replaces the day in the store.
//!
//! Every operation is `&mut self`; one service instance backs one date view.
//! Collaborator failures never escape as panics. They are logged, stored as
//! the current [`Notification`] and returned, and the phase goes back to
//! [`Phase::Ready`] with the last good state intact.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::{AppError, ServiceError, ValidationError};
use crate::models::{
    Activity, DailyRecord, DayConfiguration, DayPolicySnapshot, DayReplacement, Job,
};
use crate::repositories::{DailyRecordStore, JobCatalog, SchedulePolicyService};
use crate::services::jobs::filter_jobs;
use crate::services::schedule_rules::{
    resolve, DayField, FieldChange, FieldState, RuleContext, RuleEngine, ScheduleVariant,
};
use crate::services::timeline::{build_timeline, TimelineEntry};
use crate::utils::time::{
    activity_interval, build_instant, compute_duration, is_outside_labor_window, round_hours,
    time_to_minutes, today_local, MINUTES_PER_DAY,
};
use crate::validation::{ActivityDraft, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Outcome of the last operation, shown until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Progress figures for the loaded day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayMetrics {
    pub worked_normal_hours: f64,
    pub worked_extra_hours: f64,
    pub normal_hours_expected: f64,
    pub remaining_normal_hours: f64,
    pub progress_percentage: f64,
    pub exceeded_hours: f64,
    pub has_exceeded_normal_hours: bool,
    pub can_enter_extra_hours: bool,
    pub is_normal_hours_complete: bool,
    pub is_day_record_persisted: bool,
    pub has_unsaved_day_config_changes: bool,
}

impl DayMetrics {
    pub fn compute(
        worked_normal_hours: f64,
        worked_extra_hours: f64,
        normal_hours_expected: f64,
        epsilon: f64,
    ) -> Self {
        let worked = round_hours(worked_normal_hours);
        let expected = round_hours(normal_hours_expected);
        let remaining = round_hours((expected - worked).max(0.0));
        let exceeded = if expected <= 0.0 {
            worked
        } else {
            round_hours((worked - expected).max(0.0))
        };
        let progress = if expected <= 0.0 {
            100.0
        } else {
            round_hours((worked / expected * 100.0).clamp(0.0, 100.0))
        };
        Self {
            worked_normal_hours: worked,
            worked_extra_hours: round_hours(worked_extra_hours),
            normal_hours_expected: expected,
            remaining_normal_hours: remaining,
            progress_percentage: progress,
            exceeded_hours: exceeded,
            has_exceeded_normal_hours: exceeded > 0.0,
            can_enter_extra_hours: expected <= 0.0 || remaining <= epsilon,
            is_normal_hours_complete: expected > 0.0 && remaining <= epsilon,
            is_day_record_persisted: false,
            has_unsaved_day_config_changes: false,
        }
    }
}

fn sum_hours<'a>(activities: impl Iterator<Item = &'a Activity>) -> f64 {
    activities.map(|activity| activity.duration_hours).sum()
}

fn required_time(value: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))?;
    if time_to_minutes(value).is_none() {
        return Err(ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Absolute entry and exit of `config` on `date`. The exit moves to the next
/// day for shifts that cross midnight, never for an empty window.
fn day_instants(
    date: NaiveDate,
    config: &DayConfiguration,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    let entry = required_time(Some(&config.entry_time), "entry_time")?;
    let exit = required_time(Some(&config.exit_time), "exit_time")?;
    let crosses = !config.has_same_entry_exit()
        && config.bounds().is_some_and(|bounds| bounds.crosses_midnight);
    let invalid = |field: &'static str, value: &str| ValidationError::InvalidTime {
        field,
        value: value.to_string(),
    };
    let entry_instant =
        build_instant(date, &entry, 0).ok_or_else(|| invalid("entry_time", &entry))?;
    let exit_instant =
        build_instant(date, &exit, i64::from(crosses)).ok_or_else(|| invalid("exit_time", &exit))?;
    Ok((entry_instant, exit_instant))
}

fn overlaps(a: (DateTime<Utc>, DateTime<Utc>), b: (DateTime<Utc>, DateTime<Utc>)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

#[derive(Debug, Clone, Default)]
struct DayState {
    date: Option<NaiveDate>,
    phase: Phase,
    policy: Option<DayPolicySnapshot>,
    record: Option<DailyRecord>,
    form: DayConfiguration,
    activities: Vec<Activity>,
    notification: Option<Notification>,
}

pub struct DailyRecordService {
    store: Arc<dyn DailyRecordStore>,
    policies: Arc<dyn SchedulePolicyService>,
    jobs: Arc<dyn JobCatalog>,
    config: Config,
    today: Option<NaiveDate>,
    state: DayState,
}

impl DailyRecordService {
    pub fn new(
        store: Arc<dyn DailyRecordStore>,
        policies: Arc<dyn SchedulePolicyService>,
        jobs: Arc<dyn JobCatalog>,
        config: Config,
    ) -> Self {
        Self {
            store,
            policies,
            jobs,
            config,
            today: None,
            state: DayState::default(),
        }
    }

    /// Pins the date the schedule rules treat as today instead of reading
    /// the clock in the configured time zone.
    pub fn with_today(self, today: NaiveDate) -> Self {
        Self {
            today: Some(today),
            ..self
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.state.date
    }

    pub fn policy(&self) -> Option<&DayPolicySnapshot> {
        self.state.policy.as_ref()
    }

    pub fn record(&self) -> Option<&DailyRecord> {
        self.state.record.as_ref()
    }

    pub fn form(&self) -> &DayConfiguration {
        &self.state.form
    }

    pub fn activities(&self) -> &[Activity] {
        &self.state.activities
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.state.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.state.notification = None;
    }

    pub fn engine(&self) -> &'static dyn RuleEngine {
        self.state
            .policy
            .as_ref()
            .map(|policy| resolve(&policy.schedule_type))
            .unwrap_or_else(|| ScheduleVariant::Default.engine())
    }

    /// Reviewed records are read-only for the employee.
    pub fn is_locked(&self) -> bool {
        self.state.record.as_ref().is_some_and(DailyRecord::is_locked)
    }

    pub fn can_edit_activities(&self) -> bool {
        !self.is_locked() && !self.state.form.is_disability_leave
    }

    pub fn can_delete_activities(&self) -> bool {
        !self.is_locked()
    }

    pub fn field_state(&self, field: DayField) -> FieldState {
        let state = self.engine().field_state(field);
        if self.is_locked() {
            state.disabled()
        } else {
            state
        }
    }

    fn loaded_date(&self) -> Result<NaiveDate, AppError> {
        self.state.date.ok_or(AppError::NotLoaded)
    }

    fn ensure_unlocked(&self) -> Result<NaiveDate, AppError> {
        let date = self.loaded_date()?;
        if self.is_locked() {
            return Err(AppError::Locked);
        }
        Ok(date)
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| today_local(&self.config.time_zone))
    }

    fn rule_context(&self, date: NaiveDate) -> RuleContext<'_> {
        RuleContext::new(date, self.state.policy.as_ref()).with_today(self.today())
    }

    fn normal_hours_expected(&self) -> f64 {
        match self.state.date {
            Some(date) => self
                .engine()
                .normal_hours(&self.state.form, &self.rule_context(date)),
            None => 0.0,
        }
    }

    fn worked_normal_hours(&self) -> f64 {
        sum_hours(self.state.activities.iter().filter(|a| !a.is_extra))
    }

    pub fn metrics(&self) -> DayMetrics {
        let worked_extra = sum_hours(self.state.activities.iter().filter(|a| a.is_extra));
        let mut metrics = DayMetrics::compute(
            self.worked_normal_hours(),
            worked_extra,
            self.normal_hours_expected(),
            self.config.hours_epsilon,
        );
        metrics.is_day_record_persisted = self.state.record.is_some();
        metrics.has_unsaved_day_config_changes = match &self.state.record {
            Some(record) => self.state.form.differs_from(record),
            None => self.state.date.is_some(),
        };
        metrics
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        match self.state.date {
            Some(date) => build_timeline(date, &self.state.form, &self.state.activities),
            None => Vec::new(),
        }
    }

    /// Fetches policy and record together and rebuilds the form.
    pub async fn load_day(&mut self, date: NaiveDate) -> Result<(), AppError> {
        self.state.phase = Phase::Loading;
        let employee_id = self.config.employee_id;

        let (policy, record) = tokio::join!(
            self.policies.get_policy(employee_id, date),
            self.store.fetch_by_date(employee_id, date),
        );
        let (policy, record) = match (policy, record) {
            (Ok(policy), Ok(record)) => (policy, record),
            (Err(err), _) | (_, Err(err)) => return Err(self.fail_load(date, err)),
        };

        let engine = resolve(&policy.schedule_type);
        let base = record
            .as_ref()
            .map(DayConfiguration::from_record)
            .unwrap_or_default();
        let form = engine.apply_policy_defaults(&base, &policy, record.is_some());

        tracing::info!(
            %date,
            schedule_type = %policy.schedule_type,
            variant = ?engine.variant(),
            has_record = record.is_some(),
            "day loaded"
        );
        self.state = DayState {
            date: Some(date),
            phase: Phase::Ready,
            activities: record
                .as_ref()
                .map(|record| record.activities.clone())
                .unwrap_or_default(),
            policy: Some(policy),
            record,
            form,
            notification: None,
        };
        Ok(())
    }

    /// Leaves no day loaded, so edits and saves report `NotLoaded` until a
    /// load succeeds.
    fn fail_load(&mut self, date: NaiveDate, err: ServiceError) -> AppError {
        tracing::error!(error = %err, %date, "failed to load day");
        self.state = DayState {
            phase: Phase::Ready,
            notification: Some(Notification::error(err.to_string())),
            ..DayState::default()
        };
        AppError::Service(err)
    }

    /// Applies one form edit through the schedule engine.
    pub fn change_field(&mut self, change: FieldChange) -> Result<(), AppError> {
        let date = self.ensure_unlocked()?;
        let field = change.field();
        if !self.field_state(field).is_editable() {
            return Err(ValidationError::FieldNotEditable(field).into());
        }
        let next = self
            .engine()
            .on_field_change(change, &self.state.form, &self.rule_context(date));
        self.state.form = next;
        Ok(())
    }

    fn reject(&mut self, err: ValidationError) -> AppError {
        tracing::warn!(error = %err, "submission rejected");
        self.state.notification = Some(Notification::error(err.to_string()));
        AppError::Validation(err)
    }

    fn replacement(
        &self,
        date: NaiveDate,
        activities: Vec<Activity>,
    ) -> Result<DayReplacement, ValidationError> {
        let form = &self.state.form;
        let (entry_timestamp, exit_timestamp) = day_instants(date, form)?;
        Ok(DayReplacement {
            date,
            entry_timestamp,
            exit_timestamp,
            shift_label: form.shift_label,
            is_rest_day: form.is_rest_day,
            is_disability_leave: form.is_disability_leave,
            is_continuous_shift: form.is_continuous_shift,
            employee_comment: form.employee_comment.clone(),
            holiday_hours: self
                .state
                .policy
                .as_ref()
                .and_then(DayPolicySnapshot::holiday_hours_override),
            activities,
        })
    }

    /// Time-bounded activities that would fall outside the form's window.
    fn activities_outside_window(&self) -> usize {
        let form = &self.state.form;
        self.state
            .activities
            .iter()
            .filter_map(Activity::wall_clock)
            .filter(|(start, end)| {
                is_outside_labor_window(start, end, &form.entry_time, &form.exit_time)
            })
            .count()
    }

    /// Saves the day fields with the current activity list.
    pub async fn submit_day_configuration(&mut self) -> Result<DailyRecord, AppError> {
        let date = self.ensure_unlocked()?;
        let replacement = match self.replacement(date, self.state.activities.clone()) {
            Ok(replacement) => replacement,
            Err(err) => return Err(self.reject(err)),
        };
        if !self.state.form.is_zero_hour_day(self.state.policy.as_ref()) {
            let count = self.activities_outside_window();
            if count > 0 {
                return Err(self.reject(ValidationError::ActivitiesOutsideRange { count }));
            }
        }
        self.persist(replacement, "Day saved").await
    }

    /// Creates an activity, or replaces the one at `index`.
    pub async fn submit_activity(
        &mut self,
        draft: ActivityDraft,
        index: Option<usize>,
    ) -> Result<DailyRecord, AppError> {
        let date = self.ensure_unlocked()?;
        let activity = match self.build_activity(date, &draft, index) {
            Ok(activity) => activity,
            Err(err) => return Err(self.reject(err)),
        };
        let mut activities = self.state.activities.clone();
        match index {
            Some(index) => activities[index] = activity,
            None => activities.push(activity),
        }
        let replacement = match self.replacement(date, activities) {
            Ok(replacement) => replacement,
            Err(err) => return Err(self.reject(err)),
        };
        self.persist(replacement, "Activity saved").await
    }

    /// Removes the activity at `index`. Allowed during disability leave.
    pub async fn delete_activity(&mut self, index: usize) -> Result<DailyRecord, AppError> {
        let date = self.ensure_unlocked()?;
        if index >= self.state.activities.len() {
            return Err(self.reject(ValidationError::ActivityNotFound(index)));
        }
        let mut activities = self.state.activities.clone();
        activities.remove(index);
        let replacement = match self.replacement(date, activities) {
            Ok(replacement) => replacement,
            Err(err) => return Err(self.reject(err)),
        };
        self.persist(replacement, "Activity deleted").await
    }

    fn build_activity(
        &self,
        date: NaiveDate,
        draft: &ActivityDraft,
        index: Option<usize>,
    ) -> Result<Activity, ValidationError> {
        if self.state.form.is_disability_leave {
            return Err(ValidationError::DisabilityLeaveActive);
        }
        let existing = match index {
            Some(index) => Some(
                self.state
                    .activities
                    .get(index)
                    .ok_or(ValidationError::ActivityNotFound(index))?,
            ),
            None => None,
        };
        draft.validate()?;
        let mut activity = if draft.is_extra {
            self.build_extra_activity(date, draft, index)?
        } else {
            self.build_normal_activity(draft, existing)?
        };
        activity.id = draft.id.or_else(|| existing.and_then(|a| a.id));
        Ok(activity)
    }

    fn build_extra_activity(
        &self,
        date: NaiveDate,
        draft: &ActivityDraft,
        index: Option<usize>,
    ) -> Result<Activity, ValidationError> {
        let form = &self.state.form;
        let start = required_time(draft.start_time.as_deref(), "start_time")?;
        // "24:00" only ends a day.
        if time_to_minutes(&start) == Some(MINUTES_PER_DAY) {
            return Err(ValidationError::InvalidTime {
                field: "start_time",
                value: start,
            });
        }
        let end = required_time(draft.end_time.as_deref(), "end_time")?;

        let duration = compute_duration(
            &start,
            &end,
            form.is_continuous_shift,
            &form.entry_time,
            &form.exit_time,
        )
        .unwrap_or(0.0);
        if duration <= 0.0 {
            return Err(ValidationError::DurationNotPositive);
        }

        let bounds = form.bounds().filter(|_| !form.has_same_entry_exit());
        let interval = activity_interval(date, &start, &end, bounds.as_ref()).ok_or(
            ValidationError::InvalidTime {
                field: "start_time",
                value: start.clone(),
            },
        )?;

        let collides = self
            .state
            .activities
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != index)
            .filter_map(|(_, other)| other.interval())
            .any(|other| overlaps(interval, other));
        if collides {
            return Err(ValidationError::Overlap);
        }

        if bounds.is_some() {
            if let Ok(window) = day_instants(date, form) {
                if overlaps(interval, window) {
                    return Err(ValidationError::InsideLaborWindow);
                }
            }
        }

        if draft.job_id.is_none() {
            return Err(ValidationError::JobRequired);
        }

        Ok(Activity {
            id: None,
            description: draft.description.clone(),
            duration_hours: duration,
            job_id: draft.job_id,
            class_name: draft.class_name.clone(),
            is_extra: true,
            start_time: Some(interval.0),
            end_time: Some(interval.1),
            is_compensatory: draft.is_compensatory,
        })
    }

    fn build_normal_activity(
        &self,
        draft: &ActivityDraft,
        existing: Option<&Activity>,
    ) -> Result<Activity, ValidationError> {
        let expected = self.normal_hours_expected();
        let own_hours = existing
            .filter(|activity| !activity.is_extra)
            .map_or(0.0, |activity| activity.duration_hours);
        let available = round_hours((expected - self.worked_normal_hours() + own_hours).max(0.0));

        if expected > 0.0 && available <= self.config.hours_epsilon {
            return Err(ValidationError::NormalHoursExhausted);
        }
        let requested = round_hours(draft.duration_hours);
        if !requested.is_finite() || requested <= 0.0 {
            return Err(ValidationError::DurationNotPositive);
        }
        if expected > 0.0 && requested > available {
            return Err(ValidationError::ExceedsAvailableHours {
                requested,
                available,
            });
        }
        if draft.job_id.is_none() && !draft.is_compensatory {
            return Err(ValidationError::JobRequired);
        }

        Ok(Activity {
            id: None,
            description: draft.description.clone(),
            duration_hours: requested,
            job_id: draft.job_id,
            class_name: draft.class_name.clone(),
            is_extra: false,
            start_time: None,
            end_time: None,
            is_compensatory: draft.is_compensatory,
        })
    }

    async fn persist(
        &mut self,
        replacement: DayReplacement,
        success_message: &str,
    ) -> Result<DailyRecord, AppError> {
        self.state.phase = Phase::Submitting;
        let result = self
            .store
            .replace_day(self.config.employee_id, &replacement)
            .await;
        self.state.phase = Phase::Ready;

        match result {
            Ok(saved) => {
                tracing::info!(
                    date = %replacement.date,
                    record_id = %saved.id,
                    activities = saved.activities.len(),
                    "day replaced"
                );
                let non_working = self.state.form.is_non_working_day;
                self.state.form = DayConfiguration {
                    is_non_working_day: non_working,
                    ..DayConfiguration::from_record(&saved)
                };
                self.state.activities = saved.activities.clone();
                self.state.record = Some(saved.clone());
                self.state.notification = Some(Notification::success(success_message));
                Ok(saved)
            }
            Err(err) => {
                tracing::error!(error = %err, date = %replacement.date, "failed to replace day");
                self.state.notification = Some(Notification::error(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Jobs the activity form may offer.
    pub async fn available_jobs(&mut self, is_extra: bool) -> Result<Vec<Job>, AppError> {
        match self.jobs.list_jobs().await {
            Ok(jobs) => Ok(filter_jobs(jobs, is_extra)),
            Err(err) => {
                tracing::error!(error = %err, "failed to list jobs");
                self.state.notification = Some(Notification::error(err.to_string()));
                Err(err.into())
            }
        }
    }
}
