#![allow(dead_code)]
use std::sync::Arc;

use chrono::NaiveDate;
use timesheet_core::{
    config::Config,
    models::{Activity, DailyRecord, DayPolicySnapshot},
    repositories::{InMemoryDailyRecordStore, InMemoryJobCatalog, InMemoryPolicyService},
    services::DailyRecordService,
    types::{DailyRecordId, JobId},
    utils::time::build_instant,
    validation::ActivityDraft,
};

pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

pub fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

pub fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
}

pub fn policy(code: &str, start: &str, end: &str) -> DayPolicySnapshot {
    DayPolicySnapshot {
        schedule_type: code.into(),
        policy_start_time: start.into(),
        policy_end_time: end.into(),
        ..Default::default()
    }
}

pub fn extra_activity(date: NaiveDate, start: &str, end: &str) -> Activity {
    Activity {
        id: None,
        description: format!("extra {start}-{end}"),
        duration_hours: 1.0,
        job_id: Some(JobId::new()),
        class_name: None,
        is_extra: true,
        start_time: build_instant(date, start, 0),
        end_time: build_instant(date, end, 0),
        is_compensatory: false,
    }
}

pub fn normal_activity(hours: f64) -> Activity {
    Activity {
        id: None,
        description: "normal work".into(),
        duration_hours: hours,
        job_id: Some(JobId::new()),
        class_name: None,
        is_extra: false,
        start_time: None,
        end_time: None,
        is_compensatory: false,
    }
}

/// A persisted day shift; `exit` must be after `entry`.
pub fn record(date: NaiveDate, entry: &str, exit: &str, activities: Vec<Activity>) -> DailyRecord {
    DailyRecord {
        id: DailyRecordId::new(),
        date,
        entry_timestamp: build_instant(date, entry, 0),
        exit_timestamp: build_instant(date, exit, 0),
        shift_label: None,
        is_rest_day: false,
        is_disability_leave: false,
        is_continuous_shift: false,
        employee_comment: String::new(),
        supervisor_approval: None,
        hr_approval: None,
        supervisor_comment: None,
        hr_comment: None,
        activities,
    }
}

pub fn extra_draft(start: &str, end: &str) -> ActivityDraft {
    ActivityDraft {
        description: format!("extra {start}-{end}"),
        job_id: Some(JobId::new()),
        is_extra: true,
        start_time: Some(start.into()),
        end_time: Some(end.into()),
        ..Default::default()
    }
}

pub fn normal_draft(hours: f64) -> ActivityDraft {
    ActivityDraft {
        description: "normal work".into(),
        duration_hours: hours,
        job_id: Some(JobId::new()),
        ..Default::default()
    }
}

pub struct Harness {
    pub store: Arc<InMemoryDailyRecordStore>,
    pub policies: Arc<InMemoryPolicyService>,
    pub jobs: Arc<InMemoryJobCatalog>,
    pub service: DailyRecordService,
}

/// Harness whose rules treat Monday as today.
pub fn harness(policy: DayPolicySnapshot, record: Option<DailyRecord>) -> Harness {
    harness_on(policy, record, monday())
}

pub fn harness_on(
    policy: DayPolicySnapshot,
    record: Option<DailyRecord>,
    today: NaiveDate,
) -> Harness {
    let mut store = InMemoryDailyRecordStore::new();
    if let Some(record) = record {
        store = store.with_record(None, record);
    }
    let store = Arc::new(store);
    let policies = Arc::new(InMemoryPolicyService::new(policy));
    let jobs = Arc::new(InMemoryJobCatalog::new(Vec::new()));
    let service = DailyRecordService::new(
        store.clone(),
        policies.clone(),
        jobs.clone(),
        Config::default(),
    )
    .with_today(today);
    Harness {
        store,
        policies,
        jobs,
        service,
    }
}
