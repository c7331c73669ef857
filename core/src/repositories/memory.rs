//! In-process collaborators backed by maps.
//!
//! Each one carries a failure switch so callers can exercise the
//! transient-error paths without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ServiceError;
use crate::models::{DailyRecord, DayPolicySnapshot, DayReplacement, Job};
use crate::repositories::{ApprovalActions, DailyRecordStore, JobCatalog, SchedulePolicyService};
use crate::types::{ActivityId, DailyRecordId, EmployeeId};

type RecordKey = (Option<EmployeeId>, NaiveDate);

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, ServiceError> {
    mutex
        .lock()
        .map_err(|_| ServiceError::unknown("in-memory store lock poisoned"))
}

fn check_failing(flag: &AtomicBool, what: &str) -> Result<(), ServiceError> {
    if flag.load(Ordering::SeqCst) {
        Err(ServiceError::request_failed(format!("{what} unavailable")))
    } else {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDailyRecordStore {
    records: Mutex<HashMap<RecordKey, DailyRecord>>,
    failing: AtomicBool,
    replacements: AtomicUsize,
}

impl InMemoryDailyRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, employee_id: Option<EmployeeId>, record: DailyRecord) -> Self {
        if let Ok(mut records) = self.records.lock() {
            records.insert((employee_id, record.date), record);
        }
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `replace_day` calls.
    pub fn replacements(&self) -> usize {
        self.replacements.load(Ordering::SeqCst)
    }

    pub fn record(&self, employee_id: Option<EmployeeId>, date: NaiveDate) -> Option<DailyRecord> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.get(&(employee_id, date)).cloned())
    }

    fn update_by_id(
        &self,
        record_id: DailyRecordId,
        apply: impl FnOnce(&mut DailyRecord),
    ) -> Result<DailyRecord, ServiceError> {
        check_failing(&self.failing, "daily record store")?;
        let mut records = lock(&self.records)?;
        let record = records
            .values_mut()
            .find(|record| record.id == record_id)
            .ok_or_else(|| ServiceError::rejected(format!("daily record {record_id} not found")))?;
        apply(record);
        Ok(record.clone())
    }
}

#[async_trait]
impl DailyRecordStore for InMemoryDailyRecordStore {
    async fn fetch_by_date(
        &self,
        employee_id: Option<EmployeeId>,
        date: NaiveDate,
    ) -> Result<Option<DailyRecord>, ServiceError> {
        check_failing(&self.failing, "daily record store")?;
        Ok(lock(&self.records)?.get(&(employee_id, date)).cloned())
    }

    async fn replace_day(
        &self,
        employee_id: Option<EmployeeId>,
        day: &DayReplacement,
    ) -> Result<DailyRecord, ServiceError> {
        check_failing(&self.failing, "daily record store")?;
        let mut records = lock(&self.records)?;
        let key = (employee_id, day.date);
        if records.get(&key).is_some_and(DailyRecord::is_locked) {
            return Err(ServiceError::rejected("daily record is locked"));
        }
        let id = records
            .get(&key)
            .map(|record| record.id)
            .unwrap_or_default();
        let activities = day
            .activities
            .iter()
            .cloned()
            .map(|mut activity| {
                activity.id.get_or_insert_with(ActivityId::new);
                activity
            })
            .collect();
        let record = DailyRecord {
            id,
            date: day.date,
            entry_timestamp: Some(day.entry_timestamp),
            exit_timestamp: Some(day.exit_timestamp),
            shift_label: day.shift_label,
            is_rest_day: day.is_rest_day,
            is_disability_leave: day.is_disability_leave,
            is_continuous_shift: day.is_continuous_shift,
            employee_comment: day.employee_comment.clone(),
            supervisor_approval: None,
            hr_approval: None,
            supervisor_comment: None,
            hr_comment: None,
            activities,
        };
        records.insert(key, record.clone());
        self.replacements.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }
}

/// Policies keyed by date, with a fallback for dates not listed.
#[derive(Debug, Default)]
pub struct InMemoryPolicyService {
    policies: HashMap<NaiveDate, DayPolicySnapshot>,
    fallback: DayPolicySnapshot,
    failing: AtomicBool,
}

impl InMemoryPolicyService {
    pub fn new(fallback: DayPolicySnapshot) -> Self {
        Self {
            fallback,
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, date: NaiveDate, policy: DayPolicySnapshot) -> Self {
        self.policies.insert(date, policy);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl SchedulePolicyService for InMemoryPolicyService {
    async fn get_policy(
        &self,
        _employee_id: Option<EmployeeId>,
        date: NaiveDate,
    ) -> Result<DayPolicySnapshot, ServiceError> {
        check_failing(&self.failing, "schedule policy service")?;
        Ok(self
            .policies
            .get(&date)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryJobCatalog {
    jobs: Vec<Job>,
    failing: AtomicBool,
}

impl InMemoryJobCatalog {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl JobCatalog for InMemoryJobCatalog {
    async fn list_jobs(&self) -> Result<Vec<Job>, ServiceError> {
        check_failing(&self.failing, "job catalog")?;
        Ok(self.jobs.clone())
    }
}

/// Writes approval decisions straight into a shared record store.
#[derive(Debug, Clone)]
pub struct InMemoryApprovals {
    store: Arc<InMemoryDailyRecordStore>,
}

impl InMemoryApprovals {
    pub fn new(store: Arc<InMemoryDailyRecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ApprovalActions for InMemoryApprovals {
    async fn set_supervisor_approval(
        &self,
        record_id: DailyRecordId,
        approved: bool,
        comment: Option<String>,
    ) -> Result<DailyRecord, ServiceError> {
        self.store.update_by_id(record_id, |record| {
            record.supervisor_approval = Some(approved);
            record.supervisor_comment = comment;
        })
    }

    async fn set_hr_approval(
        &self,
        record_id: DailyRecordId,
        approved: bool,
        comment: Option<String>,
    ) -> Result<DailyRecord, ServiceError> {
        self.store.update_by_id(record_id, |record| {
            record.hr_approval = Some(approved);
            record.hr_comment = comment;
        })
    }
}
