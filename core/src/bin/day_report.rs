//! Loads one day from a JSON fixture and prints its metrics and timeline.
//!
//! Usage: `timesheet-day-report <fixture.json>`

use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timesheet_core::{
    config::Config,
    models::{DailyRecord, DayConfiguration, DayPolicySnapshot, Job},
    repositories::{InMemoryDailyRecordStore, InMemoryJobCatalog, InMemoryPolicyService},
    services::{DailyRecordService, DayMetrics, ScheduleVariant, TimelineEntry},
    utils::time::today_local,
};

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    date: Option<NaiveDate>,
    policy: DayPolicySnapshot,
    #[serde(default)]
    record: Option<DailyRecord>,
    #[serde(default)]
    jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
struct Report {
    date: NaiveDate,
    variant: ScheduleVariant,
    locked: bool,
    form: DayConfiguration,
    metrics: DayMetrics,
    timeline: Vec<TimelineEntry>,
    normal_jobs: Vec<Job>,
    extra_jobs: Vec<Job>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timesheet_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: timesheet-day-report <fixture.json>"))?;
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let fixture: Fixture =
        serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;

    let config = Config::load()?;
    let date = fixture
        .date
        .or_else(|| fixture.record.as_ref().map(|record| record.date))
        .unwrap_or_else(|| today_local(&config.time_zone));
    tracing::info!(%date, fixture = %path, "building day report");

    let mut store = InMemoryDailyRecordStore::new();
    if let Some(record) = fixture.record {
        store = store.with_record(config.employee_id, record);
    }
    let policies = InMemoryPolicyService::new(fixture.policy);
    let jobs = InMemoryJobCatalog::new(fixture.jobs);

    let mut service =
        DailyRecordService::new(Arc::new(store), Arc::new(policies), Arc::new(jobs), config);
    service.load_day(date).await?;

    let report = Report {
        date,
        variant: service.engine().variant(),
        locked: service.is_locked(),
        form: service.form().clone(),
        metrics: service.metrics(),
        timeline: service.timeline(),
        normal_jobs: service.available_jobs(false).await?,
        extra_jobs: service.available_jobs(true).await?,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
