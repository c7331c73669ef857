//! Data shapes exchanged with the backend and held by the day view.

pub mod daily_record;
pub mod day_configuration;
pub mod job;
pub mod schedule;

pub use daily_record::{Activity, ApprovalStatus, DailyRecord, DayReplacement};
pub use day_configuration::DayConfiguration;
pub use job::Job;
pub use schedule::{DayPolicySnapshot, ScheduleTypeCode, ShiftLabel};
