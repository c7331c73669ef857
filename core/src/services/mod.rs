pub mod approval;
pub mod daily_record;
pub mod jobs;
pub mod schedule_rules;
pub mod timeline;

pub use approval::ApprovalService;
pub use daily_record::{DailyRecordService, DayMetrics, Notification, NotificationKind, Phase};
pub use schedule_rules::{resolve, DayField, FieldChange, FieldState, RuleEngine, ScheduleVariant};
pub use timeline::{build_timeline, TimelineEntry, TimelineSection};
