//! Input validation for form payloads.
//!
//! Field-level limits are declared with `validator` derives; rules that
//! depend on the loaded day live in `services::daily_record`.

pub mod rules;

use serde::{Deserialize, Serialize};
pub use validator::Validate;

use crate::models::Activity;
use crate::types::{ActivityId, JobId};

/// An activity as typed into the form, before durations and instants are
/// derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ActivityDraft {
    #[serde(default)]
    pub id: Option<ActivityId>,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub description: String,
    /// Hours for normal activities. Extra activities derive theirs from
    /// `start_time` and `end_time`.
    #[serde(default)]
    pub duration_hours: f64,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub is_extra: bool,
    #[validate(custom(function = "rules::validate_hhmm"))]
    #[serde(default)]
    pub start_time: Option<String>,
    #[validate(custom(function = "rules::validate_hhmm"))]
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_compensatory: bool,
}

impl ActivityDraft {
    /// Draft for editing an already stored activity.
    pub fn from_activity(activity: &Activity) -> Self {
        let (start_time, end_time) = activity
            .wall_clock()
            .map(|(start, end)| (Some(start), Some(end)))
            .unwrap_or_default();
        Self {
            id: activity.id,
            description: activity.description.clone(),
            duration_hours: activity.duration_hours,
            job_id: activity.job_id,
            class_name: activity.class_name.clone(),
            is_extra: activity.is_extra,
            start_time,
            end_time,
            is_compensatory: activity.is_compensatory,
        }
    }
}
