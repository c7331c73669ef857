use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::schedule_rules::DayField;

/// Local, recoverable rejections. These never reach a collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} has an invalid time: {value:?}")]
    InvalidTime { field: &'static str, value: String },
    #[error("duration must be greater than zero")]
    DurationNotPositive,
    #[error("requested {requested:.2}h exceeds the {available:.2}h of normal hours still available")]
    ExceedsAvailableHours { requested: f64, available: f64 },
    #[error("normal hours for the day are complete; log extra hours instead")]
    NormalHoursExhausted,
    #[error("a job is required")]
    JobRequired,
    #[error("description must be at most 200 characters")]
    DescriptionTooLong,
    #[error("{0}")]
    InvalidField(String),
    #[error("extra hours must fall outside the labor window")]
    InsideLaborWindow,
    #[error("the interval overlaps another activity")]
    Overlap,
    #[error("{count} activities are outside the new range; fix them first")]
    ActivitiesOutsideRange { count: usize },
    #[error("activities cannot be created or edited during disability leave")]
    DisabilityLeaveActive,
    #[error("{0:?} cannot be edited for this schedule")]
    FieldNotEditable(DayField),
    #[error("no activity at position {0}")]
    ActivityNotFound(usize),
    #[error("a comment is required when rejecting")]
    RejectionCommentRequired,
    #[error("HR can only review records the supervisor approved")]
    SupervisorApprovalRequired,
    #[error("HR has already reviewed this record")]
    HrDecisionFinal,
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        if field_errors.contains_key("description") {
            return ValidationError::DescriptionTooLong;
        }
        if field_errors.contains_key("duration_hours") {
            return ValidationError::DurationNotPositive;
        }
        let messages: Vec<String> = field_errors
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(move |e| format!("{}: {}", field, e.code.as_ref()))
            })
            .collect();
        ValidationError::InvalidField(messages.join(", "))
    }
}

/// Failure reported by a collaborator (record store, policy service, job
/// catalog, approvals). Recovered by a manual retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct ServiceError {
    pub error: String,
    pub code: String,
}

impl ServiceError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "REQUEST_FAILED".to_string(),
        }
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "REJECTED".to_string(),
        }
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "UNKNOWN".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("service request failed: {0}")]
    Service(#[from] ServiceError),
    #[error("the daily record has been reviewed and can no longer be edited")]
    Locked,
    #[error("no day is loaded")]
    NotLoaded,
}

impl AppError {
    pub fn code(&self) -> &str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Service(err) => &err.code,
            AppError::Locked => "LOCKED",
            AppError::NotLoaded => "NOT_LOADED",
        }
    }
}
