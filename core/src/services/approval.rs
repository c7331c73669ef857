//! Two-level review of daily records: the supervisor decides first, then HR.

use std::sync::Arc;

use crate::error::{AppError, ValidationError};
use crate::models::DailyRecord;
use crate::repositories::ApprovalActions;

#[derive(Clone)]
pub struct ApprovalService {
    actions: Arc<dyn ApprovalActions>,
}

fn normalized_comment(
    approved: bool,
    comment: Option<String>,
) -> Result<Option<String>, ValidationError> {
    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    if !approved && comment.is_none() {
        return Err(ValidationError::RejectionCommentRequired);
    }
    Ok(comment)
}

impl ApprovalService {
    pub fn new(actions: Arc<dyn ApprovalActions>) -> Self {
        Self { actions }
    }

    pub async fn decide_as_supervisor(
        &self,
        record: &DailyRecord,
        approved: bool,
        comment: Option<String>,
    ) -> Result<DailyRecord, AppError> {
        if record.hr_approval.is_some() {
            return Err(ValidationError::HrDecisionFinal.into());
        }
        let comment = normalized_comment(approved, comment)?;
        let updated = self
            .actions
            .set_supervisor_approval(record.id, approved, comment)
            .await
            .map_err(|err| {
                tracing::error!(
                    error = %err,
                    record_id = %record.id,
                    "failed to record supervisor decision"
                );
                err
            })?;
        tracing::info!(record_id = %record.id, approved, "supervisor decision recorded");
        Ok(updated)
    }

    pub async fn decide_as_hr(
        &self,
        record: &DailyRecord,
        approved: bool,
        comment: Option<String>,
    ) -> Result<DailyRecord, AppError> {
        if record.hr_approval.is_some() {
            return Err(ValidationError::HrDecisionFinal.into());
        }
        if record.supervisor_approval != Some(true) {
            return Err(ValidationError::SupervisorApprovalRequired.into());
        }
        let comment = normalized_comment(approved, comment)?;
        let updated = self
            .actions
            .set_hr_approval(record.id, approved, comment)
            .await
            .map_err(|err| {
                tracing::error!(
                    error = %err,
                    record_id = %record.id,
                    "failed to record HR decision"
                );
                err
            })?;
        tracing::info!(record_id = %record.id, approved, "HR decision recorded");
        Ok(updated)
    }
}
