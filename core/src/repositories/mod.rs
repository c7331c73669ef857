//! Collaborator seams consumed by the services, plus in-memory
//! implementations for tests and the report binary.

pub mod approval_repository;
pub mod daily_record_repository;
pub mod job_repository;
pub mod memory;
pub mod schedule_policy_repository;

pub use approval_repository::ApprovalActions;
pub use daily_record_repository::DailyRecordStore;
pub use job_repository::JobCatalog;
pub use memory::{
    InMemoryApprovals, InMemoryDailyRecordStore, InMemoryJobCatalog, InMemoryPolicyService,
};
pub use schedule_policy_repository::SchedulePolicyService;

#[cfg(test)]
pub use approval_repository::MockApprovalActions;
#[cfg(test)]
pub use daily_record_repository::MockDailyRecordStore;
#[cfg(test)]
pub use job_repository::MockJobCatalog;
#[cfg(test)]
pub use schedule_policy_repository::MockSchedulePolicyService;
