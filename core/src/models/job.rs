use serde::{Deserialize, Serialize};

use crate::types::{CompanyId, JobId};

/// Catalog entry owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub display_company_id: Option<CompanyId>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Special jobs never receive extra hours.
    #[serde(default)]
    pub special: bool,
}

fn default_active() -> bool {
    true
}
