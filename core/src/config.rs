use anyhow::anyhow;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

use crate::types::EmployeeId;

pub const DEFAULT_HOURS_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub time_zone: Tz,
    /// Remaining normal hours at or below this count as none left.
    pub hours_epsilon: f64,
    /// Employee whose days are edited. `None` means the signed-in user.
    pub employee_id: Option<EmployeeId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_zone: Tz::UTC,
            hours_epsilon: DEFAULT_HOURS_EPSILON,
            employee_id: None,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let hours_epsilon = match env::var("TIMESHEET_HOURS_EPSILON") {
            Ok(raw) => parse_epsilon(&raw)?,
            Err(_) => DEFAULT_HOURS_EPSILON,
        };

        let employee_id = match env::var("TIMESHEET_EMPLOYEE_ID") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| anyhow!("Invalid TIMESHEET_EMPLOYEE_ID value: {}", raw))?,
            ),
            _ => None,
        };

        Ok(Config {
            time_zone,
            hours_epsilon,
            employee_id,
        })
    }
}

fn parse_epsilon(raw: &str) -> anyhow::Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid TIMESHEET_HOURS_EPSILON value: {}", raw))?;
    if !value.is_finite() || value < 0.0 {
        return Err(anyhow!("TIMESHEET_HOURS_EPSILON must be a non-negative number"));
    }
    Ok(value)
}
