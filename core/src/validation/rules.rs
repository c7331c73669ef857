//! Custom `validator` rules for form payloads.

use validator::ValidationError;

use crate::utils::time::time_to_minutes;

/// Validates a wall-clock `"HH:MM"` value, `"24:00"` included. Blank values
/// pass; whether a time is required depends on the kind of activity.
pub fn validate_hhmm(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    time_to_minutes(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("time_invalid_format"))
}
