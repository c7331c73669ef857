//! Work-schedule rules and daily timesheet orchestration.
//!
//! `services::schedule_rules` decides how each schedule type behaves,
//! `services::daily_record` drives one day through load, edit and save
//! against the collaborator traits in `repositories`.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;
pub mod validation;
