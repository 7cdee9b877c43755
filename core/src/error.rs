use chrono::NaiveDate;
use thiserror::Error;

use crate::model::staff::StaffKey;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown staff member: {0}")]
    UnknownStaff(String),

    #[error("staff name '{name}' is ambiguous, found in: {departments}")]
    AmbiguousStaff { name: String, departments: String },

    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    #[error("date {date} is outside the planning period {period}")]
    InvalidDate { date: NaiveDate, period: String },
}

impl PlannerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PlannerError::InvalidArgument(message.into())
    }

    pub fn unknown_staff(key: &StaffKey) -> Self {
        PlannerError::UnknownStaff(key.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
