use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlannerError;

/// Production stage a staff member belongs to.
///
/// The declaration order is the display order used everywhere a roster or a
/// set of department totals is listed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    Cutting,
    Sewing,
    Clipping,
    Dispatch,
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Cutting,
        Department::Sewing,
        Department::Clipping,
        Department::Dispatch,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Department::Cutting => "Cutting",
            Department::Sewing => "Sewing",
            Department::Clipping => "Clipping",
            Department::Dispatch => "Dispatch",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Department {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cutting" | "cut" => Ok(Department::Cutting),
            "sewing" | "sew" => Ok(Department::Sewing),
            "clipping" | "clip" => Ok(Department::Clipping),
            "dispatch" => Ok(Department::Dispatch),
            other => Err(PlannerError::invalid(format!("unknown department '{}'", other))),
        }
    }
}

/// Identifies a staff member: names are only unique within a department.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaffKey {
    pub department: Department,
    pub name: String,
}

impl StaffKey {
    pub fn new(department: Department, name: impl Into<String>) -> Self {
        Self {
            department,
            name: name.into(),
        }
    }
}

impl fmt::Display for StaffKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.department, self.name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StaffMember {
    pub name: String,
    pub department: Department,
    pub role: String,
    pub daily_target: u32,
    #[serde(default)]
    pub historical_average: Option<u32>,
}

impl StaffMember {
    pub fn new(department: Department, name: impl Into<String>, daily_target: u32) -> Self {
        Self {
            name: name.into(),
            department,
            role: default_role(department).to_string(),
            daily_target,
            historical_average: None,
        }
    }

    pub fn with_historical_average(mut self, average: u32) -> Self {
        self.historical_average = Some(average);
        self
    }

    pub fn key(&self) -> StaffKey {
        StaffKey::new(self.department, self.name.clone())
    }
}

fn default_role(department: Department) -> &'static str {
    match department {
        Department::Cutting => "CUT",
        Department::Sewing => "SEW",
        Department::Clipping => "CLIP",
        Department::Dispatch => "DISPATCH",
    }
}
