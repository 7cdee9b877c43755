use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlannerError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Material {
    pub id: String,
    pub current_quantity: f64,
    pub period_usage: f64,
}

impl Material {
    /// Stock left measured in periods of usage. Unused materials never run out.
    pub fn ratio(&self) -> f64 {
        if self.period_usage == 0.0 {
            f64::INFINITY
        } else {
            self.current_quantity / self.period_usage
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Ok,
    Warning,
    Critical,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AlertLevel::Ok => "OK",
            AlertLevel::Warning => "Check Stock",
            AlertLevel::Critical => "Low Stock!",
        };
        f.write_str(label)
    }
}

impl FromStr for AlertLevel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ok" => Ok(AlertLevel::Ok),
            "warning" | "warn" => Ok(AlertLevel::Warning),
            "critical" | "crit" => Ok(AlertLevel::Critical),
            other => Err(PlannerError::invalid(format!("unknown alert level '{}'", other))),
        }
    }
}
