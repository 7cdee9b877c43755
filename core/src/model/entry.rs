use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlannerError;
use crate::model::staff::StaffKey;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Off,
    Holiday,
    Sick,
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        AttendanceStatus::Present
    }
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Off,
        AttendanceStatus::Holiday,
        AttendanceStatus::Sick,
    ];

    pub fn is_present(&self) -> bool {
        matches!(self, AttendanceStatus::Present)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Off => "Off",
            AttendanceStatus::Holiday => "Holiday",
            AttendanceStatus::Sick => "Sick",
        };
        f.write_str(label)
    }
}

impl FromStr for AttendanceStatus {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" | "p" => Ok(AttendanceStatus::Present),
            "off" | "o" => Ok(AttendanceStatus::Off),
            "holiday" | "h" => Ok(AttendanceStatus::Holiday),
            "sick" | "s" => Ok(AttendanceStatus::Sick),
            other => Err(PlannerError::invalid(format!("unknown attendance status '{}'", other))),
        }
    }
}

/// One staff member's output on one day.
///
/// `quantity` is always zero when `status` is not `Present`; the ledger
/// coerces it on insert.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductionEntry {
    pub staff: StaffKey,
    pub date: NaiveDate,
    pub quantity: u32,
    pub status: AttendanceStatus,
}
