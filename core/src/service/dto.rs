use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::entry::AttendanceStatus;
use crate::model::material::AlertLevel;
use crate::model::sales::{DispatchStage, SalesChannel};
use crate::model::staff::Department;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AttendanceSummary {
    pub present: u32,
    pub off: u32,
    pub holiday: u32,
    pub sick: u32,
}

impl AttendanceSummary {
    pub fn count(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Off => self.off += 1,
            AttendanceStatus::Holiday => self.holiday += 1,
            AttendanceStatus::Sick => self.sick += 1,
        }
    }

    pub fn recorded_days(&self) -> u32 {
        self.present + self.off + self.holiday + self.sick
    }
}

/// Target against actual output over a range of days.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    pub target: u64,
    pub actual: u64,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.target == 0 {
            0.0
        } else {
            self.actual as f64 / self.target as f64 * 100.0
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub weekday: String, // Mon, Tue...
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DepartmentTotals {
    pub department: Department,
    pub daily_target: u64,
    pub actual: u64,
    /// None for departments with no historical figures yet.
    pub historical_average: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub quantity: Option<u32>,
    pub status: Option<AttendanceStatus>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StaffRow {
    pub name: String,
    pub department: Department,
    pub role: String,
    pub daily_target: u32,
    pub historical_average: Option<u32>,
    pub monthly_average: Option<f64>,
    pub attendance: AttendanceSummary,
    pub days: Vec<DayCell>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MaterialAlert {
    pub id: String,
    pub current_quantity: f64,
    pub period_usage: f64,
    /// None when the material has no recorded usage.
    pub ratio: Option<f64>,
    pub level: AlertLevel,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeeklyProgress {
    pub week: usize, // 1-based within the month
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: Progress,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SalesSummary {
    pub orders: Vec<(SalesChannel, u32)>,
    pub total_orders: u64,
    pub dispatch: Vec<(DispatchStage, u32)>,
}
