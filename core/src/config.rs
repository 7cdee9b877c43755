use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::staff::{Department, StaffMember};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MaterialConfig {
    pub id: String,
    pub current_quantity: f64,
    pub period_usage: f64,
}

/// Reference data a planner is seeded from: the month being planned, the
/// roster and the tracked materials.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub year: i32,
    /// Zero-based, 11 is December.
    pub month_index: u32,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
}

impl PlannerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// The December 2024 workshop: two cutting machines, six sewers, a new
    /// clipping station and dispatch.
    pub fn sample() -> Self {
        let staff = vec![
            StaffMember::new(Department::Cutting, "BLUE MACHINE", 400).with_historical_average(343),
            StaffMember::new(Department::Cutting, "WHITE MACHINE", 400)
                .with_historical_average(139),
            StaffMember::new(Department::Sewing, "AY", 100).with_historical_average(92),
            StaffMember::new(Department::Sewing, "DAX", 100).with_historical_average(71),
            StaffMember::new(Department::Sewing, "KATE", 100).with_historical_average(92),
            StaffMember::new(Department::Sewing, "LIZ", 100).with_historical_average(69),
            StaffMember::new(Department::Sewing, "PAULINE", 100).with_historical_average(112),
            StaffMember::new(Department::Sewing, "SANDRA", 100).with_historical_average(55),
            StaffMember::new(Department::Clipping, "CLIPPER 1", 100),
            StaffMember::new(Department::Dispatch, "DISPATCH", 549).with_historical_average(549),
        ];

        let materials = [
            ("CT65 Black", 2400.0, 811.0),
            ("RUBSTD RUBBER", 472.0, 120.0),
            ("Clips D", 1539.0, 1539.0),
        ]
        .into_iter()
        .map(|(id, current_quantity, period_usage)| MaterialConfig {
            id: id.to_string(),
            current_quantity,
            period_usage,
        })
        .collect();

        Self {
            year: 2024,
            month_index: 11,
            staff,
            materials,
        }
    }
}
