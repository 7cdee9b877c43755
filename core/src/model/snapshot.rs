use serde::{Deserialize, Serialize};

use crate::model::entry::ProductionEntry;
use crate::model::material::Material;
use crate::model::staff::StaffMember;
use crate::service::sales::SalesBoard;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Persisted form of a planner: one record per staff member, material and
/// production entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlannerSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub year: i32,
    pub month_index: u32,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub entries: Vec<ProductionEntry>,
    #[serde(default)]
    pub sales: SalesBoard,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}
