use crate::model::snapshot::PlannerSnapshot;
use anyhow::Result;

/// Storage for planner snapshots, one per planning month.
pub trait PlannerRepository {
    /// `month_index` is zero-based.
    fn load(&self, year: i32, month_index: u32) -> Result<Option<PlannerSnapshot>>;
    fn save(&self, snapshot: &PlannerSnapshot) -> Result<()>;
    /// Stored periods, oldest first.
    fn list_periods(&self) -> Result<Vec<(i32, u32)>>;

    fn latest(&self) -> Result<Option<PlannerSnapshot>> {
        match self.list_periods()?.last() {
            Some((year, month_index)) => self.load(*year, *month_index),
            None => Ok(None),
        }
    }
}
