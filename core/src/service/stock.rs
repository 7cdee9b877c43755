use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::model::material::{AlertLevel, Material};
use crate::service::dto::MaterialAlert;

/// Below one period of usage left, stock is critical.
pub const CRITICAL_RATIO: f64 = 1.0;
/// Below two periods of usage left, stock needs checking.
pub const WARNING_RATIO: f64 = 2.0;

pub fn classify(material: &Material) -> AlertLevel {
    if material.period_usage == 0.0 {
        return AlertLevel::Ok;
    }
    let ratio = material.ratio();
    if ratio < CRITICAL_RATIO {
        AlertLevel::Critical
    } else if ratio < WARNING_RATIO {
        AlertLevel::Warning
    } else {
        AlertLevel::Ok
    }
}

#[derive(Debug, Clone, Default)]
pub struct StockTracker {
    materials: BTreeMap<String, Material>,
}

impl StockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are trimmed on insert and on every lookup.
    pub fn update_material(
        &mut self,
        id: &str,
        current_quantity: f64,
        period_usage: f64,
    ) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(PlannerError::invalid("material id must not be empty"));
        }
        let fields = [
            ("current quantity", current_quantity),
            ("period usage", period_usage),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PlannerError::invalid(format!(
                    "{} for '{}' must be a non-negative number, got {}",
                    field, id, value
                )));
            }
        }

        debug!(material = id, current_quantity, period_usage, "updating material");
        self.materials.insert(
            id.to_string(),
            Material {
                id: id.to_string(),
                current_quantity,
                period_usage,
            },
        );
        Ok(())
    }

    pub fn remove_material(&mut self, id: &str) -> Result<Material> {
        self.materials
            .remove(id.trim())
            .ok_or_else(|| PlannerError::UnknownMaterial(id.to_string()))
    }

    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id.trim())
    }

    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn alert_level(&self, id: &str) -> Result<AlertLevel> {
        self.material(id)
            .map(classify)
            .ok_or_else(|| PlannerError::UnknownMaterial(id.to_string()))
    }

    /// Ids at `level`, most urgent (lowest ratio) first.
    pub fn list_by_level(&self, level: AlertLevel) -> Vec<String> {
        self.by_urgency()
            .into_iter()
            .filter(|m| classify(m) == level)
            .map(|m| m.id.clone())
            .collect()
    }

    /// Every material with its level, most urgent first.
    pub fn alerts(&self) -> Vec<MaterialAlert> {
        self.by_urgency()
            .into_iter()
            .map(|m| MaterialAlert {
                id: m.id.clone(),
                current_quantity: m.current_quantity,
                period_usage: m.period_usage,
                ratio: Some(m.ratio()).filter(|r| r.is_finite()),
                level: classify(m),
            })
            .collect()
    }

    fn by_urgency(&self) -> Vec<&Material> {
        let mut materials: Vec<&Material> = self.materials.values().collect();
        // BTreeMap iteration is already id-ordered, and the sort is stable.
        materials.sort_by(|a, b| a.ratio().total_cmp(&b.ratio()));
        materials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StockTracker {
        let mut tracker = StockTracker::new();
        tracker.update_material("CT65 Black", 2400.0, 811.0).unwrap();
        tracker.update_material("RUBSTD RUBBER", 472.0, 120.0).unwrap();
        tracker.update_material("Clips D", 1539.0, 1539.0).unwrap();
        tracker
    }

    #[test]
    fn test_rubstd_is_ok() {
        let tracker = sample();
        assert_eq!(tracker.alert_level("RUBSTD RUBBER").unwrap(), AlertLevel::Ok);
    }

    #[test]
    fn test_boundary_belongs_to_warning() {
        let tracker = sample();
        assert_eq!(tracker.alert_level("Clips D").unwrap(), AlertLevel::Warning);
        assert_eq!(tracker.alert_level("CT65 Black").unwrap(), AlertLevel::Ok);
    }

    #[test]
    fn test_levels() {
        let mut tracker = StockTracker::new();
        tracker.update_material("empty", 0.0, 10.0).unwrap();
        tracker.update_material("low", 9.99, 10.0).unwrap();
        tracker.update_material("two", 20.0, 10.0).unwrap();
        tracker.update_material("unused", 0.0, 0.0).unwrap();

        assert_eq!(tracker.alert_level("empty").unwrap(), AlertLevel::Critical);
        assert_eq!(tracker.alert_level("low").unwrap(), AlertLevel::Critical);
        assert_eq!(tracker.alert_level("two").unwrap(), AlertLevel::Ok);
        assert_eq!(tracker.alert_level("unused").unwrap(), AlertLevel::Ok);
    }

    #[test]
    fn test_list_by_level_most_urgent_first() {
        let mut tracker = StockTracker::new();
        tracker.update_material("b", 15.0, 10.0).unwrap();
        tracker.update_material("a", 11.0, 10.0).unwrap();
        tracker.update_material("c", 15.0, 10.0).unwrap();
        tracker.update_material("z", 1.0, 10.0).unwrap();

        assert_eq!(tracker.list_by_level(AlertLevel::Warning), vec!["a", "b", "c"]);
        assert_eq!(tracker.list_by_level(AlertLevel::Critical), vec!["z"]);
        assert!(tracker.list_by_level(AlertLevel::Ok).is_empty());
    }

    #[test]
    fn test_upsert_replaces() {
        let mut tracker = sample();
        tracker.update_material("Clips D", 100.0, 1539.0).unwrap();
        assert_eq!(tracker.alert_level("Clips D").unwrap(), AlertLevel::Critical);
        assert_eq!(tracker.materials().count(), 3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut tracker = StockTracker::new();
        assert!(matches!(
            tracker.update_material("x", -1.0, 1.0),
            Err(PlannerError::InvalidArgument(_))
        ));
        assert!(matches!(
            tracker.update_material("x", 1.0, -0.5),
            Err(PlannerError::InvalidArgument(_))
        ));
        assert!(matches!(
            tracker.update_material("x", f64::NAN, 1.0),
            Err(PlannerError::InvalidArgument(_))
        ));
        assert!(matches!(
            tracker.update_material(" ", 1.0, 1.0),
            Err(PlannerError::InvalidArgument(_))
        ));
        assert!(tracker.material("x").is_none());
    }

    #[test]
    fn test_ids_trimmed_on_lookup() {
        let mut tracker = StockTracker::new();
        tracker.update_material(" Clips D ", 1539.0, 1539.0).unwrap();

        assert_eq!(tracker.material("Clips D").unwrap().id, "Clips D");
        assert_eq!(tracker.alert_level(" Clips D ").unwrap(), AlertLevel::Warning);
        assert_eq!(tracker.alert_level("Clips D").unwrap(), AlertLevel::Warning);
        tracker.remove_material("  Clips D").unwrap();
        assert_eq!(tracker.materials().count(), 0);
    }

    #[test]
    fn test_unknown_material() {
        let mut tracker = sample();
        assert!(matches!(tracker.alert_level("nope"), Err(PlannerError::UnknownMaterial(_))));
        assert!(matches!(tracker.remove_material("nope"), Err(PlannerError::UnknownMaterial(_))));
        tracker.remove_material("Clips D").unwrap();
        assert!(tracker.alert_level("Clips D").is_err());
    }

    #[test]
    fn test_alerts_order() {
        let alerts = sample().alerts();
        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["Clips D", "CT65 Black", "RUBSTD RUBBER"]);
        assert_eq!(alerts[0].ratio, Some(1.0));
    }
}
