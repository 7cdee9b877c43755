pub mod calendar;
pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod usecase;

pub use config::{MaterialConfig, PlannerConfig};
pub use error::PlannerError;
pub use model::entry::{AttendanceStatus, ProductionEntry};
pub use model::material::{AlertLevel, Material};
pub use model::sales::{DispatchStage, SalesChannel};
pub use model::snapshot::PlannerSnapshot;
pub use model::staff::{Department, StaffKey, StaffMember};
pub use repository::{FilePlannerRepository, PlannerRepository};
pub use service::ledger::ProductionLedger;
pub use service::sales::SalesBoard;
pub use service::stock::StockTracker;
pub use usecase::dashboard::{Planner, SharedPlanner};
