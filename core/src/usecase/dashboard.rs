use chrono::{Datelike, NaiveDate};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use crate::calendar;
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::model::entry::{AttendanceStatus, ProductionEntry};
use crate::model::sales::{DispatchStage, SalesChannel};
use crate::model::snapshot::{PlannerSnapshot, SNAPSHOT_VERSION};
use crate::model::staff::{Department, StaffKey, StaffMember};
use crate::service::dto::{
    CalendarDay, DayCell, DepartmentTotals, MaterialAlert, Progress, SalesSummary, StaffRow,
    WeeklyProgress,
};
use crate::service::ledger::ProductionLedger;
use crate::service::sales::SalesBoard;
use crate::service::stock::StockTracker;

/// Everything the planning dashboard reads from, for one month.
#[derive(Debug, Clone)]
pub struct Planner {
    ledger: ProductionLedger,
    stock: StockTracker,
    sales: SalesBoard,
}

impl Planner {
    pub fn new(year: i32, month_index: u32) -> Result<Self> {
        Ok(Self {
            ledger: ProductionLedger::new(year, month_index)?,
            stock: StockTracker::new(),
            sales: SalesBoard::new(),
        })
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let mut planner = Self::new(config.year, config.month_index)?;
        for member in &config.staff {
            planner.ledger.add_staff(member.clone())?;
        }
        for material in &config.materials {
            planner
                .stock
                .update_material(&material.id, material.current_quantity, material.period_usage)?;
        }
        let period = calendar::period_label(config.year, config.month_index)?;
        info!(
            %period,
            staff = config.staff.len(),
            materials = config.materials.len(),
            "planner configured"
        );
        Ok(planner)
    }

    /// Rebuilds a planner, validating every record on the way in.
    pub fn from_snapshot(snapshot: PlannerSnapshot) -> Result<Self> {
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(PlannerError::invalid(format!(
                "snapshot version {} is newer than supported version {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        let mut planner = Self::new(snapshot.year, snapshot.month_index)?;
        for member in snapshot.staff {
            planner.ledger.add_staff(member)?;
        }
        for material in snapshot.materials {
            planner
                .stock
                .update_material(&material.id, material.current_quantity, material.period_usage)?;
        }
        for entry in snapshot.entries {
            planner.ledger.record_entry(
                &entry.staff,
                entry.date,
                i64::from(entry.quantity),
                entry.status,
            )?;
        }
        planner.sales = snapshot.sales;
        Ok(planner)
    }

    pub fn snapshot(&self) -> PlannerSnapshot {
        PlannerSnapshot {
            version: SNAPSHOT_VERSION,
            year: self.ledger.year(),
            month_index: self.ledger.month_index(),
            staff: self.ledger.roster().cloned().collect(),
            materials: self.stock.materials().cloned().collect(),
            entries: self.ledger.entries().cloned().collect(),
            sales: self.sales.clone(),
        }
    }

    pub fn ledger(&self) -> &ProductionLedger {
        &self.ledger
    }

    pub fn stock(&self) -> &StockTracker {
        &self.stock
    }

    pub fn sales(&self) -> &SalesBoard {
        &self.sales
    }

    pub fn period_label(&self) -> Result<String> {
        calendar::period_label(self.ledger.year(), self.ledger.month_index())
    }

    // Queries

    pub fn get_calendar(&self) -> Vec<CalendarDay> {
        self.ledger
            .days()
            .iter()
            .map(|d| CalendarDay {
                date: *d,
                day: d.day(),
                weekday: d.format("%a").to_string(),
            })
            .collect()
    }

    pub fn get_department_totals(&self, date: NaiveDate) -> Vec<DepartmentTotals> {
        Department::ALL
            .iter()
            .map(|d| DepartmentTotals {
                department: *d,
                daily_target: self.ledger.department_daily_target(*d),
                actual: self.ledger.department_actual(*d, date),
                historical_average: self.ledger.department_historical_average(*d),
            })
            .collect()
    }

    pub fn get_staff_row(&self, staff: &StaffKey) -> Result<StaffRow> {
        let member = self
            .ledger
            .staff(staff)
            .ok_or_else(|| PlannerError::unknown_staff(staff))?;

        let days = self
            .ledger
            .days()
            .iter()
            .map(|d| {
                let entry = self.ledger.entry(staff, *d);
                DayCell {
                    date: *d,
                    quantity: entry.map(|e| e.quantity),
                    status: entry.map(|e| e.status),
                }
            })
            .collect();

        Ok(StaffRow {
            name: member.name.clone(),
            department: member.department,
            role: member.role.clone(),
            daily_target: member.daily_target,
            historical_average: member.historical_average,
            monthly_average: self.ledger.staff_monthly_average(staff)?,
            attendance: self.ledger.attendance_summary(staff)?,
            days,
        })
    }

    pub fn get_roster_rows(&self) -> Result<Vec<StaffRow>> {
        self.ledger
            .roster()
            .map(|m| self.get_staff_row(&m.key()))
            .collect()
    }

    pub fn get_material_alerts(&self) -> Vec<MaterialAlert> {
        self.stock.alerts()
    }

    /// Progress per Monday-started week. `None` sums every department.
    pub fn get_weekly_progress(
        &self,
        department: Option<Department>,
    ) -> Result<Vec<WeeklyProgress>> {
        let departments: Vec<Department> = match department {
            Some(d) => vec![d],
            None => Department::ALL.to_vec(),
        };
        let weeks = calendar::weeks(self.ledger.year(), self.ledger.month_index())?;

        weeks
            .iter()
            .enumerate()
            .filter_map(|(i, week)| Some((i, *week.first()?, *week.last()?, week)))
            .map(|(i, start, end, week)| -> Result<WeeklyProgress> {
                let mut progress = Progress::default();
                for d in &departments {
                    let p = self.ledger.progress(*d, week)?;
                    progress.target += p.target;
                    progress.actual += p.actual;
                }
                Ok(WeeklyProgress {
                    week: i + 1,
                    start,
                    end,
                    progress,
                })
            })
            .collect()
    }

    pub fn get_sales(&self) -> SalesSummary {
        self.sales.summary()
    }

    // Commands

    pub fn add_staff(&mut self, member: StaffMember) -> Result<()> {
        self.ledger.add_staff(member)
    }

    pub fn remove_staff(&mut self, staff: &StaffKey) -> Result<StaffMember> {
        self.ledger.remove_staff(staff)
    }

    pub fn record_entry(
        &mut self,
        staff: &StaffKey,
        date: NaiveDate,
        quantity: i64,
        status: AttendanceStatus,
    ) -> Result<ProductionEntry> {
        self.ledger.record_entry(staff, date, quantity, status)
    }

    pub fn update_material(
        &mut self,
        id: &str,
        current_quantity: f64,
        period_usage: f64,
    ) -> Result<()> {
        self.stock.update_material(id, current_quantity, period_usage)
    }

    pub fn remove_material(&mut self, id: &str) -> Result<()> {
        self.stock.remove_material(id).map(|_| ())
    }

    pub fn set_orders(&mut self, channel: SalesChannel, count: u32) {
        self.sales.set_orders(channel, count)
    }

    pub fn set_dispatch(&mut self, stage: DispatchStage, count: u32) {
        self.sales.set_dispatch(stage, count)
    }

    pub fn advance_dispatch(&mut self, from: DispatchStage, count: u32) -> Result<()> {
        self.sales.advance(from, count)
    }
}

/// A planner shared between threads.
///
/// Commands hold the write lock for their whole mutation; queries copy their
/// result out under the read lock, so readers never see half a write.
#[derive(Debug, Clone)]
pub struct SharedPlanner {
    inner: Arc<RwLock<Planner>>,
}

impl SharedPlanner {
    pub fn new(planner: Planner) -> Self {
        Self {
            inner: Arc::new(RwLock::new(planner)),
        }
    }

    pub fn read<T>(&self, f: impl FnOnce(&Planner) -> T) -> T {
        let guard = self.inner.read();
        f(&*guard)
    }

    pub fn write<T>(&self, f: impl FnOnce(&mut Planner) -> T) -> T {
        let mut guard = self.inner.write();
        f(&mut *guard)
    }

    pub fn get_calendar(&self) -> Vec<CalendarDay> {
        self.read(|p| p.get_calendar())
    }

    pub fn get_department_totals(&self, date: NaiveDate) -> Vec<DepartmentTotals> {
        self.read(|p| p.get_department_totals(date))
    }

    pub fn get_staff_row(&self, staff: &StaffKey) -> Result<StaffRow> {
        self.read(|p| p.get_staff_row(staff))
    }

    pub fn get_material_alerts(&self) -> Vec<MaterialAlert> {
        self.read(|p| p.get_material_alerts())
    }

    pub fn record_entry(
        &self,
        staff: &StaffKey,
        date: NaiveDate,
        quantity: i64,
        status: AttendanceStatus,
    ) -> Result<ProductionEntry> {
        self.write(|p| p.record_entry(staff, date, quantity, status))
    }

    pub fn update_material(
        &self,
        id: &str,
        current_quantity: f64,
        period_usage: f64,
    ) -> Result<()> {
        self.write(|p| p.update_material(id, current_quantity, period_usage))
    }

    pub fn snapshot(&self) -> PlannerSnapshot {
        self.read(|p| p.snapshot())
    }
}
