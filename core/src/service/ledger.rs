use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::calendar;
use crate::error::{PlannerError, Result};
use crate::model::entry::{AttendanceStatus, ProductionEntry};
use crate::model::staff::{Department, StaffKey, StaffMember};
use crate::service::dto::{AttendanceSummary, Progress};

/// Per-staff, per-day production for one calendar month.
///
/// Aggregates are computed from the roster and entries on every call; nothing
/// derived is stored.
#[derive(Debug, Clone)]
pub struct ProductionLedger {
    year: i32,
    month_index: u32,
    days: Vec<NaiveDate>,
    roster: BTreeMap<Department, Vec<StaffMember>>,
    entries: BTreeMap<StaffKey, BTreeMap<NaiveDate, ProductionEntry>>,
}

impl ProductionLedger {
    pub fn new(year: i32, month_index: u32) -> Result<Self> {
        let days = calendar::expand(year, month_index)?;
        Ok(Self {
            year,
            month_index,
            days,
            roster: BTreeMap::new(),
            entries: BTreeMap::new(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_index(&self) -> u32 {
        self.month_index
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        // days is sorted and contiguous
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => *first <= date && date <= *last,
            _ => false,
        }
    }

    // Roster

    /// Names are stored trimmed and must be unique within a department,
    /// ignoring case.
    pub fn add_staff(&mut self, mut member: StaffMember) -> Result<()> {
        member.name = member.name.trim().to_string();
        if member.name.is_empty() {
            return Err(PlannerError::invalid("staff name must not be empty"));
        }
        if let Some(existing) = self
            .department_members(member.department)
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(&member.name))
        {
            return Err(PlannerError::invalid(format!(
                "staff member {} clashes with {} already on the roster",
                member.key(),
                existing.key()
            )));
        }
        debug!(staff = %member.key(), target = member.daily_target, "adding staff member");
        self.roster.entry(member.department).or_default().push(member);
        Ok(())
    }

    /// Removes a member together with every entry recorded for them.
    pub fn remove_staff(&mut self, key: &StaffKey) -> Result<StaffMember> {
        let members = self
            .roster
            .get_mut(&key.department)
            .ok_or_else(|| PlannerError::unknown_staff(key))?;
        let pos = members
            .iter()
            .position(|m| m.name == key.name)
            .ok_or_else(|| PlannerError::unknown_staff(key))?;
        let removed = members.remove(pos);
        if members.is_empty() {
            self.roster.remove(&key.department);
        }
        let dropped = self.entries.remove(key).map(|e| e.len()).unwrap_or(0);
        debug!(staff = %key, dropped_entries = dropped, "removed staff member");
        Ok(removed)
    }

    pub fn staff(&self, key: &StaffKey) -> Option<&StaffMember> {
        self.roster
            .get(&key.department)?
            .iter()
            .find(|m| m.name == key.name)
    }

    /// All members, grouped by department in display order.
    pub fn roster(&self) -> impl Iterator<Item = &StaffMember> {
        self.roster.values().flatten()
    }

    pub fn department_members(&self, department: Department) -> &[StaffMember] {
        self.roster
            .get(&department)
            .map(|m| m.as_slice())
            .unwrap_or(&[])
    }

    /// Finds a member by name (case-insensitive), optionally narrowed to one department.
    pub fn resolve(&self, name: &str, department: Option<Department>) -> Result<StaffKey> {
        let matches: Vec<&StaffMember> = self
            .roster()
            .filter(|m| department.map_or(true, |d| m.department == d))
            .filter(|m| m.name.eq_ignore_ascii_case(name.trim()))
            .collect();

        match matches.as_slice() {
            [member] => Ok(member.key()),
            [] => Err(PlannerError::UnknownStaff(name.to_string())),
            many => Err(PlannerError::AmbiguousStaff {
                name: name.to_string(),
                departments: many
                    .iter()
                    .map(|m| m.department.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    // Entries

    /// Stores an entry, replacing any earlier one for the same member and day.
    ///
    /// A non-zero quantity on a day the member was not present is coerced to
    /// zero and reported with a warning. Returns the entry as stored.
    pub fn record_entry(
        &mut self,
        staff: &StaffKey,
        date: NaiveDate,
        quantity: i64,
        status: AttendanceStatus,
    ) -> Result<ProductionEntry> {
        if self.staff(staff).is_none() {
            return Err(PlannerError::unknown_staff(staff));
        }
        if !self.contains_date(date) {
            return Err(PlannerError::InvalidDate {
                date,
                period: calendar::period_label(self.year, self.month_index)?,
            });
        }
        if quantity < 0 {
            return Err(PlannerError::invalid(format!(
                "quantity must not be negative, got {}",
                quantity
            )));
        }
        let mut quantity = u32::try_from(quantity)
            .map_err(|_| PlannerError::invalid(format!("quantity {} is too large", quantity)))?;

        if !status.is_present() && quantity > 0 {
            warn!(
                staff = %staff,
                %date,
                %status,
                discarded = quantity,
                "quantity recorded for an absent day, storing 0"
            );
            quantity = 0;
        }

        let entry = ProductionEntry {
            staff: staff.clone(),
            date,
            quantity,
            status,
        };
        let previous = self
            .entries
            .entry(staff.clone())
            .or_default()
            .insert(date, entry.clone());
        debug!(
            staff = %staff,
            %date,
            quantity,
            %status,
            replaced = previous.is_some(),
            "recorded entry"
        );
        Ok(entry)
    }

    pub fn entry(&self, staff: &StaffKey, date: NaiveDate) -> Option<&ProductionEntry> {
        self.entries.get(staff)?.get(&date)
    }

    /// A member's entries in date order.
    pub fn entries_for(&self, staff: &StaffKey) -> impl Iterator<Item = &ProductionEntry> {
        self.entries.get(staff).into_iter().flat_map(|e| e.values())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProductionEntry> {
        self.entries.values().flat_map(|e| e.values())
    }

    // Aggregates

    pub fn department_daily_target(&self, department: Department) -> u64 {
        self.department_members(department)
            .iter()
            .map(|m| m.daily_target as u64)
            .sum()
    }

    pub fn department_actual(&self, department: Department, date: NaiveDate) -> u64 {
        self.department_members(department)
            .iter()
            .filter_map(|m| self.entry(&m.key(), date))
            .map(|e| e.quantity as u64)
            .sum()
    }

    /// Mean output over PRESENT days. `None` means no PRESENT day has been
    /// recorded, which is different from averaging zero.
    pub fn staff_monthly_average(&self, staff: &StaffKey) -> Result<Option<f64>> {
        if self.staff(staff).is_none() {
            return Err(PlannerError::unknown_staff(staff));
        }
        let (days, total) = self
            .entries_for(staff)
            .filter(|e| e.status.is_present())
            .fold((0u32, 0u64), |(days, total), e| (days + 1, total + e.quantity as u64));

        if days == 0 {
            Ok(None)
        } else {
            Ok(Some(total as f64 / days as f64))
        }
    }

    /// Sum of the members' historical averages, skipping members without one.
    pub fn department_historical_average(&self, department: Department) -> Option<u64> {
        self.department_members(department)
            .iter()
            .filter_map(|m| m.historical_average)
            .map(u64::from)
            .reduce(|a, b| a + b)
    }

    pub fn attendance_summary(&self, staff: &StaffKey) -> Result<AttendanceSummary> {
        if self.staff(staff).is_none() {
            return Err(PlannerError::unknown_staff(staff));
        }
        let mut summary = AttendanceSummary::default();
        for entry in self.entries_for(staff) {
            summary.count(entry.status);
        }
        Ok(summary)
    }

    pub fn progress(&self, department: Department, dates: &[NaiveDate]) -> Result<Progress> {
        if let Some(date) = dates.iter().find(|d| !self.contains_date(**d)) {
            return Err(PlannerError::InvalidDate {
                date: *date,
                period: calendar::period_label(self.year, self.month_index)?,
            });
        }
        Ok(Progress {
            target: self.department_daily_target(department) * dates.len() as u64,
            actual: dates
                .iter()
                .map(|d| self.department_actual(department, *d))
                .sum(),
        })
    }
}
