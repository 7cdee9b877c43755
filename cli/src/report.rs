use chrono::{Datelike, Weekday};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Style};
use tabled::{Table, Tabled};

use planner_core::service::dto::{
    CalendarDay, DepartmentTotals, MaterialAlert, SalesSummary, StaffRow, WeeklyProgress,
};
use planner_core::AlertLevel;

const CALENDAR_CELL_WIDTH: usize = 6;

#[derive(Tabled)]
struct RosterLine {
    #[tabled(rename = "Staff Member")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Daily Target")]
    target: u32,
    #[tabled(rename = "Hist Avg")]
    historical: String,
    #[tabled(rename = "Month Avg")]
    monthly: String,
    #[tabled(rename = "Present")]
    present: u32,
    #[tabled(rename = "Off/Hol/Sick")]
    absent: String,
}

#[derive(Tabled)]
struct DayLine {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    weekday: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct TotalsLine {
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Daily Target")]
    target: u64,
    #[tabled(rename = "Actual")]
    actual: u64,
    #[tabled(rename = "Hist Avg")]
    historical: String,
}

#[derive(Tabled)]
struct AlertLine {
    #[tabled(rename = "Material")]
    id: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Usage")]
    usage: String,
    #[tabled(rename = "Cover")]
    ratio: String,
    #[tabled(rename = "Status")]
    level: String,
}

#[derive(Tabled)]
struct WeekLine {
    #[tabled(rename = "Week")]
    week: usize,
    #[tabled(rename = "Dates")]
    dates: String,
    #[tabled(rename = "Target")]
    target: u64,
    #[tabled(rename = "Actual")]
    actual: u64,
    #[tabled(rename = "Progress")]
    percent: String,
}

#[derive(Tabled)]
struct CountLine {
    #[tabled(rename = "")]
    label: String,
    #[tabled(rename = "Count")]
    count: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .modify(Rows::first(), Color::FG_CYAN);
    table.to_string()
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// One row per Monday-started week. The first row is indented so weekdays
/// line up in columns.
pub fn calendar(days: &[CalendarDay]) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    for day in days {
        if rows.is_empty() || day.date.weekday() == Weekday::Mon {
            let lead = if rows.is_empty() {
                day.date.weekday().num_days_from_monday() as usize
            } else {
                0
            };
            rows.push(vec![" ".repeat(CALENDAR_CELL_WIDTH); lead]);
        }
        if let Some(row) = rows.last_mut() {
            row.push(format!("{:>2} {}", day.day, day.weekday));
        }
    }
    rows.iter()
        .map(|row| row.join("  ").trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn roster(rows: &[StaffRow]) -> String {
    render(
        rows.iter()
            .map(|r| RosterLine {
                name: r.name.clone(),
                role: r.role.clone(),
                department: r.department.to_string(),
                target: r.daily_target,
                historical: or_dash(r.historical_average),
                monthly: or_dash(r.monthly_average.map(|a| format!("{:.1}", a))),
                present: r.attendance.present,
                absent: format!(
                    "{}/{}/{}",
                    r.attendance.off, r.attendance.holiday, r.attendance.sick
                ),
            })
            .collect(),
    )
}

pub fn staff_days(row: &StaffRow) -> String {
    let lines = row
        .days
        .iter()
        .map(|d| DayLine {
            date: d.date.format("%Y-%m-%d").to_string(),
            weekday: d.date.format("%a").to_string(),
            quantity: or_dash(d.quantity),
            status: or_dash(d.status),
        })
        .collect();

    format!(
        "{} ({}, {})  target {}  month avg {}\n{}",
        row.name,
        row.role,
        row.department,
        row.daily_target,
        or_dash(row.monthly_average.map(|a| format!("{:.1}", a))),
        render(lines)
    )
}

pub fn totals(totals: &[DepartmentTotals]) -> String {
    render(
        totals
            .iter()
            .map(|t| TotalsLine {
                department: t.department.to_string(),
                target: t.daily_target,
                actual: t.actual,
                historical: t
                    .historical_average
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "New Department".to_string()),
            })
            .collect(),
    )
}

pub fn alerts(alerts: &[MaterialAlert]) -> String {
    if alerts.is_empty() {
        return "No materials tracked.".to_string();
    }
    let mut table = Table::new(alerts.iter().map(|a| AlertLine {
        id: a.id.clone(),
        current: format!("{}", a.current_quantity),
        usage: format!("{}", a.period_usage),
        ratio: or_dash(a.ratio.map(|r| format!("{:.2}x", r))),
        level: a.level.to_string(),
    }));
    table
        .with(Style::modern())
        .modify(Rows::first(), Color::FG_CYAN);

    for (i, alert) in alerts.iter().enumerate() {
        let color = match alert.level {
            AlertLevel::Critical => Color::FG_RED,
            AlertLevel::Warning => Color::FG_YELLOW,
            AlertLevel::Ok => continue,
        };
        table.modify(Rows::one(i + 1), color);
    }
    table.to_string()
}

pub fn weekly(weeks: &[WeeklyProgress]) -> String {
    render(
        weeks
            .iter()
            .map(|w| WeekLine {
                week: w.week,
                dates: format!("{} - {}", w.start.format("%b %d"), w.end.format("%b %d")),
                target: w.progress.target,
                actual: w.progress.actual,
                percent: format!("{:.0}%", w.progress.percent()),
            })
            .collect(),
    )
}

pub fn sales(summary: &SalesSummary) -> String {
    let mut orders: Vec<CountLine> = summary
        .orders
        .iter()
        .map(|(channel, count)| CountLine {
            label: channel.to_string(),
            count: count.to_string(),
        })
        .collect();
    orders.push(CountLine {
        label: "Total".to_string(),
        count: summary.total_orders.to_string(),
    });

    let dispatch = summary
        .dispatch
        .iter()
        .map(|(stage, count)| CountLine {
            label: stage.to_string(),
            count: count.to_string(),
        })
        .collect();

    format!("Today's Orders\n{}\n\nDispatch Status\n{}", render(orders), render(dispatch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::Planner;

    fn month(year: i32, month_index: u32) -> Vec<String> {
        let planner = Planner::new(year, month_index).unwrap();
        calendar(&planner.get_calendar())
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_calendar_rows_start_on_monday() {
        // 1 Dec 2024 is a Sunday, alone in its week.
        let rows = month(2024, 11);

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], format!("{} 1 Sun", " ".repeat(6 * 8)));
        assert!(rows[1].starts_with(" 2 Mon"));
        assert!(rows[1].ends_with(" 8 Sun"));
        assert_eq!(rows[5], "30 Mon  31 Tue");
    }

    #[test]
    fn test_calendar_month_starting_on_monday() {
        let rows = month(2025, 8);

        assert_eq!(rows.len(), 5);
        assert!(rows[0].starts_with(" 1 Mon"));
        assert!(rows[0].ends_with(" 7 Sun"));
        assert_eq!(rows[4], "29 Mon  30 Tue");
    }
}
