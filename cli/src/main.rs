mod logging;
mod report;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

use planner_core::{
    calendar, AlertLevel, AttendanceStatus, Department, DispatchStage, FilePlannerRepository,
    Planner, PlannerConfig, PlannerRepository, ProductionEntry, SalesChannel, StaffMember,
};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Track daily staff output against targets and material stock", long_about = None)]
struct Cli {
    /// Directory holding planner data (default: ~/.planner)
    #[arg(long, global = true, env = "PLANNER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Planning month as YYYY-MM (default: the latest stored month)
    #[arg(long, global = true)]
    month: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a planning month from a JSON config, or from the sample workshop
    Init {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overwrite an existing month
        #[arg(long)]
        force: bool,
    },
    /// Show the dates of the planning month
    Calendar,
    /// List staff with targets, averages and attendance
    Roster,
    /// Record a day's output (usage: record AY 2024-12-02 95 --status present)
    Record {
        staff: String,
        date: NaiveDate,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
        #[arg(long, default_value = "present")]
        status: AttendanceStatus,
        #[arg(long)]
        department: Option<Department>,
    },
    /// Department targets and output for one day
    Totals {
        /// Defaults to today, or the first day of the month when today is outside it
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Day-by-day entries for one staff member
    Staff {
        name: String,
        #[arg(long)]
        department: Option<Department>,
    },
    /// Add a staff member to the roster
    AddStaff {
        name: String,
        department: Department,
        daily_target: u32,
        #[arg(long)]
        role: Option<String>,
        /// Historical daily average
        #[arg(long)]
        average: Option<u32>,
    },
    /// Remove a staff member and their entries
    RemoveStaff {
        name: String,
        #[arg(long)]
        department: Option<Department>,
    },
    /// Set a material's current stock and usage per period
    Material {
        id: String,
        #[arg(allow_hyphen_values = true)]
        current: f64,
        #[arg(allow_hyphen_values = true)]
        usage: f64,
    },
    /// Stop tracking a material
    RemoveMaterial { id: String },
    /// Material stock alerts, most urgent first
    Alerts {
        #[arg(long)]
        level: Option<AlertLevel>,
    },
    /// Weekly target against actual output
    Progress {
        #[arg(long)]
        department: Option<Department>,
    },
    /// Set today's order count for a sales channel
    Orders { channel: SalesChannel, count: u32 },
    /// Set the number of orders in a dispatch stage
    Dispatch { stage: DispatchStage, count: u32 },
    /// Move orders from a dispatch stage to the next one
    Advance { stage: DispatchStage, count: u32 },
    /// Show order and dispatch counts
    Sales,
}

fn parse_month(value: &str) -> Result<(i32, u32)> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| anyhow!("Invalid month '{}', expected YYYY-MM", value))?;
    let year: i32 = year.parse().with_context(|| format!("Invalid year in '{}'", value))?;
    let month: u32 = month.parse().with_context(|| format!("Invalid month in '{}'", value))?;
    if !(1..=12).contains(&month) {
        bail!("Month must be between 01 and 12, got {}", month);
    }
    Ok((year, month - 1))
}

fn load_planner(repo: &FilePlannerRepository, month: Option<(i32, u32)>) -> Result<Planner> {
    let snapshot = match month {
        Some((year, month_index)) => repo.load(year, month_index)?,
        None => repo.latest()?,
    };
    let snapshot = snapshot.ok_or_else(|| {
        anyhow!(
            "No planner data found in {}. Run `planner init` first.",
            repo.base_dir().display()
        )
    })?;
    Ok(Planner::from_snapshot(snapshot)?)
}

fn default_date(planner: &Planner) -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    if planner.ledger().contains_date(today) {
        return Ok(today);
    }
    planner
        .ledger()
        .days()
        .first()
        .copied()
        .ok_or_else(|| anyhow!("Planning month has no days"))
}

fn init(
    repo: &FilePlannerRepository,
    month: Option<(i32, u32)>,
    config: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let mut config = match config {
        Some(path) => PlannerConfig::from_file(&path)?,
        None => PlannerConfig::sample(),
    };
    if let Some((year, month_index)) = month {
        config.year = year;
        config.month_index = month_index;
    }
    if !force && repo.load(config.year, config.month_index)?.is_some() {
        bail!(
            "{} already exists, use --force to overwrite",
            calendar::period_label(config.year, config.month_index)?
        );
    }
    let planner = Planner::from_config(&config)?;
    repo.save(&planner.snapshot())?;
    println!(
        "Planner created for {} ({} staff, {} materials)",
        planner.period_label()?,
        config.staff.len(),
        config.materials.len()
    );
    Ok(())
}

/// Set when the ledger stored something other than the requested quantity.
fn coercion_note(requested: i64, entry: &ProductionEntry) -> Option<String> {
    (i64::from(entry.quantity) != requested).then(|| {
        format!(
            "Note: {} is {} on {}, quantity stored as {}",
            entry.staff.name, entry.status, entry.date, entry.quantity
        )
    })
}

/// Runs one command against a loaded planner. Returns whether it changed anything.
fn execute(planner: &mut Planner, command: Commands) -> Result<bool> {
    let mut dirty = false;

    match command {
        Commands::Init { .. } => bail!("init does not operate on an existing planner"),
        Commands::Calendar => {
            println!("{}", planner.period_label()?);
            println!("{}", report::calendar(&planner.get_calendar()));
        }
        Commands::Roster => {
            println!("Production Planner - {}", planner.period_label()?);
            println!("{}", report::roster(&planner.get_roster_rows()?));
        }
        Commands::Record { staff, date, quantity, status, department } => {
            let key = planner.ledger().resolve(&staff, department)?;
            let entry = planner.record_entry(&key, date, quantity, status)?;
            if let Some(note) = coercion_note(quantity, &entry) {
                println!("{}", note);
            }
            println!("Recorded {} for {} on {} ({})", entry.quantity, key, date, entry.status);
            dirty = true;
        }
        Commands::Totals { date } => {
            let date = match date {
                Some(d) => d,
                None => default_date(planner)?,
            };
            println!("Department totals for {}", date.format("%a %Y-%m-%d"));
            println!("{}", report::totals(&planner.get_department_totals(date)));
        }
        Commands::Staff { name, department } => {
            let key = planner.ledger().resolve(&name, department)?;
            println!("{}", report::staff_days(&planner.get_staff_row(&key)?));
        }
        Commands::AddStaff { name, department, daily_target, role, average } => {
            let mut member = StaffMember::new(department, name, daily_target);
            if let Some(role) = role {
                member.role = role;
            }
            member.historical_average = average;
            let key = member.key();
            planner.add_staff(member)?;
            println!("Added {} with a daily target of {}", key, daily_target);
            dirty = true;
        }
        Commands::RemoveStaff { name, department } => {
            let key = planner.ledger().resolve(&name, department)?;
            planner.remove_staff(&key)?;
            println!("Removed {}", key);
            dirty = true;
        }
        Commands::Material { id, current, usage } => {
            planner.update_material(&id, current, usage)?;
            let level = planner.stock().alert_level(id.trim())?;
            println!("{}: current {} usage {} -> {}", id.trim(), current, usage, level);
            dirty = true;
        }
        Commands::RemoveMaterial { id } => {
            planner.remove_material(&id)?;
            println!("Stopped tracking {}", id);
            dirty = true;
        }
        Commands::Alerts { level } => match level {
            Some(level) => {
                let ids = planner.stock().list_by_level(level);
                if ids.is_empty() {
                    println!("No materials at level {:?}.", level);
                }
                for id in ids {
                    println!("{}", id);
                }
            }
            None => println!("{}", report::alerts(&planner.get_material_alerts())),
        },
        Commands::Progress { department } => {
            let label = department
                .map(|d| d.to_string())
                .unwrap_or_else(|| "All departments".to_string());
            println!("Weekly progress - {} - {}", label, planner.period_label()?);
            println!("{}", report::weekly(&planner.get_weekly_progress(department)?));
        }
        Commands::Orders { channel, count } => {
            planner.set_orders(channel, count);
            println!("{} orders: {}", channel, count);
            dirty = true;
        }
        Commands::Dispatch { stage, count } => {
            planner.set_dispatch(stage, count);
            println!("{}: {}", stage, count);
            dirty = true;
        }
        Commands::Advance { stage, count } => {
            planner.advance_dispatch(stage, count)?;
            println!("Moved {} orders on from {}", count, stage);
            dirty = true;
        }
        Commands::Sales => {
            println!("{}", report::sales(&planner.get_sales()));
        }
    }

    Ok(dirty)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let repo = FilePlannerRepository::new(cli.data_dir)?;
    let month = cli.month.as_deref().map(parse_month).transpose()?;
    debug!(data_dir = %repo.base_dir().display(), ?month, "opened repository");

    match cli.command {
        Commands::Init { config, force } => init(&repo, month, config, force),
        command => {
            let mut planner = load_planner(&repo, month)?;
            if execute(&mut planner, command)? {
                repo.save(&planner.snapshot())?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-12").unwrap(), (2024, 11));
        assert_eq!(parse_month("2025-01").unwrap(), (2025, 0));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("2024").is_err());
    }

    #[test]
    fn test_parse_record() {
        let args = ["planner", "record", "AY", "2024-12-02", "95", "--status", "sick"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Record { staff, quantity, status, department, .. } => {
                assert_eq!(staff, "AY");
                assert_eq!(quantity, 95);
                assert_eq!(status, AttendanceStatus::Sick);
                assert_eq!(department, None);
            }
            _ => panic!("expected record"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_channel() {
        assert!(Cli::try_parse_from(["planner", "orders", "etsy", "4"]).is_err());
    }

    fn sample_planner() -> Planner {
        Planner::from_config(&PlannerConfig::sample()).unwrap()
    }

    fn record(staff: &str, quantity: i64, status: AttendanceStatus) -> Commands {
        Commands::Record {
            staff: staff.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, 2).unwrap(),
            quantity,
            status,
            department: None,
        }
    }

    #[test]
    fn test_execute_record_marks_dirty() {
        let mut planner = sample_planner();
        let date = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();

        assert!(execute(&mut planner, record("ay", 95, AttendanceStatus::Present)).unwrap());
        let key = planner.ledger().resolve("AY", None).unwrap();
        assert_eq!(planner.ledger().entry(&key, date).unwrap().quantity, 95);
    }

    #[test]
    fn test_execute_coerces_absent_quantity() {
        let mut planner = sample_planner();
        let date = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();

        assert!(execute(&mut planner, record("AY", 40, AttendanceStatus::Sick)).unwrap());
        let key = planner.ledger().resolve("AY", None).unwrap();
        let entry = planner.ledger().entry(&key, date).unwrap().clone();
        assert_eq!(entry.quantity, 0);
        assert_eq!(
            coercion_note(40, &entry).as_deref(),
            Some("Note: AY is Sick on 2024-12-02, quantity stored as 0")
        );
        assert_eq!(coercion_note(0, &entry), None);
    }

    #[test]
    fn test_execute_read_only_commands_stay_clean() {
        let mut planner = sample_planner();
        let before = planner.snapshot();

        assert!(!execute(&mut planner, Commands::Calendar).unwrap());
        assert!(!execute(&mut planner, Commands::Roster).unwrap());
        assert!(!execute(&mut planner, Commands::Sales).unwrap());
        assert!(!execute(&mut planner, Commands::Alerts { level: None }).unwrap());
        assert!(!execute(&mut planner, Commands::Progress { department: None }).unwrap());
        assert_eq!(planner.snapshot(), before);
    }

    #[test]
    fn test_execute_failure_leaves_planner_untouched() {
        let mut planner = sample_planner();
        let before = planner.snapshot();

        assert!(execute(&mut planner, record("NOBODY", 10, AttendanceStatus::Present)).is_err());
        assert!(execute(&mut planner, record("AY", -1, AttendanceStatus::Present)).is_err());
        assert_eq!(planner.snapshot(), before);
    }

    #[test]
    fn test_execute_rejects_init() {
        let mut planner = sample_planner();
        let command = Commands::Init { config: None, force: false };
        assert!(execute(&mut planner, command).is_err());
    }

    #[test]
    fn test_init_refuses_existing_month_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePlannerRepository::new(Some(dir.path().to_path_buf())).unwrap();

        init(&repo, None, None, false).unwrap();
        let mut planner = load_planner(&repo, Some((2024, 11))).unwrap();
        execute(&mut planner, record("AY", 95, AttendanceStatus::Present)).unwrap();
        repo.save(&planner.snapshot()).unwrap();

        let err = init(&repo, None, None, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(load_planner(&repo, None).unwrap().snapshot(), planner.snapshot());

        init(&repo, None, None, true).unwrap();
        let fresh = load_planner(&repo, None).unwrap();
        assert_eq!(fresh.snapshot(), sample_planner().snapshot());
    }

    #[test]
    fn test_init_month_override() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePlannerRepository::new(Some(dir.path().to_path_buf())).unwrap();

        init(&repo, Some((2025, 0)), None, false).unwrap();
        assert!(repo.load(2025, 0).unwrap().is_some());
        assert!(repo.load(2024, 11).unwrap().is_none());
    }
}
