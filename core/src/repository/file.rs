use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::model::snapshot::PlannerSnapshot;
use crate::repository::traits::PlannerRepository;

const DEFAULT_DIR_NAME: &str = ".planner";
const FILE_PREFIX: &str = "planner_";

/// Keeps each month in its own `planner_YYYY_MM.json` under a base directory.
#[derive(Clone)]
pub struct FilePlannerRepository {
    base_dir: PathBuf,
}

impl FilePlannerRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let path = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(DEFAULT_DIR_NAME)
            }
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Could not create data directory {}", path.display()))?;
        Ok(Self { base_dir: path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, year: i32, month_index: u32) -> PathBuf {
        self.base_dir
            .join(format!("{}{:04}_{:02}.json", FILE_PREFIX, year, month_index + 1))
    }
}

fn parse_period(file_name: &str) -> Option<(i32, u32)> {
    let stem = file_name.strip_prefix(FILE_PREFIX)?.strip_suffix(".json")?;
    let (year, month) = stem.split_once('_')?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year.parse().ok()?, month - 1))
}

impl PlannerRepository for FilePlannerRepository {
    fn load(&self, year: i32, month_index: u32) -> Result<Option<PlannerSnapshot>> {
        let path = self.file_path(year, month_index);
        if !path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&path)?);
        let snapshot: PlannerSnapshot = serde_json::from_reader(reader)
            .with_context(|| format!("Corrupt planner file {}", path.display()))?;
        info!(path = %path.display(), entries = snapshot.entries.len(), "loaded planner");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &PlannerSnapshot) -> Result<()> {
        let path = self.file_path(snapshot.year, snapshot.month_index);
        // Replace the file atomically via a temp file.
        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;
        info!(path = %path.display(), entries = snapshot.entries.len(), "saved planner");
        Ok(())
    }

    fn list_periods(&self) -> Result<Vec<(i32, u32)>> {
        let mut periods = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if let Some(period) = entry.file_name().to_str().and_then(parse_period) {
                periods.push(period);
            }
        }
        periods.sort();
        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::model::entry::AttendanceStatus;
    use crate::model::staff::{Department, StaffKey};
    use crate::usecase::dashboard::Planner;
    use chrono::NaiveDate;

    fn repo() -> (tempfile::TempDir, FilePlannerRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilePlannerRepository::new(Some(dir.path().to_path_buf())).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, repo) = repo();
        let mut planner = Planner::from_config(&PlannerConfig::sample()).unwrap();
        planner
            .record_entry(
                &StaffKey::new(Department::Dispatch, "DISPATCH"),
                NaiveDate::from_ymd_opt(2024, 12, 9).unwrap(),
                512,
                AttendanceStatus::Present,
            )
            .unwrap();
        planner.update_material("Clips D", 1200.0, 1539.0).unwrap();

        let snapshot = planner.snapshot();
        repo.save(&snapshot).unwrap();

        assert!(repo.base_dir().join("planner_2024_12.json").exists());
        assert_eq!(repo.load(2024, 11).unwrap(), Some(snapshot));
        assert_eq!(repo.load(2025, 0).unwrap(), None);
    }

    #[test]
    fn test_latest_period() {
        let (_dir, repo) = repo();
        assert!(repo.latest().unwrap().is_none());

        for (year, month_index) in [(2024, 11), (2025, 0), (2024, 9)] {
            let planner = Planner::new(year, month_index).unwrap();
            repo.save(&planner.snapshot()).unwrap();
        }
        fs::write(repo.base_dir().join("notes.txt"), "ignore me").unwrap();

        assert_eq!(repo.list_periods().unwrap(), vec![(2024, 9), (2024, 11), (2025, 0)]);
        let latest = repo.latest().unwrap().unwrap();
        assert_eq!((latest.year, latest.month_index), (2025, 0));
    }

    #[test]
    fn test_corrupt_file() {
        let (_dir, repo) = repo();
        fs::write(repo.base_dir().join("planner_2024_12.json"), "{ not json").unwrap();
        assert!(repo.load(2024, 11).is_err());
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("planner_2024_12.json"), Some((2024, 11)));
        assert_eq!(parse_period("planner_2024_13.json"), None);
        assert_eq!(parse_period("planner_2024_12.json.tmp"), None);
        assert_eq!(parse_period("stats_2024_12.json"), None);
    }
}
