//! Batch drivers.
//!
//! - projects: build every project for a fixed target and collect artifacts
//! - programs: build every directory that carries a manifest

pub mod programs;
pub mod projects;

pub use programs::compile_programs;
pub use projects::compile_projects;

use crate::domain::{BatchReport, BuildUnit, DriverKind, UnitOutcome, UnitReport};
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Process units one after another, recording each outcome
///
/// With `fail_fast` the loop stops after the first failed unit and the
/// report is marked aborted. An `Err` from `process` ends the batch
/// immediately.
fn run_batch<F>(
    driver: DriverKind,
    units: Vec<BuildUnit>,
    fail_fast: bool,
    mut process: F,
) -> Result<BatchReport>
where
    F: FnMut(&BuildUnit) -> Result<UnitOutcome>,
{
    let mut report = BatchReport::new(driver);
    let total = units.len();

    for (index, unit) in units.into_iter().enumerate() {
        tracing::info!("[{}/{}] {}", index + 1, total, unit.name);

        let started = Instant::now();
        let outcome = process(&unit)?;
        let failed = !outcome.is_success();

        if failed {
            tracing::warn!("{} {}: {}", unit.name, outcome.label(), outcome.detail());
        }
        report.push(UnitReport::new(unit, outcome, started.elapsed()));

        if failed && fail_fast {
            report.aborted = index + 1 < total;
            break;
        }
    }

    Ok(report)
}

/// Make `path` absolute against the current directory
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(names: &[&str]) -> Vec<BuildUnit> {
        names
            .iter()
            .map(|n| BuildUnit {
                name: n.to_string(),
                path: PathBuf::from("/p").join(n),
            })
            .collect()
    }

    fn fail_on(name: &'static str) -> impl FnMut(&BuildUnit) -> Result<UnitOutcome> {
        move |unit: &BuildUnit| {
            Ok(if unit.name == name {
                UnitOutcome::BuildFailed { exit_code: Some(1) }
            } else {
                UnitOutcome::Built { artifact: None }
            })
        }
    }

    #[test]
    fn test_run_batch_continues_after_failure() {
        let report =
            run_batch(DriverKind::Programs, units(&["a", "b", "c"]), false, fail_on("b")).unwrap();

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.failed(), 1);
        assert!(!report.aborted);
    }

    #[test]
    fn test_run_batch_fail_fast_stops() {
        let report =
            run_batch(DriverKind::Programs, units(&["a", "b", "c"]), true, fail_on("b")).unwrap();

        assert_eq!(report.attempted(), 2);
        assert!(report.aborted);
    }

    #[test]
    fn test_run_batch_fail_fast_on_last_unit_is_not_aborted() {
        let report =
            run_batch(DriverKind::Programs, units(&["a", "b"]), true, fail_on("b")).unwrap();

        assert_eq!(report.attempted(), 2);
        assert!(!report.aborted);
    }

    #[test]
    fn test_absolute_keeps_absolute_paths() {
        let path = PathBuf::from("/srv/projects");
        assert_eq!(absolute(&path).unwrap(), path);
        assert!(absolute(Path::new("projects")).unwrap().is_absolute());
    }
}
