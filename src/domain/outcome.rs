//! Per-unit outcomes and the aggregate batch report.

use super::BuildUnit;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Which driver produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Projects,
    Programs,
}

impl std::fmt::Display for DriverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Projects => write!(f, "projects"),
            Self::Programs => write!(f, "programs"),
        }
    }
}

/// Result of processing one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    /// Build succeeded; `artifact` is the collected copy, if the driver collects one
    Built { artifact: Option<PathBuf> },
    /// Build tool exited unsuccessfully
    BuildFailed { exit_code: Option<i32> },
    /// Build reported success but the expected artifact was absent
    ArtifactMissing { expected: PathBuf },
    /// Spawn or copy failed
    Errored { message: String },
}

impl UnitOutcome {
    /// Check if the unit succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Built { .. })
    }

    /// Short status label for the text summary
    pub fn label(&self) -> &'static str {
        match self {
            Self::Built { .. } => "ok",
            Self::BuildFailed { .. } => "FAILED",
            Self::ArtifactMissing { .. } => "MISSING",
            Self::Errored { .. } => "ERROR",
        }
    }

    /// Human-readable detail for the text summary
    pub fn detail(&self) -> String {
        match self {
            Self::Built {
                artifact: Some(path),
            } => format!("-> {}", path.display()),
            Self::Built { artifact: None } => String::new(),
            Self::BuildFailed {
                exit_code: Some(code),
            } => format!("build exited with status {}", code),
            Self::BuildFailed { exit_code: None } => "build terminated by signal".to_string(),
            Self::ArtifactMissing { expected } => {
                format!("expected artifact {}", expected.display())
            }
            Self::Errored { message } => message.clone(),
        }
    }
}

/// Outcome of one unit together with timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitReport {
    pub unit: BuildUnit,
    #[serde(flatten)]
    pub outcome: UnitOutcome,
    /// Wall time spent on the unit, in milliseconds
    pub elapsed_ms: u64,
}

impl UnitReport {
    /// Create a report for a finished unit
    pub fn new(unit: BuildUnit, outcome: UnitOutcome, elapsed: Duration) -> Self {
        Self {
            unit,
            outcome,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Aggregate result of one driver run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub driver: DriverKind,
    pub units: Vec<UnitReport>,
    /// Set when fail-fast stopped the run before every unit was attempted
    pub aborted: bool,
}

impl BatchReport {
    /// Create an empty report
    pub fn new(driver: DriverKind) -> Self {
        Self {
            driver,
            units: Vec::new(),
            aborted: false,
        }
    }

    /// Record a finished unit
    pub fn push(&mut self, report: UnitReport) {
        self.units.push(report);
    }

    /// Number of units attempted
    pub fn attempted(&self) -> usize {
        self.units.len()
    }

    /// Number of units that succeeded
    pub fn succeeded(&self) -> usize {
        self.units.iter().filter(|u| u.outcome.is_success()).count()
    }

    /// Number of units that failed in any way
    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Check if every attempted unit succeeded
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Units that failed, in processing order
    pub fn failures(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| !u.outcome.is_success())
    }
}
