//! Domain entities for batchbuild.
//!
//! This module contains the core entities:
//! - BuildUnit: One directory that is built independently
//! - BuildInvocation: How the external build tool is launched for a unit
//! - Outcome: Per-unit results and the aggregate batch report

mod invocation;
mod outcome;
mod unit;

pub use invocation::{BuildInvocation, BuildStatus};
pub use outcome::{BatchReport, DriverKind, UnitOutcome, UnitReport};
pub use unit::BuildUnit;
