//! Program compiler driver.

use super::{absolute, run_batch};
use crate::config::{BatchConfig, BuildConfig};
use crate::domain::{BatchReport, BuildInvocation, BuildStatus, BuildUnit, DriverKind, UnitOutcome};
use crate::error::{display_chain, Result};
use crate::services::{discovery, BuildRunner};
use std::io::Write;

/// Build the invocation for one program: plain build, no overrides
pub fn program_invocation(build: &BuildConfig, unit: &BuildUnit) -> BuildInvocation {
    BuildInvocation::new(build.program.clone(), build.args.clone(), unit.path.clone())
}

/// Build every directory under `config.programs.root` that has a manifest
///
/// Writes `Compiling <name>` to `out` right before each build starts.
pub fn compile_programs<R, W>(config: &BatchConfig, runner: &R, out: &mut W) -> Result<BatchReport>
where
    R: BuildRunner,
    W: Write,
{
    let programs = &config.programs;
    let root = absolute(&programs.root)?;
    let units = discovery::list_manifest_units(&root, &programs.manifest)?;
    tracing::info!("Found {} program(s) in {}", units.len(), root.display());

    run_batch(
        DriverKind::Programs,
        units,
        config.batch.fail_fast,
        |unit| {
            writeln!(out, "Compiling {}", unit.name)?;
            out.flush()?;

            let outcome = match runner.run(&program_invocation(&config.build, unit)) {
                Ok(BuildStatus::Success) => UnitOutcome::Built { artifact: None },
                Ok(BuildStatus::Failed { exit_code }) => UnitOutcome::BuildFailed { exit_code },
                Err(e) => UnitOutcome::Errored {
                    message: display_chain(&e),
                },
            };
            Ok(outcome)
        },
    )
}
