//! Project compiler driver.
//!
//! Builds every directory under the projects root for a fixed target with a
//! per-project linker script, then copies `target/<triple>/<profile>/<name>`
//! into the output directory.

use super::{absolute, run_batch};
use crate::config::{BatchConfig, BuildConfig, ProjectsConfig};
use crate::domain::{BatchReport, BuildInvocation, BuildStatus, BuildUnit, DriverKind, UnitOutcome};
use crate::error::{display_chain, ArtifactError, Result};
use crate::services::{artifacts, discovery, BuildRunner};
use std::ffi::OsString;
use std::path::Path;

/// Separator cargo uses between flags in `CARGO_ENCODED_RUSTFLAGS`
const ENCODED_FLAG_SEPARATOR: &str = "\u{1f}";

/// Build the invocation for one project
///
/// The linker flag travels through `CARGO_ENCODED_RUSTFLAGS` so a project
/// path containing spaces stays a single argument. Paths are passed as OS
/// strings and are never converted lossily.
pub fn project_invocation(
    build: &BuildConfig,
    projects: &ProjectsConfig,
    target_dir: &Path,
    unit: &BuildUnit,
) -> BuildInvocation {
    let link_script = unit.file(&projects.link_script);
    let mut rustflags = OsString::from("-C");
    rustflags.push(ENCODED_FLAG_SEPARATOR);
    rustflags.push("link-arg=-T");
    rustflags.push(link_script.as_os_str());

    BuildInvocation::new(build.program.clone(), build.args.clone(), unit.path.clone())
        .with_args(["--target", projects.target.as_str()])
        .with_env("CARGO_ENCODED_RUSTFLAGS", rustflags)
        .with_env("CARGO_TARGET_DIR", target_dir)
}

/// Build and collect every project under `config.projects.root`
pub fn compile_projects<R: BuildRunner>(config: &BatchConfig, runner: &R) -> Result<BatchReport> {
    let projects = &config.projects;
    let root = absolute(&projects.root)?;
    let target_dir = absolute(&projects.target_dir)?;
    let output_dir = absolute(&projects.output_dir)?;

    let units = discovery::list_units(&root)?;
    tracing::info!("Found {} project(s) in {}", units.len(), root.display());

    run_batch(
        DriverKind::Projects,
        units,
        config.batch.fail_fast,
        |unit| {
            let invocation = project_invocation(&config.build, projects, &target_dir, unit);

            let status = match runner.run(&invocation) {
                Ok(status) => status,
                Err(e) => {
                    return Ok(UnitOutcome::Errored {
                        message: display_chain(&e),
                    })
                }
            };
            if let BuildStatus::Failed { exit_code } = status {
                return Ok(UnitOutcome::BuildFailed { exit_code });
            }

            let source = artifacts::artifact_path(
                &target_dir,
                &projects.target,
                &projects.profile,
                &unit.name,
            );
            let outcome = match artifacts::collect(&source, &output_dir, &unit.name) {
                Ok(dest) => UnitOutcome::Built {
                    artifact: Some(dest),
                },
                Err(ArtifactError::Missing(expected)) => UnitOutcome::ArtifactMissing { expected },
                Err(e) => UnitOutcome::Errored {
                    message: display_chain(&e),
                },
            };
            Ok(outcome)
        },
    )
}
