//! End-to-end runs of both drivers with `sh` standing in for the build tool.
#![cfg(unix)]

use batchbuild::domain::UnitOutcome;
use batchbuild::services::SystemRunner;
use batchbuild::{compile_programs, compile_projects, BatchConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Fake toolchain: needs the link script and the encoded linker flag, then
/// writes `built <name>` where cargo would put the binary. `$1` is the
/// target triple because `--target` lands in `$0`.
const FAKE_CARGO: &str = r#"
set -e
name=$(basename "$(pwd -P)")
test -f program_link.ld
case "$CARGO_ENCODED_RUSTFLAGS" in
  *program_link.ld) ;;
  *) exit 9 ;;
esac
out="$CARGO_TARGET_DIR/$1/release"
mkdir -p "$out"
printf 'built %s' "$name" > "$out/$name"
"#;

fn sh_config(base: &Path, script: &str) -> BatchConfig {
    let mut config = BatchConfig::default();
    config.build.program = "sh".to_string();
    config.build.args = vec!["-c".to_string(), script.to_string()];
    config.resolve_paths(base);
    config
}

fn add_project(base: &Path, name: &str, with_link_script: bool) {
    let dir = base.join("projects").join(name);
    fs::create_dir_all(&dir).unwrap();
    if with_link_script {
        fs::write(dir.join("program_link.ld"), "ENTRY(_start)").unwrap();
    }
}

#[test]
fn projects_alpha_built_beta_reported() {
    let temp = TempDir::new().unwrap();
    add_project(temp.path(), "alpha", true);
    add_project(temp.path(), "beta", false);
    let config = sh_config(temp.path(), FAKE_CARGO);

    let report = compile_projects(&config, &SystemRunner::new()).unwrap();

    assert_eq!(
        fs::read_to_string(temp.path().join("compiled_projects").join("alpha")).unwrap(),
        "built alpha"
    );
    assert!(!temp.path().join("compiled_projects").join("beta").exists());
    assert_eq!(report.attempted(), 2);
    // `test -f` fails under `set -e`, so beta never reaches the copy step
    assert_eq!(
        report.units[1].outcome,
        UnitOutcome::BuildFailed { exit_code: Some(1) }
    );
}

#[test]
fn projects_with_spaces_in_name() {
    let temp = TempDir::new().unwrap();
    add_project(temp.path(), "my project", true);
    let config = sh_config(temp.path(), FAKE_CARGO);

    let report = compile_projects(&config, &SystemRunner::new()).unwrap();

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(temp.path().join("compiled_projects").join("my project")).unwrap(),
        "built my project"
    );
}

#[test]
fn projects_zero_exit_without_artifact_is_missing() {
    let temp = TempDir::new().unwrap();
    add_project(temp.path(), "alpha", true);
    let config = sh_config(temp.path(), "exit 0");

    let report = compile_projects(&config, &SystemRunner::new()).unwrap();

    assert!(matches!(
        report.units[0].outcome,
        UnitOutcome::ArtifactMissing { .. }
    ));
}

#[test]
fn programs_build_only_manifest_directories() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("toolA")).unwrap();
    fs::write(temp.path().join("toolA").join("Cargo.toml"), "[package]").unwrap();
    fs::create_dir_all(temp.path().join("notes")).unwrap();

    let mut config = sh_config(temp.path(), "touch built.flag");
    config.programs.root = temp.path().to_path_buf();
    let mut out = Vec::new();

    let report = compile_programs(&config, &SystemRunner::new(), &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Compiling toolA\n");
    assert!(report.is_success());
    assert!(temp.path().join("toolA").join("built.flag").exists());
    assert!(!temp.path().join("notes").join("built.flag").exists());
}
