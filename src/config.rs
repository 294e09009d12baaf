//! Configuration management for batchbuild.
//!
//! Supports layered configuration: defaults → project → user → env

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-directory config file picked up from the working directory
pub const PROJECT_CONFIG_FILE: &str = ".batchbuild.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
    #[serde(default)]
    pub programs: ProgramsConfig,
    #[serde(default)]
    pub batch: BatchPolicy,
}

/// Where the user and environment layers are read from
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// User config file, read when it exists
    pub user_config: Option<PathBuf>,
    /// Environment variables; `None` reads the process environment
    pub env: Option<config::Map<String, String>>,
}

impl ConfigSources {
    /// Sources of a normal run: the platform config dir and the process environment
    pub fn system() -> Self {
        let user_config = directories::ProjectDirs::from("com", "batchbuild", "batchbuild")
            .map(|dirs| dirs.config_dir().join("config.toml"));
        Self {
            user_config,
            env: None,
        }
    }

    /// No user config and exactly the given variables
    pub fn with_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            user_config: None,
            env: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl BatchConfig {
    /// Load configuration with hierarchy: defaults → project → user → env
    ///
    /// `explicit` replaces the `.batchbuild.toml` lookup and must exist.
    pub fn load(working_dir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(working_dir, explicit, ConfigSources::system())
    }

    /// Load configuration with the user and environment layers supplied by `sources`
    pub fn load_from(
        working_dir: &Path,
        explicit: Option<&Path>,
        sources: ConfigSources,
    ) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder();

        // 1. Start with defaults
        builder = builder.add_source(
            config::File::from_str(
                include_str!("../default_config.toml"),
                config::FileFormat::Toml,
            )
            .required(false),
        );

        // 2. Project-specific config
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                let project_config = working_dir.join(PROJECT_CONFIG_FILE);
                if project_config.exists() {
                    builder = builder.add_source(File::from(project_config).required(false));
                }
            }
        }

        // 3. User config (~/.config/batchbuild/config.toml)
        if let Some(user_config) = sources.user_config {
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // 4. Environment variables (BATCHBUILD__*)
        builder = builder.add_source(
            Environment::with_prefix("BATCHBUILD")
                .prefix_separator("__")
                .separator("__")
                .list_separator(" ")
                .with_list_parse_key("build.args")
                .try_parsing(true)
                .source(sources.env),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject values that would make every invocation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build.program.trim().is_empty() {
            return Err(ConfigError::Invalid("build.program is empty".into()));
        }
        if self.projects.target.trim().is_empty() {
            return Err(ConfigError::Invalid("projects.target is empty".into()));
        }
        if self.projects.link_script.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("projects.link_script is empty".into()));
        }
        if self.programs.manifest.trim().is_empty() {
            return Err(ConfigError::Invalid("programs.manifest is empty".into()));
        }
        Ok(())
    }

    /// Resolve relative directories against `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.projects.root,
            &mut self.projects.output_dir,
            &mut self.projects.target_dir,
            &mut self.programs.root,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// External build tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Program to run in each unit directory
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments passed before any driver-specific flags
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

fn default_program() -> String {
    "cargo".to_string()
}

fn default_args() -> Vec<String> {
    vec!["build".to_string(), "--release".to_string()]
}

/// Project compiler driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Directory whose subdirectories are built
    #[serde(default = "default_projects_root")]
    pub root: PathBuf,
    /// Directory that receives one artifact per project
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Compilation target passed as `--target`
    #[serde(default = "default_target")]
    pub target: String,
    /// Profile directory segment under the target directory
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Shared cargo target directory
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
    /// Linker script, relative to each project directory
    #[serde(default = "default_link_script")]
    pub link_script: PathBuf,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            root: default_projects_root(),
            output_dir: default_output_dir(),
            target: default_target(),
            profile: default_profile(),
            target_dir: default_target_dir(),
            link_script: default_link_script(),
        }
    }
}

fn default_projects_root() -> PathBuf {
    PathBuf::from("projects")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("compiled_projects")
}

fn default_target() -> String {
    "x86_64-unknown-none".to_string()
}

fn default_profile() -> String {
    "release".to_string()
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("target")
}

fn default_link_script() -> PathBuf {
    PathBuf::from("program_link.ld")
}

/// Program compiler driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramsConfig {
    /// Directory whose subdirectories are candidates
    #[serde(default = "default_programs_root")]
    pub root: PathBuf,
    /// Marker file that makes a directory buildable
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            root: default_programs_root(),
            manifest: default_manifest(),
        }
    }
}

fn default_programs_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_manifest() -> String {
    "Cargo.toml".to_string()
}

/// Failure handling across a batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchPolicy {
    /// Stop at the first failed unit instead of reporting and continuing
    #[serde(default)]
    pub fail_fast: bool,
}
