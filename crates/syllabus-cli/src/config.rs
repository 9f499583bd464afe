//! Layered CLI settings: built-in defaults < YAML config file < command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use syllabus_check::{CheckOptions, CycleReporting};
use syllabus_ingest::LoadOptions;

pub const DEFAULT_CONFIG_FILE: &str = "syllabus.yaml";
pub const DEFAULT_LESSONS_DIR: &str = "src/lessons";
pub const DEFAULT_REGISTRY_FILE: &str = "curriculum.json";

/// Contents of `syllabus.yaml`. Every key is optional.
///
/// ```yaml
/// lessons_dir: content/lessons
/// registry: content/curriculum.yaml
/// load:
///   lesson_file_name: index.md
///   exclude_dir_names: [.git, drafts]
/// check:
///   cycle_reporting: all
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub lessons_dir: Option<PathBuf>,
    pub registry: Option<PathBuf>,
    pub load: LoadOptions,
    pub check: CheckOptions,
}

impl CliConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// `explicit` must exist; otherwise `<root>/syllabus.yaml` is used when present.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }
        let implicit = root.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            tracing::debug!(path = %implicit.display(), "loading config");
            return Self::load(&implicit);
        }
        Ok(Self::default())
    }

    /// Apply flag overrides and resolve relative paths against `root`.
    pub fn resolve(self, root: &Path, overrides: &Overrides) -> Settings {
        let lessons_dir = overrides
            .lessons
            .clone()
            .or(self.lessons_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LESSONS_DIR));
        let registry = overrides
            .registry
            .clone()
            .or(self.registry)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_FILE));

        let mut load = self.load;
        if let Some(name) = &overrides.lesson_file {
            load.lesson_file_name = name.clone();
        }
        let mut check = self.check;
        if overrides.all_cycles {
            check.cycle_reporting = CycleReporting::All;
        }

        Settings {
            lessons_dir: root.join(lessons_dir),
            registry: root.join(registry),
            load,
            check,
        }
    }
}

/// Values given on the command line; `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub lessons: Option<PathBuf>,
    pub registry: Option<PathBuf>,
    pub lesson_file: Option<String>,
    pub all_cycles: bool,
}

/// Fully resolved inputs for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub lessons_dir: PathBuf,
    pub registry: PathBuf,
    pub load: LoadOptions,
    pub check: CheckOptions,
}
