//! Run configuration.
//!
//! Two layers live here. [`OrganizeConfig`] is the explicit settings
//! struct handed to the orchestrator at construction: roots, move/copy
//! choice, dry-run flag, optional report path. [`SettingsFile`] is the
//! optional TOML layer on top: it can replace the built-in category
//! table and declare exclusion filters for the walk.
//!
//! # Configuration File Format
//!
//! ```toml
//! fallback = "Others"
//! unknown_year = "UnknownYear"
//! date_bucketed = ["Images", "Videos"]
//!
//! [[category]]
//! name = "Images"
//! extensions = [".jpg", ".png"]
//!
//! [[category]]
//! name = "Documents"
//! extensions = [".pdf", ".txt"]
//!
//! [filters]
//! include_hidden = true
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["crdownload"]
//! regex = []
//! ```
//!
//! Category entries keep their file order, which is what gives the
//! classifier its first-match-wins behavior. With no `[[category]]`
//! entries the built-in table is used. Filters default to excluding
//! nothing: a plain run organizes every file the walker finds, hidden
//! ones included.

use crate::file_category::{CategoryRule, CategoryTable};
use crate::planner::ActionKind;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration or resolving paths.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Explicit per-run settings passed to the orchestrator.
///
/// Both roots are absolutized at construction so that the walker's
/// destination-exclusion guard and the planner compare like with like.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    /// Root of the tree to scan.
    pub source_root: PathBuf,
    /// Root of the tree files are relocated into.
    pub dest_root: PathBuf,
    /// Move or copy.
    pub kind: ActionKind,
    /// Plan everything, mutate nothing.
    pub dry_run: bool,
    /// Where to write the CSV report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl OrganizeConfig {
    /// Builds a config, absolutizing all paths against the current
    /// directory.
    pub fn new(
        source_root: &Path,
        dest_root: &Path,
        kind: ActionKind,
        dry_run: bool,
        report_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let absolutize = |p: &Path| {
            std::path::absolute(p).map_err(|e| ConfigError::IoError(e.to_string()))
        };
        Ok(Self {
            source_root: absolutize(source_root)?,
            dest_root: absolutize(dest_root)?,
            kind,
            dry_run,
            report_path: report_path.map(absolutize).transpose()?,
        })
    }
}

/// Optional TOML overrides: category table and walk filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    /// Replacement category table, in priority order. Empty means "use
    /// the built-in table".
    #[serde(default)]
    pub category: Vec<CategoryEntry>,

    /// Categories bucketed by modification year instead of extension.
    #[serde(default)]
    pub date_bucketed: Option<Vec<String>>,

    /// Category for extensions no rule claims.
    #[serde(default)]
    pub fallback: Option<String>,

    /// Subfolder label when a media file's modification time is
    /// unreadable.
    #[serde(default)]
    pub unknown_year: Option<String>,

    /// Rules for leaving files out of the run.
    #[serde(default)]
    pub filters: FilterRules,
}

/// One `[[category]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// Exclusion rules for the walk. All default to excluding nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether files starting with "." take part in the run. Defaults to
    /// true: the organizer handles everything it finds.
    #[serde(default = "default_include_hidden")]
    pub include_hidden: bool,

    /// Exact file names to exclude (e.g. ".DS_Store").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude, matched against the full path.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions (without the dot) to exclude.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns to exclude, matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

fn default_include_hidden() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            include_hidden: true,
            filenames: Vec::new(),
            patterns: Vec::new(),
            extensions: Vec::new(),
            regex: Vec::new(),
        }
    }
}

impl SettingsFile {
    /// Load settings, with fallback to defaults.
    ///
    /// Order: the explicit `config_path` if given, then `./maestro.toml`,
    /// then `~/.config/maestro/config.toml`, then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file is missing or any
    /// found file fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local = PathBuf::from("maestro.toml");
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("maestro")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the category table these settings describe.
    ///
    /// Extensions are normalized to lowercase with a leading dot, so
    /// `extensions = ["JPG", ".png"]` behaves as `[".jpg", ".png"]`.
    /// With no `[[category]]` entries the built-in rules are kept; the
    /// label keys can still be overridden independently.
    pub fn category_table(&self) -> CategoryTable {
        let categories: Vec<CategoryRule> = if self.category.is_empty() {
            CategoryTable::default().rules().to_vec()
        } else {
            self.category
                .iter()
                .map(|entry| CategoryRule {
                    name: entry.name.clone(),
                    extensions: entry
                        .extensions
                        .iter()
                        .map(|e| normalize_extension(e))
                        .collect(),
                })
                .collect()
        };

        CategoryTable::new(
            categories,
            self.date_bucketed
                .clone()
                .unwrap_or_else(|| vec!["Images".to_string(), "Videos".to_string()]),
            self.fallback.clone().unwrap_or_else(|| "Others".to_string()),
            self.unknown_year
                .clone()
                .unwrap_or_else(|| "UnknownYear".to_string()),
        )
    }

    /// Compiles the filter rules for matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern is invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Compiled, pre-validated filter structures.
pub struct CompiledFilters {
    include_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.include_hidden,
            exclude_filenames: rules.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Filters that exclude nothing.
    pub fn none() -> Self {
        Self::new(&FilterRules::default()).expect("default rules always compile")
    }

    /// Whether a walked file takes part in the run.
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if !self.include_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return false;
        }

        if self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
        {
            return false;
        }

        true
    }
}
