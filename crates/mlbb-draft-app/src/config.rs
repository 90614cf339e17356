// Configuration loading and parsing (config/draft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    draft: DraftConfig,
    data: DataPaths,
    database: DatabaseSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DraftConfig {
    /// The organisation whose picks must credit a roster player.
    pub home_team: String,
    /// Per-turn timer length. Informational; nothing in the engine enforces it.
    #[serde(default = "default_turn_seconds")]
    pub turn_seconds: u32,
}

fn default_turn_seconds() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataPaths {
    pub heroes: String,
    pub rosters: String,
    #[serde(default = "default_catalog_ttl")]
    pub catalog_ttl_secs: u64,
}

fn default_catalog_ttl() -> u64 {
    3600
}

impl DataPaths {
    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftConfig,
    pub data_paths: DataPaths,
    pub db_path: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/draft.toml` relative to `base_dir`. Does not
/// copy defaults; `load_config()` does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("draft.toml");
    let text = read_file(&path)?;
    let file: DraftFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        draft: file.draft,
        data_paths: file.data,
        db_path: file.database.path,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/` with any `*.toml` from `defaults/` it does not have yet.
/// Files already in `config/` are left alone. Returns the files written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let copy_err = |message: String| ConfigError::DefaultsCopyError { message };

    if !defaults_dir.is_dir() {
        return if config_dir.is_dir() {
            Ok(vec![])
        } else {
            Err(copy_err(format!(
                "no defaults/ or config/ directory in {}",
                base_dir.display()
            )))
        };
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_err(format!("cannot create {}: {e}", config_dir.display())))?;
    let entries = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_err(format!("cannot read {}: {e}", defaults_dir.display())))?;

    let mut copied = Vec::new();
    for entry in entries {
        let source = entry.map_err(|e| copy_err(e.to_string()))?.path();
        if source.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        if let Some(target) = copy_if_missing(&source, &config_dir).map_err(copy_err)? {
            copied.push(target);
        }
    }
    copied.sort();
    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Copy `source` into `dir` unless a file of that name is already there.
fn copy_if_missing(source: &Path, dir: &Path) -> Result<Option<PathBuf>, String> {
    let Some(name) = source.file_name() else {
        return Ok(None);
    };
    let target = dir.join(name);
    if target.exists() {
        return Ok(None);
    }
    std::fs::copy(source, &target)
        .map_err(|e| format!("cannot copy {} to {}: {e}", source.display(), target.display()))?;
    Ok(Some(target))
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draft.home_team.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "draft.home_team".into(),
            message: "must not be empty".into(),
        });
    }

    if config.draft.turn_seconds == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.turn_seconds".into(),
            message: "must be greater than 0".into(),
        });
    }

    let paths: &[(&str, &str)] = &[
        ("data.heroes", &config.data_paths.heroes),
        ("data.rosters", &config.data_paths.rosters),
        ("database.path", &config.db_path),
    ];
    for (name, val) in paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
