//! Configuration file management for dayplan.
//!
//! Provides a TOML-based config file at `~/.config/dayplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::warn;

use dayplan_store::DataConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DataSection {
    /// Directory holding the plan documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplaySection {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How `dayplan show` prints the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the dayplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/dayplan` or
/// `~/.config/dayplan`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("dayplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("dayplan")
}

/// Return the path to the dayplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`. Returns an error if it does
/// not exist.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Load the config file from its default location.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

/// Serialize and write the config file to `path`, creating parent dirs as
/// needed.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

/// Set one `section.key` value in the config file at `path`, preserving
/// comments and formatting of everything else. Creates the file if needed.
pub fn set_config_value(path: &Path, key: &str, value: &str) -> Result<()> {
    let (section, field, value) = match key {
        "data.dir" => ("data", "dir", value.to_owned()),
        "display.format" => {
            if OutputFormat::from_str(value, true).is_err() {
                bail!("invalid display.format {value:?} (expected text or json)");
            }
            ("display", "format", value.to_lowercase())
        }
        other => bail!("unknown config key {other:?} (expected data.dir or display.format)"),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let mut doc: toml_edit::DocumentMut = content
        .parse()
        .with_context(|| format!("failed to parse {} as TOML document", path.display()))?;

    let table = doc
        .entry(section)
        .or_insert_with(toml_edit::table)
        .as_table_mut()
        .with_context(|| format!("{} has a non-table {section:?} entry", path.display()))?;
    table.insert(field, toml_edit::value(value));

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    std::fs::write(path, doc.to_string())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct DayplanConfig {
    pub data: DataConfig,
    pub format: OutputFormat,
}

impl DayplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    ///
    /// - Data dir: `cli_data_dir` > `DAYPLAN_DATA_DIR` env > `data.dir` >
    ///   `DataConfig::DEFAULT_DIR`
    /// - Format: `--json` > `display.format` > text
    pub fn resolve(cli_data_dir: Option<&Path>, cli_json: bool) -> Result<Self> {
        Self::resolve_with(&config_path(), cli_data_dir, cli_json)
    }

    /// [`DayplanConfig::resolve`] against an explicit config file path.
    pub fn resolve_with(
        config_file: &Path,
        cli_data_dir: Option<&Path>,
        cli_json: bool,
    ) -> Result<Self> {
        let file_config = if config_file.exists() {
            match load_config_from(config_file) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "ignoring unreadable config file");
                    None
                }
            }
        } else {
            None
        };

        let data_dir = if let Some(dir) = cli_data_dir {
            dir.to_path_buf()
        } else if let Some(dir) = DataConfig::env_dir() {
            dir
        } else if let Some(dir) = file_config.as_ref().and_then(|cfg| cfg.data.dir.clone()) {
            dir
        } else {
            PathBuf::from(DataConfig::DEFAULT_DIR)
        };

        let format = if cli_json {
            OutputFormat::Json
        } else {
            file_config
                .map(|cfg| cfg.display.format)
                .unwrap_or_default()
        };

        Ok(Self {
            data: DataConfig::new(data_dir),
            format,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use dayplan_store::config::DATA_DIR_ENV;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("dayplan").join("config.toml");

        let original = ConfigFile {
            data: DataSection {
                dir: Some(PathBuf::from("/home/me/plans")),
            },
            display: DisplaySection {
                format: OutputFormat::Json,
            },
        };
        save_config_to(&path, &original).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("format = \"json\""), "{contents}");
        assert_eq!(load_config_from(&path).unwrap(), original);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: ConfigFile = toml::from_str("[data]\n").unwrap();
        assert_eq!(config.data.dir, None);
        assert_eq!(config.display.format, OutputFormat::Text);
    }

    #[test]
    fn set_value_preserves_comments() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "# my plans\n[data]\ndir = \"old\" # keep\n").unwrap();

        set_config_value(&path, "display.format", "JSON").unwrap();
        set_config_value(&path, "data.dir", "/srv/plans").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# my plans\n"), "{contents}");
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.data.dir, Some(PathBuf::from("/srv/plans")));
        assert_eq!(loaded.display.format, OutputFormat::Json);
    }

    #[test]
    fn set_value_rejects_unknown_keys_and_formats() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let err = set_config_value(&path, "data.url", "x").unwrap_err();
        assert!(err.to_string().contains("unknown config key"), "{err}");
        let err = set_config_value(&path, "display.format", "yaml").unwrap_err();
        assert!(err.to_string().contains("invalid display.format"), "{err}");
        assert!(!path.exists());
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[data]\ndir = \"from-file\"\n[display]\nformat = \"json\"\n")
            .unwrap();

        unsafe { std::env::set_var(DATA_DIR_ENV, "from-env") };
        let config = DayplanConfig::resolve_with(&path, Some(Path::new("from-cli")), false).unwrap();
        unsafe { std::env::remove_var(DATA_DIR_ENV) };

        assert_eq!(config.data.data_dir, PathBuf::from("from-cli"));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[data]\ndir = \"from-file\"\n").unwrap();

        unsafe { std::env::set_var(DATA_DIR_ENV, "from-env") };
        let config = DayplanConfig::resolve_with(&path, None, false).unwrap();
        unsafe { std::env::remove_var(DATA_DIR_ENV) };

        assert_eq!(config.data.data_dir, PathBuf::from("from-env"));

        let config = DayplanConfig::resolve_with(&path, None, true).unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from("from-file"));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        unsafe { std::env::remove_var(DATA_DIR_ENV) };
        let tmp = tempfile::TempDir::new().unwrap();

        let config = DayplanConfig::resolve_with(&tmp.path().join("absent.toml"), None, false).unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from(DataConfig::DEFAULT_DIR));
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn empty_env_var_counts_as_unset() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[data]\ndir = \"from-file\"\n").unwrap();

        unsafe { std::env::set_var(DATA_DIR_ENV, "") };
        let config = DayplanConfig::resolve_with(&path, None, false).unwrap();
        unsafe { std::env::remove_var(DATA_DIR_ENV) };

        assert_eq!(config.data.data_dir, PathBuf::from("from-file"));
    }

    #[test]
    fn unreadable_config_file_is_ignored() {
        let _lock = lock_env();
        unsafe { std::env::remove_var(DATA_DIR_ENV) };
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[data\n").unwrap();

        let config = DayplanConfig::resolve_with(&path, None, false).unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from(DataConfig::DEFAULT_DIR));
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("dayplan/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
