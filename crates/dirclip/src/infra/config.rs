//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Layered configuration loaded from defaults, user file, explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub clipboard: Clipboard,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Defaults {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    preview_max_lines: Option<usize>,
}

impl Defaults {
    fn default_preview_max_lines() -> usize {
        400
    }

    /// Prefix used when the command line does not give one.
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    pub fn preview_max_lines(&self) -> usize {
        self.preview_max_lines
            .unwrap_or(Self::default_preview_max_lines())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Clipboard {
    #[serde(default)]
    shell_fallback: Option<bool>,
}

impl Clipboard {
    pub fn shell_fallback(&self) -> bool {
        self.shell_fallback.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Logging {
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    file: Option<String>,
}

impl Logging {
    fn default_level() -> &'static str {
        "warn"
    }

    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(Self::default_level())
    }

    /// Explicit log file, if one is configured.
    pub fn file(&self) -> Option<PathBuf> {
        self.file
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    prefix: Option<String>,
    log_level: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            prefix: env::var("DIRCLIP_PREFIX").ok(),
            log_level: env::var("DIRCLIP_LOG").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(prefix: &str, log_level: &str) -> Self {
        Self {
            prefix: Some(prefix.to_owned()),
            log_level: Some(log_level.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the user config file, an optional explicit file, and
    /// env overrides. An explicit file that cannot be read is an error; a missing user file is
    /// not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        Self::load_with_layers(global_config_path(), explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(explicit_path) = explicit {
            layers.push(Self::from_file(&explicit_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: Defaults {
                prefix: other.defaults.prefix.or(self.defaults.prefix),
                preview_max_lines: other
                    .defaults
                    .preview_max_lines
                    .or(self.defaults.preview_max_lines),
            },
            clipboard: Clipboard {
                shell_fallback: other.clipboard.shell_fallback.or(self.clipboard.shell_fallback),
            },
            logging: Logging {
                level: other.logging.level.or(self.logging.level),
                file: other.logging.file.or(self.logging.file),
            },
        }
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("dirclip/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(prefix) = env.prefix {
        config.defaults.prefix = Some(prefix);
    }
    if let Some(level) = env.log_level {
        config.logging.level = Some(level);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.defaults.prefix(), "");
        assert_eq!(config.defaults.preview_max_lines(), 400);
        assert!(config.clipboard.shell_fallback());
        assert_eq!(config.logging.level(), "warn");
        assert_eq!(config.logging.file(), None);
    }

    #[test]
    fn merge_global_and_explicit() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[defaults]
prefix = "test_"
[clipboard]
shell_fallback = false
"#,
        )?;

        let explicit = temp.path().join("project.toml");
        fs::write(
            &explicit,
            r#"
[defaults]
preview_max_lines = 50
[logging]
level = "debug"
file = "/tmp/dirclip-test.log"
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(explicit), EnvOverrides::default())?;

        assert_eq!(config.defaults.prefix(), "test_");
        assert_eq!(config.defaults.preview_max_lines(), 50);
        assert!(!config.clipboard.shell_fallback());
        assert_eq!(config.logging.level(), "debug");
        assert_eq!(
            config.logging.file(),
            Some(PathBuf::from("/tmp/dirclip-test.log"))
        );
        Ok(())
    }

    #[test]
    fn later_layer_can_restore_default_values() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[defaults]
prefix = "test_"
preview_max_lines = 50
"#,
        )?;

        let explicit = temp.path().join("project.toml");
        fs::write(
            &explicit,
            r#"
[defaults]
prefix = ""
preview_max_lines = 400
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(explicit), EnvOverrides::default())?;

        assert_eq!(config.defaults.prefix(), "");
        assert_eq!(config.defaults.preview_max_lines(), 400);
        Ok(())
    }

    #[test]
    fn missing_global_file_is_skipped_but_missing_explicit_file_fails() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let missing = temp.path().join("absent.toml");

        assert!(
            Config::load_with_layers(Some(missing.clone()), None, EnvOverrides::default())
                .is_ok()
        );
        assert!(Config::load_with_layers(None, Some(missing), EnvOverrides::default()).is_err());
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("src_", "trace");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.defaults.prefix(), "src_");
        assert_eq!(config.logging.level(), "trace");
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
