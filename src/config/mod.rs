//! Configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults rooted at `~/.config/pal/`
//! 2. TOML file (`~/.config/pal/config.toml` or an explicit path)
//! 3. `PAL_*` environment variables
//!
//! ```toml
//! bundled_dir = "/usr/share/pal/bundled"
//! overrides_dir = "~/.config/pal/prompts"
//! custom_dir = "~/.config/pal/custom"
//! content_consuming = ["notes add", "prompt"]
//!
//! [logging]
//! format = "json"
//! level = "debug"
//! file = "/tmp/pal.log"
//!
//! [notes]
//! enabled = true
//! tag_provider = "follow-up"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::parser::DEFAULT_CONTENT_CONSUMING;
use crate::{Error, Result};

/// Application directory name under the user config directory.
const APP_DIR: &str = "pal";

/// Environment variable overriding the bundled directory.
pub const ENV_BUNDLED_DIR: &str = "PAL_BUNDLED_DIR";
/// Environment variable overriding the overrides directory.
pub const ENV_OVERRIDES_DIR: &str = "PAL_OVERRIDES_DIR";
/// Environment variable overriding the custom directory.
pub const ENV_CUSTOM_DIR: &str = "PAL_CUSTOM_DIR";
/// Environment variable selecting the log format (`pretty` or `json`).
pub const ENV_LOG_FORMAT: &str = "PAL_LOG_FORMAT";
/// Environment variable naming a log file.
pub const ENV_LOG_FILE: &str = "PAL_LOG_FILE";
/// Environment variable enabling the notes command.
pub const ENV_NOTES_ENABLED: &str = "PAL_NOTES_ENABLED";
/// Environment variable selecting the notes tag provider.
pub const ENV_NOTES_TAG_PROVIDER: &str = "PAL_NOTES_TAG_PROVIDER";

/// Main configuration for pal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalConfig {
    /// Root of the read-only bundled tier.
    pub bundled_dir: PathBuf,
    /// Root of the override tier.
    pub overrides_dir: PathBuf,
    /// Root of the custom tier.
    pub custom_dir: PathBuf,
    /// Command prefixes whose input is never split into a pipeline.
    pub content_consuming: Vec<String>,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Notes command settings.
    pub notes: NotesSettings,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` (default) or `json`.
    pub format: Option<String>,
    /// Filter directive used when `PAL_LOG`/`RUST_LOG` are unset and
    /// `--verbose` is off.
    pub level: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Notes command settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesSettings {
    /// Whether the native notes handler is enabled.
    pub enabled: bool,
    /// How tags are generated for new notes.
    pub tag_provider: TagProvider,
}

/// Tag generation strategy for new notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagProvider {
    /// Keyword extraction only.
    #[default]
    None,
    /// Keywords plus an instruction asking the model to refine the tags.
    FollowUp,
    /// Ask a connected tag suggester, falling back to keywords.
    Sampling,
}

impl TagProvider {
    /// Parses a provider name. Unknown names fall back to `None`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "follow-up" | "follow_up" | "followup" | "pal-follow-up" => Self::FollowUp,
            "sampling" | "mcp-sampling" => Self::Sampling,
            _ => Self::None,
        }
    }

    /// Returns the provider name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FollowUp => "follow-up",
            Self::Sampling => "sampling",
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Bundled directory.
    pub bundled_dir: Option<String>,
    /// Overrides directory.
    pub overrides_dir: Option<String>,
    /// Custom directory.
    pub custom_dir: Option<String>,
    /// Content-consuming command prefixes.
    pub content_consuming: Option<Vec<String>>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
    /// Notes section.
    pub notes: Option<ConfigFileNotes>,
}

/// Notes section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileNotes {
    /// Whether notes are enabled.
    pub enabled: Option<bool>,
    /// Tag provider name.
    pub tag_provider: Option<String>,
}

impl Default for PalConfig {
    fn default() -> Self {
        let base = default_config_dir().unwrap_or_else(|| PathBuf::from(".pal"));
        Self {
            bundled_dir: base.join("bundled"),
            overrides_dir: base.join("prompts"),
            custom_dir: base.join("custom"),
            content_consuming: DEFAULT_CONTENT_CONSUMING
                .iter()
                .map(ToString::to_string)
                .collect(),
            logging: LoggingSettings::default(),
            notes: NotesSettings::default(),
        }
    }
}

impl PalConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from `~/.config/pal/config.toml`.
    ///
    /// Returns default configuration if no readable config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(path) = default_config_dir().map(|d| d.join("config.toml")) else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                Self::default()
            },
        }
    }

    /// Converts a `ConfigFile` to `PalConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(dir) = file.bundled_dir {
            config.bundled_dir = expand_home(&dir);
        }
        if let Some(dir) = file.overrides_dir {
            config.overrides_dir = expand_home(&dir);
        }
        if let Some(dir) = file.custom_dir {
            config.custom_dir = expand_home(&dir);
        }
        if let Some(prefixes) = file.content_consuming {
            config.content_consuming = prefixes;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }
        if let Some(notes) = file.notes {
            if let Some(enabled) = notes.enabled {
                config.notes.enabled = enabled;
            }
            if let Some(provider) = notes.tag_provider {
                config.notes.tag_provider = TagProvider::parse(&provider);
            }
        }

        config
    }

    /// Applies `PAL_*` overrides using `lookup` to read variables.
    #[must_use]
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = lookup(ENV_BUNDLED_DIR) {
            self.bundled_dir = expand_home(&dir);
        }
        if let Some(dir) = lookup(ENV_OVERRIDES_DIR) {
            self.overrides_dir = expand_home(&dir);
        }
        if let Some(dir) = lookup(ENV_CUSTOM_DIR) {
            self.custom_dir = expand_home(&dir);
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = Some(format);
        }
        if let Some(file) = lookup(ENV_LOG_FILE) {
            self.logging.file = Some(expand_home(&file));
        }
        if let Some(enabled) = lookup(ENV_NOTES_ENABLED) {
            self.notes.enabled = parse_bool(&enabled);
        }
        if let Some(provider) = lookup(ENV_NOTES_TAG_PROVIDER) {
            self.notes.tag_provider = TagProvider::parse(&provider);
        }

        self
    }

    /// Sets the bundled directory.
    #[must_use]
    pub fn with_bundled_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundled_dir = path.into();
        self
    }

    /// Sets the overrides directory.
    #[must_use]
    pub fn with_overrides_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.overrides_dir = path.into();
        self
    }

    /// Sets the custom directory.
    #[must_use]
    pub fn with_custom_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.custom_dir = path.into();
        self
    }

    /// Sets the content-consuming command prefixes.
    #[must_use]
    pub fn with_content_consuming<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_consuming = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the notes settings.
    #[must_use]
    pub const fn with_notes(mut self, notes: NotesSettings) -> Self {
        self.notes = notes;
        self
    }
}

/// Returns `~/.config/pal`.
fn default_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join(APP_DIR))
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => directories::BaseDirs::new()
            .map_or_else(|| PathBuf::from(path), |d| d.home_dir().join(rest)),
        None => PathBuf::from(path),
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = PalConfig::default();
        assert_eq!(config.content_consuming, vec!["notes add", "prompt"]);
        assert!(config.custom_dir.ends_with("custom"));
        assert!(!config.notes.enabled);
        assert_eq!(config.notes.tag_provider, TagProvider::None);
    }

    #[test]
    fn test_from_toml() {
        let config = PalConfig::from_toml(
            r#"
            custom_dir = "/tmp/pal/custom"
            content_consuming = ["tr"]

            [logging]
            format = "json"

            [notes]
            enabled = true
            tag_provider = "sampling"
            "#,
        )
        .unwrap();

        assert_eq!(config.custom_dir, PathBuf::from("/tmp/pal/custom"));
        assert_eq!(config.content_consuming, vec!["tr"]);
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert!(config.notes.enabled);
        assert_eq!(config.notes.tag_provider, TagProvider::Sampling);
        assert_eq!(config.bundled_dir, PalConfig::default().bundled_dir);
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = PalConfig::from_toml("custom_dir = [").unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [
            (ENV_CUSTOM_DIR, "/env/custom"),
            (ENV_NOTES_ENABLED, "yes"),
            (ENV_NOTES_TAG_PROVIDER, "follow-up"),
            (ENV_LOG_FORMAT, ""),
        ]
        .into_iter()
        .collect();

        let config = PalConfig::from_toml("custom_dir = \"/file/custom\"")
            .unwrap()
            .with_env_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.custom_dir, PathBuf::from("/env/custom"));
        assert!(config.notes.enabled);
        assert_eq!(config.notes.tag_provider, TagProvider::FollowUp);
        assert_eq!(config.logging.format, None);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = PalConfig::load_from_file(Path::new("/nonexistent/pal.toml")).unwrap_err();
        assert!(err.to_string().contains("read_config_file"));
    }

    #[test]
    fn test_tag_provider_parse() {
        assert_eq!(TagProvider::parse("mcp-sampling"), TagProvider::Sampling);
        assert_eq!(TagProvider::parse("pal-follow-up"), TagProvider::FollowUp);
        assert_eq!(TagProvider::parse("ollama"), TagProvider::None);
    }
}
