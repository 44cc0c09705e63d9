//! Configuration file for the rdb2epub CLI.
//!
//! User config lives at `~/.rdb2epub/rdb2epub.toml` unless `--config` (or
//! `RDB2EPUB_CONFIG`) names another file. CLI flags override config file
//! values, which override defaults.

use anyhow::{bail, Context, Result};
use rdb2epub_core::source::DEFAULT_BASE_URL;
use rdb2epub_core::sync::DEFAULT_MARKER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "rdb2epub.toml";
const CONFIG_DIR_NAME: &str = ".rdb2epub";

/// Top-level config, deserialized from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub cover: CoverConfig,

    #[serde(default)]
    pub readability: ReadabilityConfig,
}

/// `[output]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the packages and the sync marker
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Sync marker file name
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Package language
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            marker: default_marker(),
            language: default_language(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_marker() -> String {
    DEFAULT_MARKER.into()
}
fn default_language() -> String {
    "en".into()
}

/// `[cover]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverConfig {
    /// Logo drawn on every cover; covers are skipped when it cannot be read
    #[serde(default = "default_logo")]
    pub logo: String,

    /// Title font file; empty for the bundled font
    #[serde(default)]
    pub font: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            logo: default_logo(),
            font: String::new(),
        }
    }
}

fn default_logo() -> String {
    "cover_logo.png".into()
}

/// `[readability]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadabilityConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the env var holding the access token (never store the token itself)
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// HTTP timeout, also used for image downloads
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_token_env() -> String {
    "READABILITY_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl ReadabilityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the access token from the configured env var
    pub fn token(&self) -> Result<String> {
        let var_name = &self.token_env;
        match std::env::var(var_name) {
            Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
            _ => bail!(
                "Readability access token not found. Set the {var_name} environment variable."
            ),
        }
    }
}

/// Path of the default config file (`~/.rdb2epub/rdb2epub.toml`)
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the config.
///
/// An explicitly named file must exist; a missing default file means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let path = match default_config_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "no home directory, using default config");
            return Ok(AppConfig::default());
        }
    };
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the config from a specific file
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write a default config file, creating its directory
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .context("Failed to serialize default config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("lastSync"));
        assert!(toml_str.contains("READABILITY_TOKEN"));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.output.dir, ".");
        assert_eq!(parsed.output.language, "en");
        assert_eq!(parsed.cover.logo, "cover_logo.png");
        assert_eq!(parsed.readability.timeout_secs, 30);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let toml_str = r#"
[output]
dir = "/tmp/books"

[readability]
timeout_secs = 5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.output.dir, "/tmp/books");
        assert_eq!(config.output.marker, "lastSync");
        assert_eq!(config.readability.timeout(), Duration::from_secs(5));
        assert_eq!(config.readability.base_url, DEFAULT_BASE_URL);
        assert!(config.cover.font.is_empty());
    }

    #[test]
    fn missing_token_is_reported() {
        let mut config = ReadabilityConfig::default();
        config.token_env = "RDB2EPUB_TEST_NONEXISTENT_TOKEN_12345".into();
        let err = config.token().unwrap_err();
        assert!(err.to_string().contains("RDB2EPUB_TEST_NONEXISTENT_TOKEN_12345"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rdb2epub.toml");

        init_config(&path, false).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.output.marker, "lastSync");

        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();
    }
}
