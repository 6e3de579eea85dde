use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, ENV_PREFIX, HTTP_REQUEST_TIMEOUT_SECS, LOCAL_CONFIG_PATH, UI_TICK_RATE_MS,
};
use crate::directory::PageSize;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the staff sheet comes from
    #[serde(default)]
    pub source: SourceConfig,

    /// "Tambah Guru" form
    #[serde(default)]
    pub form: FormConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Data source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Published CSV URL of the staff sheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_url: Option<String>,
    /// Local CSV file; takes precedence over `csv_url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
    /// Request timeout in seconds, 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    HTTP_REQUEST_TIMEOUT_SECS
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            csv_url: None,
            csv_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// External form shown read-only in the "Tambah Guru" tab
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows per page when the table opens
    #[serde(default)]
    pub default_page_size: PageSize,
    /// Event poll interval in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate_ms() -> u64 {
    UI_TICK_RATE_MS
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_page_size: PageSize::default(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Point at a different sheet; a URL or a file replaces whatever was configured
    pub fn override_source(&mut self, url: Option<String>, path: Option<PathBuf>) {
        if let Some(url) = url {
            self.source.csv_url = Some(url);
            self.source.csv_path = None;
        }
        if let Some(path) = path {
            self.source.csv_path = Some(path);
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(LOCAL_CONFIG_PATH);

    // Build figment configuration
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }
    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    // DATAGURU_SOURCE__CSV_URL -> source.csv_url
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract().context("Failed to load configuration")
}

/// Load configuration from one explicit TOML file on top of the defaults
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

fn home_fallback(parts: &[&str]) -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(parts
        .iter()
        .fold(PathBuf::from(home), |path, part| path.join(part)))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = match project_dirs() {
        Some(dirs) => dirs.config_dir().to_path_buf(),
        None => home_fallback(&[".config", APP_NAME])?,
    };
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}

/// Get the data directory (log file lives here)
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = match project_dirs() {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => home_fallback(&[".local", "share", APP_NAME])?,
    };
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<()> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        println!("Created default configuration at: {}", config_file.display());
    }

    let local_example = PathBuf::from(LOCAL_CONFIG_PATH).with_extension("toml.example");
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# dataguru project configuration
# Copy to .dataguru/config.toml to override the global settings

[source]
# Published CSV link of the staff sheet (File > Share > Publish to web > CSV)
csv_url = "https://docs.google.com/spreadsheets/d/e/<sheet-id>/pub?output=csv"
# Or a local export; wins over csv_url
# csv_path = "guru.csv"
timeout_secs = 30

[form]
url = "https://docs.google.com/forms/d/e/<form-id>/viewform"

[ui]
default_page_size = 10
"#;
        std::fs::write(&local_example, example_config)?;
        println!("Created example configuration at: {}", local_example.display());
    }

    Ok(())
}
