use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Keymap {
    pub quit: String,
    pub help: String,
    pub search: String,
    pub cycle_sort: String,
    pub cycle_category: String,
    pub clear_filters: String,
    pub cursor_up: String,
    pub cursor_down: String,
    pub next_page: String,
    pub prev_page: String,
    pub open_note: String,
    pub like: String,
    pub delete: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "h".to_string(),
            search: "/".to_string(),
            cycle_sort: "s".to_string(),
            cycle_category: "c".to_string(),
            clear_filters: "ctrl-t".to_string(),
            cursor_up: "up".to_string(),
            cursor_down: "down".to_string(),
            next_page: "n".to_string(),
            prev_page: "p".to_string(),
            open_note: "enter".to_string(),
            like: "l".to_string(),
            delete: "d".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// Sent verbatim as the `Cookie` header, e.g. `session=...`.
    pub session_cookie: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            session_cookie: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding `notes-data.json` and `categories-data.json`.
    /// When unset the listing is fetched from the server.
    pub dir: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub keymap: Keymap,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notekeep")
        .join("config.toml")
}

/// Read the config at `path`, writing the defaults there first if it does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let toml = toml::to_string(&config)?;
        fs::write(path, toml).with_context(|| format!("Failed to write default config to {}", path.display()))?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
}
