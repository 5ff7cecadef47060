use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_done_key")]
    pub done: String,
    #[serde(default = "default_skip")]
    pub skip: String,
    #[serde(default = "default_select")]
    pub select: String,
    #[serde(default = "default_back")]
    pub back: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_help")]
    pub help: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    /// Due date color once an item is past due
    #[serde(default = "default_overdue")]
    pub overdue: String,
    /// Due date color while an item is still ahead of schedule
    #[serde(default = "default_upcoming")]
    pub upcoming: String,
    #[serde(default = "default_done_color")]
    pub done: String,
    #[serde(default = "default_skipped")]
    pub skipped: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_log_level(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new: default_new(),
            delete: default_delete(),
            done: default_done_key(),
            skip: default_skip(),
            select: default_select(),
            back: default_back(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            help: default_help(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            overdue: default_overdue(),
            upcoming: default_upcoming(),
            done: default_done_color(),
            skipped: default_skipped(),
        }
    }
}

impl Theme {
    /// Preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("dark".to_string(), Theme {
            highlight_bg: "cyan".to_string(),
            highlight_fg: "black".to_string(),
            overdue: "lightred".to_string(),
            upcoming: "lightblue".to_string(),
            done: "lightblue".to_string(),
            ..Theme::default()
        });

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            skipped: "darkgray".to_string(),
            ..Theme::default()
        });

        themes
    }
}

// Default value functions
fn default_database_path() -> String {
    // Replaced with the profile's path at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("tasks.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/boring-tasks/tasks.db".to_string()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_done_key() -> String {
    "x".to_string()
}

fn default_skip() -> String {
    "s".to_string()
}

fn default_select() -> String {
    "Enter".to_string()
}

fn default_back() -> String {
    "Esc".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_overdue() -> String {
    "red".to_string()
}

fn default_upcoming() -> String {
    "blue".to_string()
}

fn default_done_color() -> String {
    "blue".to_string()
}

fn default_skipped() -> String {
    "gray".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from the profile's config file, creating it with defaults if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path, profile)
    }

    /// Load configuration from an explicit file, creating it with defaults if missing.
    /// A file without `database_path` gets the profile's database.
    pub fn load_from_path(path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let table: toml::Table = toml::from_str(&contents)?;
            let mut config: Config = toml::from_str(&contents)?;
            if !table.contains_key("database_path") {
                config.database_path = Self::default_database_path_for_profile(profile);
            }
            Ok(config)
        } else {
            let mut config = Config {
                database_path: Self::default_database_path_for_profile(profile),
                ..Config::default()
            };
            config.save_to_path(path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("tasks.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/boring-tasks-dev/tasks.db".to_string(),
                utils::Profile::Prod => "~/.local/share/boring-tasks/tasks.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// The log file sits next to the database
    pub fn get_log_path(&self) -> PathBuf {
        let db_path = self.get_database_path();
        match db_path.parent() {
            Some(dir) => dir.join("boring.log"),
            None => PathBuf::from("boring.log"),
        }
    }

    /// Get the currently active theme, falling back to the default preset
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().remove(&self.current_theme) {
            theme
        } else {
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from_path(&path, utils::Profile::Prod).unwrap();

        assert!(path.exists());
        assert_eq!(config.key_bindings.done, "x");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "database_path = \"/tmp/tasks.db\"\n[key_bindings]\nskip = \"S\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path, utils::Profile::Prod).unwrap();

        assert_eq!(config.database_path, "/tmp/tasks.db");
        assert_eq!(config.key_bindings.skip, "S");
        assert_eq!(config.key_bindings.quit, "q");
        assert_eq!(config.get_log_path(), PathBuf::from("/tmp/boring.log"));
    }

    #[test]
    fn new_dev_file_is_written_with_the_dev_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from_path(&path, utils::Profile::Dev).unwrap();

        let dev_db = Config::default_database_path_for_profile(utils::Profile::Dev);
        assert_eq!(config.database_path, dev_db);
        assert!(dev_db.contains("boring-tasks-dev"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("boring-tasks-dev"));

        let reloaded = Config::load_from_path(&path, utils::Profile::Dev).unwrap();
        assert_eq!(reloaded.database_path, dev_db);
    }

    #[test]
    fn dev_file_without_database_path_stays_on_dev_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = Config::load_from_path(&path, utils::Profile::Dev).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.database_path,
            Config::default_database_path_for_profile(utils::Profile::Dev)
        );
        assert_ne!(
            config.get_database_path(),
            utils::expand_path(&Config::default_database_path_for_profile(utils::Profile::Prod))
        );
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = [").unwrap();

        assert!(matches!(Config::load_from_path(&path, utils::Profile::Prod), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn user_theme_wins_over_preset_and_unknown_falls_back() {
        let mut config = Config::default();
        config.current_theme = "dark".to_string();
        assert_eq!(config.get_active_theme().highlight_bg, "cyan");

        config.themes.insert("dark".to_string(), Theme { overdue: "magenta".to_string(), ..Theme::default() });
        assert_eq!(config.get_active_theme().overdue, "magenta");

        config.current_theme = "nope".to_string();
        assert_eq!(config.get_active_theme(), Theme::default());
    }
}
