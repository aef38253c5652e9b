/*
 * SPDX-FileCopyrightText: 2024 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR WL-1.0
 */

use connector::{Error as ConnectorError, SessionRecord, SessionStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fmt, fs};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

#[derive(Clone, Debug, EnumIter, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConfigKey {
    Server,
    LogLevel,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

impl std::str::FromStr for ConfigKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::iter()
            .find(|key| format!("{}", key) == s.to_lowercase())
            .ok_or(())
    }
}

pub type Config = HashMap<ConfigKey, Option<String>>;

fn get_config_dir() -> Result<PathBuf, String> {
    let mut config_dir =
        dirs::config_dir().ok_or_else(|| "Could not find configuration directory".to_string())?;
    config_dir.push("dcibrowser");
    Ok(config_dir)
}

fn get_config_file() -> Result<PathBuf, String> {
    Ok(get_config_dir()?.join("config.toml"))
}

pub fn load_config_from(config_file: &Path) -> Result<Config, String> {
    if config_file.exists() {
        let contents = fs::read_to_string(config_file)
            .map_err(|e| format!("Failed to read configuration file: {}", e))?;
        toml::from_str(&contents).map_err(|e| format!("Failed to parse configuration file: {}", e))
    } else {
        let mut config = HashMap::new();

        for config_key in ConfigKey::iter() {
            config.insert(config_key, None);
        }

        Ok(config)
    }
}

pub fn save_config_to(config_file: &Path, config: &Config) -> Result<(), String> {
    write_file(config_file, &toml::to_string_pretty(config).map_err(|e| e.to_string())?)
}

fn write_file(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create configuration directory: {}", e))?;
    }

    let mut file = fs::File::create(path)
        .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

pub fn load_config() -> Result<Config, String> {
    load_config_from(&get_config_file()?)
}

pub fn get_value(config: &Config, key: ConfigKey) -> Option<String> {
    config
        .get(&key)
        .cloned()
        .flatten()
        .filter(|value| !value.is_empty())
}

pub fn set_get_value(
    key: ConfigKey,
    value: Option<String>,
    quiet: bool,
) -> Result<Option<String>, String> {
    let config_file = get_config_file()?;
    let mut config = load_config_from(&config_file)?;

    if let Some(value) = value {
        config.insert(key.clone(), Some(value.clone()));
        save_config_to(&config_file, &config)?;

        if !quiet {
            println!("{} set to \"{}\"", key, value);
        }

        return Ok(Some(value));
    }

    let value = get_value(&config, key);

    if !quiet {
        println!("{}", value.as_deref().unwrap_or("[unset]"));
    }

    Ok(value)
}

pub fn set_get_value_from_string(
    key: String,
    value: Option<String>,
    quiet: bool,
) -> Result<Option<String>, String> {
    match key.parse::<ConfigKey>() {
        Ok(config_key) => set_get_value(config_key, value, quiet),
        Err(()) => {
            if !quiet {
                println!("Invalid key: {}", key);
                println!("Valid keys are:");
                for config_key in ConfigKey::iter() {
                    println!("{}", config_key);
                }
            }

            Err("Invalid key".to_string())
        }
    }
}

/// Keeps the session record next to the configuration, like a browser keeps
/// it in local storage.
#[derive(Debug, Clone)]
pub struct TomlSessionStore {
    path: PathBuf,
}

impl TomlSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self, String> {
        Ok(Self::new(get_config_dir()?.join("session.toml")))
    }
}

impl SessionStore for TomlSessionStore {
    fn load(&self) -> connector::Result<Option<SessionRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| ConnectorError::Store(e.to_string()))?;
        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| ConnectorError::Store(e.to_string()))
    }

    fn save(&self, record: &SessionRecord) -> connector::Result<()> {
        let contents =
            toml::to_string_pretty(record).map_err(|e| ConnectorError::Store(e.to_string()))?;
        write_file(&self.path, &contents).map_err(ConnectorError::Store)
    }

    fn clear(&self) -> connector::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| ConnectorError::Store(e.to_string()))?;
        }

        Ok(())
    }
}
