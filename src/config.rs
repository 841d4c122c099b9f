use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_INVENTORY_FILE: &str = "CDInventory.json";
pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub inventory: Inventory,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            inventory: Inventory::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| "Failed to parse config TOML")?;
        if config.version != CONFIG_VERSION {
            bail!(
                "Unsupported config version {} in {}, expected {CONFIG_VERSION}",
                config.version,
                path.display()
            );
        }
        Ok(config)
    }

    /// loads the config file if given, falls back to defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Config> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Inventory {
    /// file the inventory is saved to and loaded from
    pub path: PathBuf,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_INVENTORY_FILE),
        }
    }
}
