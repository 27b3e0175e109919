use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

fn default_flat_page_size() -> usize {
    20
}

fn default_group_page_size() -> usize {
    12
}

fn default_group_step() -> usize {
    6
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_networks() -> Vec<String> {
    ["ethereum", "base", "arbitrum", "bnb"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base page size of the flat table view; the flat view advances in
    /// whole pages so the page parameter stays aligned.
    #[serde(default = "default_flat_page_size")]
    pub flat_page_size: usize,

    /// Base page size of the grouped board view.
    #[serde(default = "default_group_page_size")]
    pub group_page_size: usize,

    /// How many more groups a scroll-proximity signal reveals.
    #[serde(default = "default_group_step")]
    pub group_step: usize,

    /// Quiet period before a search edit is written to the URL.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// The selectable network universe.
    #[serde(default = "default_networks")]
    pub networks: Vec<String>,

    /// Fold the same asset on different networks into one display group.
    #[serde(default)]
    pub merge_networks_in_groups: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flat_page_size: default_flat_page_size(),
            group_page_size: default_group_page_size(),
            group_step: default_group_step(),
            search_debounce_ms: default_search_debounce_ms(),
            networks: default_networks(),
            merge_networks_in_groups: false,
        }
    }
}

impl Config {
    pub fn search_quiet_period(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Network universe as the normalized set the filter works on.
    pub fn network_universe(&self) -> BTreeSet<String> {
        self.networks
            .iter()
            .map(|network| network.trim().to_lowercase())
            .filter(|network| !network.is_empty())
            .collect()
    }
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    load_from(&path).unwrap_or_default()
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str::<Config>(&content)
        .with_context(|| format!("parse config {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("LAUNCHBOARD_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("launchboard").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("launchboard").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "launchboard", "launchboard")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str("group_page_size = 8").unwrap();
        assert_eq!(config.group_page_size, 8);
        assert_eq!(config.flat_page_size, default_flat_page_size());
        assert_eq!(config.networks, default_networks());
    }

    #[test]
    fn universe_is_normalized() {
        let config: Config = toml::from_str("networks = [\" Base \", \"ETHEREUM\", \"\"]").unwrap();
        let universe = config.network_universe();
        assert_eq!(universe.len(), 2);
        assert!(universe.contains("base"));
        assert!(universe.contains("ethereum"));
    }
}
