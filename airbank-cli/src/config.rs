use anyhow::{Context, Result};
use airbank_sync::{BrowserSettings, DriverSettings, Readiness};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::ensure_airbank_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalSection,
    pub browser: BrowserSettings,
    pub sync: SyncSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSection {
    pub url: String,
    /// Longest wait for any single element, in milliseconds.
    pub wait_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Delay between an element appearing and clicking it.
    pub settle_ms: u64,
    pub download_timeout_ms: u64,
    pub download_poll_ms: u64,
    pub max_account_pages: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSection {
    /// Accounts used when `--account` is not given.
    pub accounts: Vec<String>,
    /// Where exports are downloaded; a temporary directory when unset.
    pub download_dir: Option<PathBuf>,
}

impl Default for PortalSection {
    fn default() -> Self {
        let d = DriverSettings::default();
        Self {
            url: d.portal_url,
            wait_timeout_ms: d.readiness.timeout.as_millis() as u64,
            poll_interval_ms: d.readiness.poll_interval.as_millis() as u64,
            settle_ms: d.readiness.settle.as_millis() as u64,
            download_timeout_ms: d.download_timeout.as_millis() as u64,
            download_poll_ms: d.download_poll.as_millis() as u64,
            max_account_pages: d.max_account_pages,
        }
    }
}

impl PortalSection {
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            portal_url: self.url.clone(),
            readiness: Readiness {
                timeout: Duration::from_millis(self.wait_timeout_ms),
                poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
                settle: Duration::from_millis(self.settle_ms),
            },
            download_timeout: Duration::from_millis(self.download_timeout_ms),
            download_poll: Duration::from_millis(self.download_poll_ms.max(1)),
            max_account_pages: self.max_account_pages.max(1),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_airbank_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
