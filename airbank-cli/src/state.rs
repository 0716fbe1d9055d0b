use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$AIRBANK_HOME`, else `~/.airbank`.
pub fn airbank_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("AIRBANK_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".airbank"))
}

pub fn ensure_airbank_home() -> Result<PathBuf> {
    let dir = airbank_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Read a required environment variable, naming it in the error.
pub fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => anyhow::bail!("Environment variable {name} not found"),
    }
}
