//! Waiting for the browser to drop an export into the download directory.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use airbank_ingest::ingest::is_partial_download;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::error::DriverError;

/// Remembers which files were already in `dir` so a fresh export can be told apart.
#[derive(Debug, Clone)]
pub struct DownloadWatcher {
    dir: PathBuf,
    seen: HashSet<OsString>,
}

impl DownloadWatcher {
    /// Record the current contents of `dir`, creating it if needed.
    pub fn snapshot(dir: impl AsRef<Path>) -> Result<Self, DriverError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| DriverError::Io {
            path: dir.clone(),
            source,
        })?;
        let seen = list(&dir)?.into_iter().collect();
        Ok(Self { dir, seen })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First completed `.csv` that was not there at snapshot time.
    pub fn find_new(&self) -> Result<Option<PathBuf>, DriverError> {
        let mut fresh: Vec<OsString> = list(&self.dir)?
            .into_iter()
            .filter(|name| !self.seen.contains(name))
            .filter(|name| {
                let name = name.to_string_lossy();
                name.ends_with(".csv") && !is_partial_download(&name)
            })
            .collect();
        fresh.sort();
        Ok(fresh.into_iter().next().map(|name| self.dir.join(name)))
    }

    pub async fn wait_for_new(&self, timeout: Duration, poll_interval: Duration) -> Result<PathBuf, DriverError> {
        let started = Instant::now();
        loop {
            if let Some(path) = self.find_new()? {
                info!(file = %path.display(), "export downloaded");
                return Ok(path);
            }

            let waited = started.elapsed();
            if waited >= timeout {
                return Err(DriverError::DownloadTimeout {
                    dir: self.dir.clone(),
                    waited,
                });
            }

            debug!(dir = %self.dir.display(), "waiting for export");
            sleep(poll_interval.min(timeout - waited)).await;
        }
    }
}

fn list(dir: &Path) -> Result<Vec<OsString>, DriverError> {
    let io_err = |source| DriverError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_file() {
            names.push(entry.file_name());
        }
    }
    Ok(names)
}
