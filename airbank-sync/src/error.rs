use std::io;
use std::path::PathBuf;
use std::time::Duration;

use airbank_ingest::LocaleError;
use thiserror::Error;

/// Errors raised while driving the portal. All of them end the run.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A UI element never reached the expected state.
    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    /// The export was triggered but no CSV landed in the download directory.
    #[error("no export appeared in {} within {waited:?}", .dir.display())]
    DownloadTimeout { dir: PathBuf, waited: Duration },

    #[error("account {account} not found after {pages} page(s) of the accounts list")]
    AccountNotFound { account: String, pages: usize },

    #[error("unreadable balance {text:?}: {source}")]
    Balance {
        text: String,
        #[source]
        source: LocaleError,
    },

    #[error("download dir {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("browser: {0}")]
    Browser(String),
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. } | DriverError::DownloadTimeout { .. })
    }
}
