//! One sync run: log in, visit every requested account, then ingest what this run downloaded.

use std::fmt;
use std::path::Path;

use airbank_ingest::schema::BANK_CODE;
use airbank_ingest::{AccountBalances, CanonicalTransaction, IngestError, ingest_files};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::driver::{DriverSettings, Period, PortalDriver};
use crate::error::DriverError;
use crate::page::PortalPage;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub credentials: Credentials,
    /// Bare account numbers as shown in the portal, without the bank code.
    pub accounts: Vec<String>,
    pub period: Option<Period>,
}

/// Result of a run, handed to the output sink as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOutput {
    pub tx: Vec<CanonicalTransaction>,
    pub balances: AccountBalances,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("missing {0}")]
    MissingPrecondition(&'static str),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Checks that must pass before the browser is touched.
pub fn preflight(request: &SyncRequest) -> Result<(), SyncError> {
    if request.credentials.username.trim().is_empty() {
        return Err(SyncError::MissingPrecondition("username"));
    }
    if request.credentials.password.is_empty() {
        return Err(SyncError::MissingPrecondition("password"));
    }
    if request.accounts.iter().all(|a| a.trim().is_empty()) {
        return Err(SyncError::MissingPrecondition("account numbers"));
    }
    Ok(())
}

/// Run the whole workflow on `page`, exporting into `download_dir`.
///
/// Any failure aborts the run and nothing is returned.
pub async fn run_sync<P: PortalPage>(
    page: &P,
    request: &SyncRequest,
    download_dir: &Path,
    settings: &DriverSettings,
) -> Result<SyncOutput, SyncError> {
    preflight(request)?;

    let driver = PortalDriver::new(page, settings);
    driver
        .login(&request.credentials.username, &request.credentials.password)
        .await?;

    let mut balances = AccountBalances::new();
    let mut exports = Vec::new();
    for account in request.accounts.iter().map(|a| a.trim()).filter(|a| !a.is_empty()) {
        let report = driver
            .collect_account(account, request.period.as_ref(), download_dir)
            .await?;
        balances.insert(format!("{account}/{BANK_CODE}"), report.balance);
        exports.extend(report.export);
    }

    // Only this run's downloads; older files in a reused directory are left alone.
    let tx = ingest_files(&exports)?;
    info!(transactions = tx.len(), exports = exports.len(), accounts = balances.len(), "sync finished");

    Ok(SyncOutput { tx, balances })
}
