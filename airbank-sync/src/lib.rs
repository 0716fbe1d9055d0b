//! airbank-sync: drives the Air Bank portal (login, balances, CSV export) and collects the results.

pub mod browser;
pub mod download;
pub mod driver;
pub mod error;
pub mod page;
pub mod readiness;
pub mod selectors;
pub mod sync;

pub use browser::{BrowserSettings, ChromePage, ChromeSession};
pub use download::DownloadWatcher;
pub use driver::{AccountReport, DriverSettings, Period, PortalDriver};
pub use error::DriverError;
pub use page::{PortalPage, Target};
pub use readiness::Readiness;
pub use sync::{Credentials, SyncError, SyncOutput, SyncRequest, preflight, run_sync};
