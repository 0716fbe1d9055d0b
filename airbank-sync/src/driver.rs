//! Portal workflow: login, then per account select it, read its balance and
//! export its payment history as CSV.
//!
//! Every step waits for its element, lets the UI settle, then acts. Any wait
//! that runs out ends the run; nothing is retried.

use std::path::{Path, PathBuf};
use std::time::Duration;

use airbank_ingest::locale::{format_portal_date, parse_balance};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::download::DownloadWatcher;
use crate::error::DriverError;
use crate::page::{PortalPage, Target};
use crate::readiness::Readiness;
use crate::selectors;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSettings {
    pub portal_url: String,
    pub readiness: Readiness,
    pub download_timeout: Duration,
    pub download_poll: Duration,
    /// How many pages of the accounts list to walk before giving up.
    pub max_account_pages: usize,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            portal_url: selectors::PORTAL_URL.to_string(),
            readiness: Readiness::default(),
            download_timeout: Duration::from_secs(60),
            download_poll: Duration::from_millis(100),
            max_account_pages: 10,
        }
    }
}

/// Inclusive date range for the payment-history search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// What one account pass produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountReport {
    pub account: String,
    pub balance: Decimal,
    /// `None` when the period had no payments and nothing was exported.
    pub export: Option<PathBuf>,
}

pub struct PortalDriver<'a, P> {
    page: &'a P,
    settings: &'a DriverSettings,
}

impl<'a, P: PortalPage> PortalDriver<'a, P> {
    pub fn new(page: &'a P, settings: &'a DriverSettings) -> Self {
        Self { page, settings }
    }

    fn readiness(&self) -> &Readiness {
        &self.settings.readiness
    }

    async fn wait_present(&self, target: &Target) -> Result<(), DriverError> {
        self.readiness()
            .wait_until(&target.to_string(), move || self.page.is_present(target))
            .await
    }

    async fn wait_for_loader(&self) -> Result<(), DriverError> {
        info!("waiting for the loader to disappear");
        let page = self.page;
        self.readiness()
            .wait_until("loader to disappear", move || async move {
                Ok::<_, DriverError>(!page.is_visible(&selectors::LOADER).await?)
            })
            .await
    }

    async fn click_when_ready(&self, target: &Target) -> Result<(), DriverError> {
        info!(%target, "clicking");
        self.wait_present(target).await?;
        self.readiness().settle().await;
        self.page.click(target).await
    }

    #[instrument(skip_all, fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), DriverError> {
        info!(url = %self.settings.portal_url, "loading login page");
        self.page.goto(&self.settings.portal_url).await?;

        self.wait_present(&selectors::USERNAME_INPUT).await?;
        info!("logging in");
        self.page.fill(&selectors::USERNAME_INPUT, username, false).await?;
        self.wait_present(&selectors::PASSWORD_INPUT).await?;
        self.page.fill(&selectors::PASSWORD_INPUT, password, true).await?;

        self.wait_for_loader().await
    }

    /// Balance and CSV export for one account. Requires a prior `login`.
    #[instrument(skip(self, period, download_dir))]
    pub async fn collect_account(
        &self,
        account: &str,
        period: Option<&Period>,
        download_dir: &Path,
    ) -> Result<AccountReport, DriverError> {
        self.open_account(account).await?;
        let balance = self.read_balance().await?;
        info!(%balance, "read account balance");

        let export = if self.search_history(period).await? {
            Some(self.export_csv(download_dir).await?)
        } else {
            info!("no payments in the period, skipping export");
            None
        };

        Ok(AccountReport {
            account: account.to_string(),
            balance,
            export,
        })
    }

    async fn open_account(&self, account: &str) -> Result<(), DriverError> {
        self.wait_for_loader().await?;
        self.click_when_ready(&selectors::ACCOUNTS_MENU).await?;

        let tab = selectors::account_tab(account);
        let mut pages = 1;
        loop {
            self.wait_for_loader().await?;
            let (page, wanted) = (self.page, &tab);
            self.readiness()
                .wait_until("accounts list", move || async move {
                    Ok::<_, DriverError>(
                        page.is_present(wanted).await? || page.is_present(&selectors::ACCOUNTS_NEXT).await?,
                    )
                })
                .await?;

            if self.page.is_present(&tab).await? {
                break;
            }
            if pages >= self.settings.max_account_pages {
                return Err(DriverError::AccountNotFound {
                    account: account.to_string(),
                    pages,
                });
            }

            info!(page = pages, "account not on this page, paging forward");
            self.click_when_ready(&selectors::ACCOUNTS_NEXT).await?;
            pages += 1;
        }

        self.click_when_ready(&tab).await?;
        self.wait_for_loader().await
    }

    async fn read_balance(&self) -> Result<Decimal, DriverError> {
        info!("reading account balance");
        self.wait_present(&selectors::BALANCE).await?;
        let text = self.page.text(&selectors::BALANCE).await?;
        parse_balance(&text).map_err(|source| DriverError::Balance { text, source })
    }

    /// Open the detailed payment search and run it. Returns `false` when the
    /// portal reports no payments.
    async fn search_history(&self, period: Option<&Period>) -> Result<bool, DriverError> {
        self.click_when_ready(&selectors::PAYMENT_HISTORY).await?;
        self.wait_for_loader().await?;
        self.click_when_ready(&selectors::DETAILED_SEARCH).await?;
        self.wait_for_loader().await?;

        if let Some(period) = period {
            info!(from = %period.from, to = %period.to, "filling in transaction filters");
            self.wait_present(&selectors::DATE_FROM).await?;
            self.page
                .fill(&selectors::DATE_FROM, &format_portal_date(period.from), false)
                .await?;
            self.wait_present(&selectors::DATE_TO).await?;
            self.page
                .fill(&selectors::DATE_TO, &format_portal_date(period.to), false)
                .await?;
        }

        self.click_when_ready(&selectors::SEARCH).await?;
        self.wait_for_loader().await?;

        let page = self.page;
        self.readiness()
            .wait_until("payment list", move || async move {
                Ok::<_, DriverError>(
                    page.is_present(&selectors::EXPORT).await? || page.is_visible(&selectors::NO_PAYMENTS).await?,
                )
            })
            .await?;

        Ok(!self.page.is_visible(&selectors::NO_PAYMENTS).await?)
    }

    async fn export_csv(&self, download_dir: &Path) -> Result<PathBuf, DriverError> {
        let watcher = DownloadWatcher::snapshot(download_dir)?;

        self.click_when_ready(&selectors::EXPORT).await?;
        info!(dir = %watcher.dir().display(), "waiting for the file to be ready to download");
        self.click_when_ready(&selectors::EXPORT_CSV).await?;

        let path = watcher
            .wait_for_new(self.settings.download_timeout, self.settings.download_poll)
            .await?;

        if self.page.is_visible(&selectors::DIALOG_CLOSE).await? {
            self.readiness().settle().await;
            self.page.click(&selectors::DIALOG_CLOSE).await?;
        }

        Ok(path)
    }
}
