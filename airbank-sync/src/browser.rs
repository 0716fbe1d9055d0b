//! Chrome-backed `PortalPage` over the DevTools protocol.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{SetDownloadBehaviorBehavior, SetDownloadBehaviorParams};
use chromiumoxide::error::CdpError;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::DriverError;
use crate::page::{PortalPage, Target};

impl From<CdpError> for DriverError {
    fn from(e: CdpError) -> Self {
        DriverError::Browser(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Chrome/Chromium binary; searched on PATH and in common locations when unset.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    /// Needed when running as root inside containers.
    pub no_sandbox: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: true,
            no_sandbox: false,
        }
    }
}

/// A launched browser with a single page. The CDP handler runs on a tokio task.
pub struct ChromeSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: ChromePage,
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

impl ChromeSession {
    /// Launch Chrome with downloads going to `download_dir`.
    pub async fn launch(settings: &BrowserSettings, download_dir: &Path) -> Result<Self, DriverError> {
        let chrome_path = settings
            .chrome_path
            .clone()
            .or_else(find_chrome)
            .ok_or_else(|| DriverError::Browser("Chrome/Chromium not found; set browser.chrome_path".to_string()))?;

        info!(chrome = %chrome_path.display(), headless = settings.headless, "starting chrome");

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-infobars")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");
        if !settings.headless {
            builder = builder.with_head();
        }
        if settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        let config = builder.build().map_err(DriverError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move { while (handler.next().await).is_some() {} });

        let download_path = download_dir
            .canonicalize()
            .map_err(|source| DriverError::Io {
                path: download_dir.to_path_buf(),
                source,
            })?;
        let downloads = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(download_path.display().to_string())
            .build()
            .map_err(DriverError::Browser)?;
        browser.execute(downloads).await?;

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            handler_task,
            page: ChromePage { page },
        })
    }

    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    pub async fn close(mut self) -> Result<(), DriverError> {
        info!("closing chrome");
        self.browser.close().await?;
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "chrome did not exit cleanly");
        }
        Ok(())
    }
}

pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    async fn element(&self, target: &Target) -> Result<Element, DriverError> {
        let found = match target {
            Target::Css(_) => self.page.find_element(target.selector()).await,
            Target::XPath(_) => self.page.find_xpath(target.selector()).await,
        };
        found.map_err(|e| DriverError::Browser(format!("{target}: {e}")))
    }

    /// Evaluate `body` with `el` bound to the target element (or `null`).
    async fn eval_on<T: serde::de::DeserializeOwned>(&self, target: &Target, body: &str) -> Result<T, DriverError> {
        let js = format!("(function() {{ const el = {}; {body} }})()", locate_js(target));
        self.page
            .evaluate(js)
            .await?
            .into_value()
            .map_err(|e| DriverError::Browser(format!("{target}: {e}")))
    }
}

/// JS expression resolving `target` to the first matching node or `null`.
fn locate_js(target: &Target) -> String {
    // A JSON string literal is a valid JS string literal.
    let quoted = serde_json::Value::from(target.selector()).to_string();
    match target {
        Target::Css(_) => format!("document.querySelector({quoted})"),
        Target::XPath(_) => format!(
            "document.evaluate({quoted}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
        ),
    }
}

const VISIBLE_JS: &str = "if (!el) return false; \
    const st = window.getComputedStyle(el); \
    return st.display !== 'none' && st.visibility !== 'hidden' && el.getClientRects().length > 0;";

impl PortalPage for ChromePage {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn is_present(&self, target: &Target) -> Result<bool, DriverError> {
        self.eval_on(target, "return el !== null;").await
    }

    async fn is_visible(&self, target: &Target) -> Result<bool, DriverError> {
        self.eval_on(target, VISIBLE_JS).await
    }

    async fn click(&self, target: &Target) -> Result<(), DriverError> {
        self.element(target).await?.click().await?;
        Ok(())
    }

    async fn fill(&self, target: &Target, text: &str, submit: bool) -> Result<(), DriverError> {
        let el = self.element(target).await?;
        el.click().await?;
        let _: bool = self
            .eval_on(target, "if (el) { el.value = ''; } return el !== null;")
            .await?;
        el.type_str(text).await?;
        if submit {
            el.press_key("Enter").await?;
        }
        Ok(())
    }

    async fn text(&self, target: &Target) -> Result<String, DriverError> {
        Ok(self.element(target).await?.inner_text().await?.unwrap_or_default())
    }
}

const CHROME_NAMES: &[&str] = &["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"];

/// Find a Chrome/Chromium executable, on PATH first.
fn find_chrome() -> Option<PathBuf> {
    find_chrome_on(std::env::var_os("PATH"))
}

fn find_chrome_on(search_path: Option<OsString>) -> Option<PathBuf> {
    let on_path = CHROME_NAMES
        .iter()
        .find_map(|name| which::which_in(name, search_path.as_ref(), ".").ok());
    if on_path.is_some() {
        return on_path;
    }

    let candidates = [
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
    ];
    candidates
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}
