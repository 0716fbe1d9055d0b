//! The slice of a browser page the portal workflow needs.

use std::borrow::Cow;
use std::fmt;

use crate::error::DriverError;

/// How to locate an element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Css(Cow<'static, str>),
    XPath(Cow<'static, str>),
}

impl Target {
    pub const fn css(selector: &'static str) -> Self {
        Target::Css(Cow::Borrowed(selector))
    }

    pub const fn xpath(path: &'static str) -> Self {
        Target::XPath(Cow::Borrowed(path))
    }

    pub fn selector(&self) -> &str {
        match self {
            Target::Css(s) | Target::XPath(s) => s,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Css(s) => write!(f, "css `{s}`"),
            Target::XPath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// Quote `s` as an XPath string literal.
pub fn xpath_literal(s: &str) -> String {
    if !s.contains('"') {
        format!("\"{s}\"")
    } else if !s.contains('\'') {
        format!("'{s}'")
    } else {
        let parts: Vec<String> = s.split('"').map(|p| format!("\"{p}\"")).collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}

/// A single browser tab. Calls are issued strictly one at a time.
#[allow(async_fn_in_trait)]
pub trait PortalPage {
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// Element exists in the DOM.
    async fn is_present(&self, target: &Target) -> Result<bool, DriverError>;

    /// Element exists and is rendered (not `display: none` / `visibility: hidden`).
    async fn is_visible(&self, target: &Target) -> Result<bool, DriverError>;

    async fn click(&self, target: &Target) -> Result<(), DriverError>;

    /// Replace the field's value with `text`; `submit` presses Enter afterwards.
    async fn fill(&self, target: &Target, text: &str, submit: bool) -> Result<(), DriverError>;

    async fn text(&self, target: &Target) -> Result<String, DriverError>;
}
