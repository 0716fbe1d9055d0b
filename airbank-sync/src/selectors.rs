//! Portal UI contract: URL, selectors and Czech labels of ib.airbank.cz.
//!
//! The portal is not ours and changes without notice; everything the driver
//! matches against lives here. Bump `PORTAL_SCHEMA_VERSION` when it changes.

use std::borrow::Cow;

use crate::page::{Target, xpath_literal};

pub const PORTAL_SCHEMA_VERSION: u32 = 1;

pub const PORTAL_URL: &str = "https://ib.airbank.cz/";

/// Full-page loading overlay.
pub const LOADER: Target = Target::css(".cmpLoaderOver");

pub const USERNAME_INPUT: Target = Target::css(r#"input[type="text"]"#);
pub const PASSWORD_INPUT: Target = Target::css(r#"input[type="password"]"#);

/// "Accounts and cards" menu entry.
pub const ACCOUNTS_MENU: Target = Target::xpath(r#"//span[text()="Účty a karty"]"#);
/// Pager of the accounts list.
pub const ACCOUNTS_NEXT: Target = Target::xpath(r#"//a[span[text()="Další"]]"#);

pub const BALANCE: Target = Target::css(".numberPrimary");

pub const PAYMENT_HISTORY: Target = Target::xpath(r#"//a[./span[text()="Historie plateb"]]"#);
pub const DETAILED_SEARCH: Target = Target::xpath(r#"//a[span[text()="Podrobné vyhledávání"]]"#);
pub const DATE_FROM: Target =
    Target::css(r#"[name="stateOrForm:formContent:dateFrom:componentWrapper:component"]"#);
pub const DATE_TO: Target =
    Target::css(r#"[name="stateOrForm:formContent:dateTo:componentWrapper:component"]"#);
pub const SEARCH: Target = Target::xpath(r#"//a[span[text()="Hledat"]]"#);

/// Shown instead of the payment list when the period has no payments.
pub const NO_PAYMENTS: Target = Target::xpath(r#"//*[text()="Žádné platby"]"#);

pub const EXPORT: Target = Target::xpath(r#"//span[text()="Exportovat"]"#);
pub const EXPORT_CSV: Target = Target::xpath(r#"//a[contains(@href, "ExportCsv")]"#);
pub const DIALOG_CLOSE: Target = Target::xpath(r#"//a[span[text()="Zavřít"]]"#);

/// Tab of one account in the accounts list, matched by its number.
pub fn account_tab(account: &str) -> Target {
    Target::XPath(Cow::Owned(format!("//*[text()={}]", xpath_literal(account))))
}
