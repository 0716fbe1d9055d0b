use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One exported CSV line keyed by its Czech column label.
pub type RawTransactionRow = BTreeMap<String, String>;

/// Final balance per account, keyed by the full `<number>/<bank code>` form.
pub type AccountBalances = BTreeMap<String, Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Wire,
    Card,
    Refund,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Wire => "wire",
            Modality::Card => "card",
            Modality::Refund => "refund",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output of the export parser (bank-agnostic field names)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    pub account_number: String,
    pub modality: Modality,
    /// Serialized as `YYYY-MM-DD`.
    pub payment_made_at: NaiveDate,
    /// Signed amount in the account currency; negative means money leaving the account.
    pub amount: Decimal,
    pub currency: Option<String>,
    pub fee: Decimal,
    /// Only set for cross-currency payments.
    pub primary_amount: Option<Decimal>,
    pub primary_currency: Option<String>,
    pub counterparty_account_label: Option<String>,
    pub counterparty_account_number: Option<String>,
    pub counterparty_account_name: Option<String>,
    pub comment_for_sender: Option<String>,
    pub comment_for_recipient: Option<String>,
    /// Mirrors `comment_for_recipient`.
    pub comment: Option<String>,
    pub business_description: Option<String>,
    pub exchange_rate: Option<Decimal>,
}
