//! Air Bank CSV export schema.
//!
//! Column labels are a contract with the bank's export format. When the bank
//! renames a column this table is the only place that changes; bump
//! `EXPORT_SCHEMA_VERSION` with it.

use std::ops::Range;

pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// Routing code appended to every account number.
pub const BANK_CODE: &str = "3030";

/// Character range of an export file name that holds the account number,
/// e.g. `airbank_1234567890_2022-02-01_08-15.csv`.
pub const FILE_NAME_ACCOUNT_RANGE: Range<usize> = 8..18;

pub const DELIMITER: u8 = b';';
pub const QUOTE: u8 = b'"';

pub struct Columns;

impl Columns {
    pub const PAYMENT_TYPE: &'static str = "Typ platby";
    pub const EXECUTED_ON: &'static str = "Datum provedení";
    pub const AMOUNT: &'static str = "Částka v měně účtu";
    pub const CURRENCY: &'static str = "Měna účtu";
    pub const FEE: &'static str = "Poplatek v měně účtu";
    pub const PRIMARY_AMOUNT: &'static str = "Původní částka platby";
    pub const PRIMARY_CURRENCY: &'static str = "Původní měna platby";
    pub const COUNTERPARTY_LABEL: &'static str = "Název protistrany";
    pub const COUNTERPARTY_NUMBER: &'static str = "Číslo účtu protistrany";
    pub const COUNTERPARTY_NAME: &'static str = "Název účtu protistrany";
    pub const NOTE_FOR_ME: &'static str = "Poznámka pro mne";
    pub const MESSAGE_FOR_RECIPIENT: &'static str = "Zpráva pro příjemce";
    pub const MERCHANT: &'static str = "Obchodní místo";
    pub const EXCHANGE_RATE: &'static str = "Směnný kurz";
}
