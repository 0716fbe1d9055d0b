//! Raw export row → `CanonicalTransaction`.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::locale::{LocaleError, parse_amount, parse_date};
use crate::modality::{UnknownModality, classify};
use crate::schema::{BANK_CODE, Columns, FILE_NAME_ACCOUNT_RANGE};
use crate::types::{CanonicalTransaction, RawTransactionRow};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("file name {0:?} does not carry an account number")]
    FileName(String),

    #[error("missing column {0:?}")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Modality(#[from] UnknownModality),

    #[error("column {column:?}: {source}")]
    Value {
        column: &'static str,
        #[source]
        source: LocaleError,
    },
}

/// Account number encoded in an export file name, with the bank code appended.
pub fn account_number_from_file_name(file_name: &str) -> Result<String, NormalizeError> {
    let digits: String = file_name
        .chars()
        .skip(FILE_NAME_ACCOUNT_RANGE.start)
        .take(FILE_NAME_ACCOUNT_RANGE.len())
        .collect();

    if digits.chars().count() != FILE_NAME_ACCOUNT_RANGE.len() {
        return Err(NormalizeError::FileName(file_name.to_string()));
    }

    Ok(format!("{digits}/{BANK_CODE}"))
}

/// Normalize one export row. `file_name` is the export's base name.
///
/// Payment type, execution date and amount are mandatory; everything else
/// degrades to `None` (or zero for the fee).
pub fn normalize(row: &RawTransactionRow, file_name: &str) -> Result<CanonicalTransaction, NormalizeError> {
    let account_number = account_number_from_file_name(file_name)?;

    let modality = classify(required(row, Columns::PAYMENT_TYPE)?)?;
    let payment_made_at = parse_date(required(row, Columns::EXECUTED_ON)?).map_err(|source| {
        NormalizeError::Value {
            column: Columns::EXECUTED_ON,
            source,
        }
    })?;
    let amount = parse_amount(required(row, Columns::AMOUNT)?).map_err(|source| NormalizeError::Value {
        column: Columns::AMOUNT,
        source,
    })?;

    let comment_for_recipient = text(row, Columns::MESSAGE_FOR_RECIPIENT);

    Ok(CanonicalTransaction {
        account_number,
        modality,
        payment_made_at,
        amount,
        currency: text(row, Columns::CURRENCY),
        fee: decimal(row, Columns::FEE).unwrap_or(Decimal::ZERO),
        primary_amount: decimal(row, Columns::PRIMARY_AMOUNT),
        primary_currency: text(row, Columns::PRIMARY_CURRENCY),
        counterparty_account_label: text(row, Columns::COUNTERPARTY_LABEL),
        counterparty_account_number: text(row, Columns::COUNTERPARTY_NUMBER),
        counterparty_account_name: text(row, Columns::COUNTERPARTY_NAME),
        comment_for_sender: text(row, Columns::NOTE_FOR_ME),
        comment: comment_for_recipient.clone(),
        comment_for_recipient,
        business_description: text(row, Columns::MERCHANT),
        exchange_rate: decimal(row, Columns::EXCHANGE_RATE),
    })
}

fn required<'a>(row: &'a RawTransactionRow, column: &'static str) -> Result<&'a str, NormalizeError> {
    row.get(column)
        .map(|s| s.as_str())
        .ok_or(NormalizeError::MissingColumn(column))
}

fn text(row: &RawTransactionRow, column: &str) -> Option<String> {
    row.get(column)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn decimal(row: &RawTransactionRow, column: &str) -> Option<Decimal> {
    row.get(column).and_then(|s| parse_amount(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Modality;
    use chrono::NaiveDate;

    const FILE: &str = "airbank_0012345678_2022-02-03_10-00.csv";

    fn row(pairs: &[(&str, &str)]) -> RawTransactionRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_row() -> RawTransactionRow {
        row(&[
            (Columns::PAYMENT_TYPE, "Platba kartou"),
            (Columns::EXECUTED_ON, "01-02-2022"),
            (Columns::AMOUNT, "-1 250,40"),
            (Columns::CURRENCY, "CZK"),
            (Columns::FEE, "-15,00"),
            (Columns::PRIMARY_AMOUNT, "-50,00"),
            (Columns::PRIMARY_CURRENCY, "EUR"),
            (Columns::COUNTERPARTY_LABEL, "Kavárna"),
            (Columns::COUNTERPARTY_NUMBER, "123456789/0800"),
            (Columns::COUNTERPARTY_NAME, "Kavárna s.r.o."),
            (Columns::NOTE_FOR_ME, "snídaně"),
            (Columns::MESSAGE_FOR_RECIPIENT, "díky"),
            (Columns::MERCHANT, "KAVARNA PRAHA"),
            (Columns::EXCHANGE_RATE, "25,008"),
        ])
    }

    #[test]
    fn test_account_number_from_file_name() {
        assert_eq!(account_number_from_file_name(FILE).unwrap(), "0012345678/3030");
        assert_eq!(
            account_number_from_file_name("short.csv"),
            Err(NormalizeError::FileName("short.csv".to_string()))
        );
    }

    #[test]
    fn test_normalize_full_row() {
        let tx = normalize(&full_row(), FILE).unwrap();
        assert_eq!(tx.account_number, "0012345678/3030");
        assert_eq!(tx.modality, Modality::Card);
        assert_eq!(tx.payment_made_at, NaiveDate::from_ymd_opt(2022, 2, 1).unwrap());
        assert_eq!(tx.amount, Decimal::new(-125040, 2));
        assert_eq!(tx.currency.as_deref(), Some("CZK"));
        assert_eq!(tx.fee, Decimal::new(-1500, 2));
        assert_eq!(tx.primary_amount, Some(Decimal::new(-5000, 2)));
        assert_eq!(tx.primary_currency.as_deref(), Some("EUR"));
        assert_eq!(tx.counterparty_account_label.as_deref(), Some("Kavárna"));
        assert_eq!(tx.counterparty_account_number.as_deref(), Some("123456789/0800"));
        assert_eq!(tx.counterparty_account_name.as_deref(), Some("Kavárna s.r.o."));
        assert_eq!(tx.comment_for_sender.as_deref(), Some("snídaně"));
        assert_eq!(tx.comment_for_recipient.as_deref(), Some("díky"));
        assert_eq!(tx.comment, tx.comment_for_recipient);
        assert_eq!(tx.business_description.as_deref(), Some("KAVARNA PRAHA"));
        assert_eq!(tx.exchange_rate, Some(Decimal::new(25008, 3)));
    }

    #[test]
    fn test_optional_fields_degrade() {
        let r = row(&[
            (Columns::PAYMENT_TYPE, "Příchozí platba"),
            (Columns::EXECUTED_ON, "15-12-2021"),
            (Columns::AMOUNT, "0,00"),
            (Columns::FEE, ""),
            (Columns::PRIMARY_AMOUNT, "n/a"),
            (Columns::MESSAGE_FOR_RECIPIENT, "   "),
        ]);
        let tx = normalize(&r, FILE).unwrap();
        assert_eq!(tx.modality, Modality::Wire);
        assert_eq!(tx.amount, Decimal::ZERO);
        assert_eq!(tx.fee, Decimal::ZERO);
        assert_eq!(tx.primary_amount, None);
        assert_eq!(tx.currency, None);
        assert_eq!(tx.comment_for_recipient, None);
        assert_eq!(tx.comment, None);
        assert_eq!(tx.exchange_rate, None);
    }

    #[test]
    fn test_zero_optional_amounts_are_kept() {
        let mut r = full_row();
        r.insert(Columns::PRIMARY_AMOUNT.to_string(), "0,00".to_string());
        r.insert(Columns::EXCHANGE_RATE.to_string(), "0".to_string());
        let tx = normalize(&r, FILE).unwrap();
        assert_eq!(tx.primary_amount, Some(Decimal::ZERO));
        assert_eq!(tx.exchange_rate, Some(Decimal::ZERO));
    }

    #[test]
    fn test_mandatory_fields_are_fatal() {
        let mut r = full_row();
        r.insert(Columns::PAYMENT_TYPE.to_string(), "Unknown Type".to_string());
        assert_eq!(
            normalize(&r, FILE),
            Err(NormalizeError::Modality(UnknownModality("Unknown Type".to_string())))
        );

        let mut r = full_row();
        r.insert(Columns::EXECUTED_ON.to_string(), "2022-02-01".to_string());
        assert!(matches!(
            normalize(&r, FILE),
            Err(NormalizeError::Value { column: Columns::EXECUTED_ON, .. })
        ));

        let mut r = full_row();
        r.insert(Columns::AMOUNT.to_string(), String::new());
        assert!(matches!(
            normalize(&r, FILE),
            Err(NormalizeError::Value { column: Columns::AMOUNT, source: LocaleError::Empty })
        ));

        let mut r = full_row();
        r.remove(Columns::AMOUNT);
        assert_eq!(normalize(&r, FILE), Err(NormalizeError::MissingColumn(Columns::AMOUNT)));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let r = full_row();
        let a = normalize(&r, FILE).unwrap();
        let b = normalize(&r, FILE).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_serialized_shape() {
        let tx = normalize(&full_row(), FILE).unwrap();
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["modality"], "card");
        assert_eq!(v["payment_made_at"], "2022-02-01");
        assert_eq!(v["amount"].as_f64(), Some(-1250.40));
        assert_eq!(v["comment"], "díky");
    }
}
