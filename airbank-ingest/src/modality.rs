//! Payment-type label → modality mapping.
//!
//! The table is closed: an unknown label means the bank changed its export
//! vocabulary and the caller must stop rather than guess.

use thiserror::Error;

use crate::types::Modality;

/// Every payment-type label the export is known to produce.
pub const MODALITY_LABELS: &[(&str, Modality)] = &[
    ("Odchozí platba", Modality::Wire),
    ("Příchozí platba", Modality::Wire),
    ("Platba kartou", Modality::Card),
    ("Karetní transakce (nezaúčtováno)", Modality::Card),
    ("Výběr hotovosti", Modality::Card),
    ("Vrácení peněz", Modality::Refund),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown payment type {0:?}")]
pub struct UnknownModality(pub String);

pub fn classify(label: &str) -> Result<Modality, UnknownModality> {
    let label = label.trim();
    MODALITY_LABELS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, modality)| *modality)
        .ok_or_else(|| UnknownModality(label.to_string()))
}
