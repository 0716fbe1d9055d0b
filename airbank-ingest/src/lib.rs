//! airbank-ingest: Air Bank CSV export parsing and normalization into canonical transactions.

pub mod ingest;
pub mod locale;
pub mod modality;
pub mod normalize;
pub mod schema;
pub mod types;

pub use ingest::{IngestError, ingest_dir, ingest_files, parse_export, read_export};
pub use locale::{LocaleError, parse_amount, parse_balance, parse_date};
pub use modality::{UnknownModality, classify};
pub use normalize::{NormalizeError, account_number_from_file_name, normalize};
pub use types::{AccountBalances, CanonicalTransaction, Modality, RawTransactionRow};
