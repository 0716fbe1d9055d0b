//! Read Air Bank CSV exports from disk.
//!
//! Export files are `;`-delimited, `"`-quoted, with a header row of Czech
//! column labels. One file per account; the file name carries the account
//! number (see `schema::FILE_NAME_ACCOUNT_RANGE`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::normalize::{NormalizeError, normalize};
use crate::schema::{DELIMITER, QUOTE};
use crate::types::{CanonicalTransaction, RawTransactionRow};

/// Suffixes browsers use for downloads that are still being written.
pub const PARTIAL_DOWNLOAD_SUFFIXES: &[&str] = &[".crdownload", ".part", ".tmp"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parsing {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("{file} line {line}: {source}")]
    Row {
        file: String,
        line: u64,
        #[source]
        source: NormalizeError,
    },
}

/// Whether a directory entry name looks like an unfinished download.
pub fn is_partial_download(name: &str) -> bool {
    PARTIAL_DOWNLOAD_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// Parse one export from any reader. `file_name` supplies the account number.
pub fn parse_export<R: io::Read>(reader: R, file_name: &str) -> Result<Vec<CanonicalTransaction>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .trim(csv::Trim::All)
        .has_headers(true)
        .from_reader(reader);

    let csv_err = |source: csv::Error| IngestError::Csv {
        file: file_name.to_string(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?.clone();

    let mut txns = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: RawTransactionRow = record.deserialize(Some(&headers)).map_err(csv_err)?;
        let tx = normalize(&row, file_name).map_err(|source| IngestError::Row {
            file: file_name.to_string(),
            line,
            source,
        })?;
        trace!(line, modality = %tx.modality, amount = %tx.amount, "normalized row");
        txns.push(tx);
    }

    debug!(file = file_name, rows = txns.len(), "parsed export");
    Ok(txns)
}

/// Parse a single export file from disk.
pub fn read_export(path: impl AsRef<Path>) -> Result<Vec<CanonicalTransaction>, IngestError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    parse_export(file, &file_name)
}

/// Parse every export in `dir`, in file-name order, into one flat list.
///
/// An empty directory yields an empty list. The first bad row aborts the
/// whole run; nothing partial is returned.
pub fn ingest_dir(dir: impl AsRef<Path>) -> Result<Vec<CanonicalTransaction>, IngestError> {
    let dir = dir.as_ref();
    let io_err = |source: io::Error| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let file_type = entry.file_type().map_err(io_err)?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_partial_download(&name) {
            warn!(file = %name, "skipping unfinished download");
            continue;
        }
        files.push(entry.path());
    }
    files.sort();

    let out = ingest_files(&files)?;
    info!(dir = %dir.display(), files = files.len(), transactions = out.len(), "ingested exports");
    Ok(out)
}

/// Parse exactly the given exports, in the given order, into one flat list.
///
/// Nothing else in their directories is read.
pub fn ingest_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<CanonicalTransaction>, IngestError> {
    let mut out = Vec::new();
    for path in paths {
        out.extend(read_export(path)?);
    }
    Ok(out)
}
