use anyhow::{Context, Result};
use airbank_sync::SyncOutput;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write the run result as pretty JSON to `path`, or stdout when `None`.
pub fn write_output(out: &SyncOutput, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(out).context("serialize output")?;
    match path {
        Some(p) => {
            fs::write(p, format!("{json}\n")).with_context(|| format!("write {}", p.display()))?;
            tracing::info!(file = %p.display(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("write stdout")?;
        }
    }
    Ok(())
}
