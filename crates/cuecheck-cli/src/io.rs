//! JSON Lines input and output.

use crate::error::{CliError, Result};
use cuecheck_domain::UsageRow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Read one value per non-blank line.
///
/// A line that does not parse is an error naming the file and line number.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut items = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|e| {
            CliError::InvalidInput(format!("{}:{}: {}", path.display(), index + 1, e))
        })?;
        items.push(item);
    }

    debug!("Read {} lines from {}", items.len(), path.display());
    Ok(items)
}

/// Read usage rows, one slot per non-blank line.
///
/// A line that does not parse becomes an untitled row whose provenance is
/// `path:line`. The scorer then skips and counts it as malformed, and the
/// ordinals of the remaining rows still follow the input lines.
pub fn read_rows(path: &Path) -> Result<Vec<UsageRow>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();
    let mut unreadable = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<UsageRow>(&line) {
            Ok(row) => rows.push(row),
            Err(e) => {
                let location = format!("{}:{}", path.display(), index + 1);
                warn!("Unreadable row at {}: {}", location, e);
                rows.push(UsageRow::new("", location));
                unreadable += 1;
            }
        }
    }

    debug!(
        "Read {} rows from {} ({} unreadable)",
        rows.len(),
        path.display(),
        unreadable
    );
    Ok(rows)
}

/// Write one value per line.
pub fn write_jsonl<T: Serialize>(path: &Path, items: impl IntoIterator<Item = T>) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    debug!("Wrote {} lines to {}", written, path.display());
    Ok(written)
}

/// Write a value as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
