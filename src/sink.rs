use crate::{Listing, ScrapeError};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Overwrite `path` with one JSON object per listing, one per line.
pub fn write_json_lines(path: &Path, listings: &[Listing]) -> Result<(), ScrapeError> {
    info!(path = %path.display(), count = listings.len(), "saving data to json file...");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut out = BufWriter::new(File::create(path)?);
    for listing in listings {
        serde_json::to_writer(&mut out, listing)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
