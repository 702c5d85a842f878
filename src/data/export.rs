use std::io::Write;

use anyhow::{Context, Result};

use super::model::MovieDataset;
use crate::config::{EXPORT_FILE_NAME, EXPORT_MIME};

/// A downloadable CSV of the filtered rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn filtered(dataset: &MovieDataset, indices: &[usize]) -> Result<Self> {
        Ok(ExportArtifact {
            file_name: EXPORT_FILE_NAME,
            mime: EXPORT_MIME,
            bytes: to_csv_bytes(dataset, indices)?,
        })
    }
}

/// Serialize the selected rows as UTF-8 CSV: header first, no index column.
pub fn to_csv_bytes(dataset: &MovieDataset, indices: &[usize]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, dataset, indices)?;
    Ok(buf)
}

/// Stream the selected rows as CSV to any writer.
pub fn write_csv<W: Write>(out: W, dataset: &MovieDataset, indices: &[usize]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(&dataset.headers)
        .context("writing CSV header")?;
    for &i in indices {
        writer
            .write_record(&dataset.movies[i].fields)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}
