use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::parse::ReviewRecord;
use crate::{Error, Result, HEADER, OUTPUT_EXT};

/// Append-only CSV of the reviews of one entity.
///
/// Creating the writer truncates any earlier output for the same entity and writes the
/// header straight away, so even a crawl that finds nothing leaves a header-only file.
pub struct ReviewWriter {
    writer: Writer<File>,
    path: PathBuf,
    written: usize,
}

impl ReviewWriter {
    pub fn create(dir: &Path, entity: &str) -> Result<Self> {
        let path = output_path(dir, entity)?;
        fs::create_dir_all(dir)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;

        Ok(Self {
            writer,
            path,
            written: 0,
        })
    }

    /// Writes one row and flushes it, so an interrupted crawl keeps what it found.
    pub fn append(&mut self, record: &ReviewRecord) -> Result<()> {
        self.writer.write_record(record.fields())?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

/// `<dir>/<entity>.csv`, with characters that don't belong in a file name replaced by `_`.
pub fn output_path(dir: &Path, entity: &str) -> Result<PathBuf> {
    let name: String = entity
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return Err(Error::InvalidOutputName(entity.into()));
    }
    Ok(dir.join(format!("{name}.{OUTPUT_EXT}")))
}
