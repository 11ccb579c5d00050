//! Buffered CSV writer for kline records.

use crate::error::{PersistenceError, PersistenceResult};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use triarb_rest::Kline;

const DEFAULT_BUFFER_SIZE: usize = 1_000;

/// Appends kline rows to a CSV file, flushing in batches.
///
/// The header row is written only when the target file is empty, so
/// repeated runs against the same file keep it parseable. An unflushed
/// buffer is flushed on drop as a last resort; call [`close`] to observe
/// the final flush error instead.
///
/// [`close`]: KlineCsvWriter::close
pub struct KlineCsvWriter {
    path: PathBuf,
    buffer: Vec<Kline>,
    max_buffer_size: usize,
    rows_written: u64,
    closed: bool,
}

impl KlineCsvWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(path: impl AsRef<Path>, max_buffer_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            buffer: Vec::new(),
            max_buffer_size: max_buffer_size.max(1),
            rows_written: 0,
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Queue one record, flushing when the buffer is full.
    pub fn add_record(&mut self, kline: Kline) -> PersistenceResult<()> {
        if self.closed {
            return Err(PersistenceError::Closed);
        }
        self.buffer.push(kline);
        if self.buffer.len() >= self.max_buffer_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Write all buffered records to disk.
    pub fn flush(&mut self) -> PersistenceResult<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let write_header = file.metadata()?.len() == 0;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);

        let rows = self.buffer.len();
        for kline in self.buffer.drain(..) {
            writer.serialize(kline)?;
        }
        writer.flush()?;

        self.rows_written += rows as u64;
        debug!(path = %self.path.display(), rows, "Flushed kline rows");
        Ok(())
    }

    /// Flush and mark the writer closed. Further writes are rejected.
    pub fn close(&mut self) -> PersistenceResult<()> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        self.closed = true;
        info!(
            path = %self.path.display(),
            rows = self.rows_written,
            "Kline export closed"
        );
        Ok(())
    }
}

impl Drop for KlineCsvWriter {
    fn drop(&mut self) {
        if !self.closed && !self.buffer.is_empty() {
            if let Err(e) = self.flush() {
                error!(path = %self.path.display(), error = %e, "Flush on drop failed");
            }
        }
    }
}
