//! Bitmap writing module
//!
//! This module writes a single [`RasterRecord`] as an uncompressed 24-bit bitmap.

mod writer;
mod standard_bitmap_writer;
pub mod types;

pub use writer::BitmapWriter;
pub use standard_bitmap_writer::StandardBitmapWriter;
pub use types::{BitmapConfig, BitmapConfigBuilder, BitmapHeader, row_padding};

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::image_pipeline::common::error::{DatasetError, Result};
use crate::image_pipeline::dataset::types::RasterRecord;

/// Writes `record` to `path` with the default configuration.
pub fn encode<P: AsRef<Path>>(record: &RasterRecord, path: P) -> Result<()> {
    encode_with(record, path, &StandardBitmapWriter, &BitmapConfig::default())
}

/// Encodes into memory, then replaces `path` atomically through a temporary
/// file in the same directory. On error the destination is left untouched.
pub fn encode_with<P: AsRef<Path>, W: BitmapWriter>(
    record: &RasterRecord,
    path: P,
    writer: &W,
    config: &BitmapConfig,
) -> Result<()> {
    let path = path.as_ref();

    let mut buffer = Vec::new();
    writer.write_bitmap(record, &mut buffer, config)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| DatasetError::io(path, e))?;
    file.write_all(&buffer)
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| DatasetError::io(path, e))?;
    file.persist(path).map_err(|e| DatasetError::io(path, e.error))?;

    info!(path = %path.display(), bytes = buffer.len(), "Wrote bitmap");
    Ok(())
}
