//! Dataset decoding module
//!
//! This module reads IDX image and label files into [`RasterRecord`]s.
//! The typed functions return every failure to the caller. The `_or_*`
//! variants log the failure and fall back to an empty or untouched result
//! while still handing the error back.

mod reader;
mod idx_reader;
pub mod types;

pub use reader::DatasetReader;
pub use idx_reader::IdxReader;
pub use types::{
    DecoderConfig, DecoderConfigBuilder, ImageFileHeader, LabelFileHeader, RasterRecord,
    IMAGE_FILE_MAGIC, LABEL_FILE_MAGIC,
};

use std::path::Path;

use tracing::{error, info};

use crate::image_pipeline::common::error::{DatasetError, Result};

pub(crate) use idx_reader::read_dataset_file;

/// Decodes every image in an IDX image file, in on-disk order.
pub fn decode_images<P: AsRef<Path>>(path: P) -> Result<Vec<RasterRecord>> {
    decode_images_with(path, &IdxReader::default())
}

pub fn decode_images_with<P: AsRef<Path>, R: DatasetReader>(
    path: P,
    reader: &R,
) -> Result<Vec<RasterRecord>> {
    let path = path.as_ref();
    let data = read_dataset_file(path)?;
    let records = reader.read_images(&data)?;
    info!(path = %path.display(), count = records.len(), "Decoded images");
    Ok(records)
}

/// Attaches the labels of an IDX label file to `records`, in order.
///
/// Nothing is modified unless the whole file validates.
pub fn decode_labels<P: AsRef<Path>>(records: &mut [RasterRecord], path: P) -> Result<()> {
    decode_labels_with(records, path, &IdxReader::default())
}

pub fn decode_labels_with<P: AsRef<Path>, R: DatasetReader>(
    records: &mut [RasterRecord],
    path: P,
    reader: &R,
) -> Result<()> {
    let path = path.as_ref();
    let data = read_dataset_file(path)?;
    reader.read_labels(records, &data)?;
    info!(path = %path.display(), "Decoded labels");
    Ok(())
}

/// Like [`decode_images`], but a failure is logged and yields an empty vector.
pub fn decode_images_or_empty<P: AsRef<Path>>(
    path: P,
) -> (Vec<RasterRecord>, Option<DatasetError>) {
    match decode_images(path) {
        Ok(records) => (records, None),
        Err(e) => {
            error!("{}", e);
            (Vec::new(), Some(e))
        }
    }
}

/// Like [`decode_labels`], but a failure is logged and the records are left as they were.
pub fn decode_labels_or_skip<P: AsRef<Path>>(
    records: &mut [RasterRecord],
    path: P,
) -> Option<DatasetError> {
    match decode_labels(records, path) {
        Ok(()) => None,
        Err(e) => {
            error!("{}", e);
            Some(e)
        }
    }
}
