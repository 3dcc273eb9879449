//! Decoder for the IDX image/label file pair used by the MNIST dataset.
//!
//! Both files start with a big-endian header followed by raw unsigned bytes:
//!
//! - image file: magic, item count, width, height (4 bytes each), then
//!   `item count` blocks of `width * height` row-major pixels
//! - label file: magic, item count (4 bytes each), then one byte per label

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{DatasetError, Result};
use crate::image_pipeline::dataset::reader::DatasetReader;
use crate::image_pipeline::dataset::types::{
    DecoderConfig, IMAGE_FILE_MAGIC, IMAGE_HEADER_LEN, ImageFileHeader, LABEL_FILE_MAGIC,
    LABEL_HEADER_LEN, LabelFileHeader, RasterRecord,
};

/// Highest label value the dataset defines (digits 0 through 9).
const MAX_LABEL: u8 = 9;

/// Reader for IDX-formatted image and label buffers.
#[derive(Debug, Clone, Default)]
pub struct IdxReader {
    config: DecoderConfig,
}

impl IdxReader {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Parses the 16-byte image header. Width and height are truncated to 16 bits.
    pub fn parse_image_header(&self, data: &[u8]) -> Result<ImageFileHeader> {
        if data.len() < IMAGE_HEADER_LEN {
            return Err(DatasetError::CorruptFile(format!(
                "image header needs {} bytes, file has {}",
                IMAGE_HEADER_LEN,
                data.len()
            )));
        }

        let mut cursor = Cursor::new(data);
        let magic = read_be_u32(&mut cursor)?;
        let item_count = read_be_u32(&mut cursor)?;
        let width = read_be_u32(&mut cursor)? as u16;
        let height = read_be_u32(&mut cursor)? as u16;

        self.check_magic(magic, IMAGE_FILE_MAGIC, "image")?;

        Ok(ImageFileHeader {
            magic,
            item_count,
            width,
            height,
        })
    }

    /// Parses the 8-byte label header.
    pub fn parse_label_header(&self, data: &[u8]) -> Result<LabelFileHeader> {
        if data.len() < LABEL_HEADER_LEN {
            return Err(DatasetError::CorruptFile(format!(
                "label header needs {} bytes, file has {}",
                LABEL_HEADER_LEN,
                data.len()
            )));
        }

        let mut cursor = Cursor::new(data);
        let magic = read_be_u32(&mut cursor)?;
        let item_count = read_be_u32(&mut cursor)?;

        self.check_magic(magic, LABEL_FILE_MAGIC, "label")?;

        Ok(LabelFileHeader { magic, item_count })
    }

    fn check_magic(&self, found: u32, expected: u32, kind: &str) -> Result<()> {
        if self.config.validate_magic && found != expected {
            return Err(DatasetError::CorruptFile(format!(
                "{} file magic number is {:#010x}, expected {:#010x}",
                kind, found, expected
            )));
        }
        Ok(())
    }
}

impl DatasetReader for IdxReader {
    fn read_images(&self, data: &[u8]) -> Result<Vec<RasterRecord>> {
        debug!("Decoding image file, {} bytes", data.len());

        let header = self.parse_image_header(data)?;
        let count = header.item_count as usize;

        debug!(
            "Image header: magic={:#010x} count={} width={} height={}",
            header.magic, header.item_count, header.width, header.height
        );

        if count == 0 {
            return Ok(Vec::new());
        }

        if header.width == 0 || header.height == 0 {
            return Err(DatasetError::InvalidDimensions {
                width: header.width as usize,
                height: header.height as usize,
            });
        }

        let block_len = (header.width as u32 * header.height as u32) as usize;
        if block_len > u16::MAX as usize {
            return Err(DatasetError::CorruptFile(format!(
                "{}x{} images exceed the 16-bit pixel count",
                header.width, header.height
            )));
        }

        let body = &data[IMAGE_HEADER_LEN..];
        let needed = count.checked_mul(block_len).ok_or_else(|| {
            DatasetError::CorruptFile(format!("{} images of {} bytes overflow", count, block_len))
        })?;
        if body.len() < needed {
            return Err(DatasetError::CorruptFile(format!(
                "header declares {} images of {} bytes ({} bytes) but only {} bytes follow",
                count,
                block_len,
                needed,
                body.len()
            )));
        }

        let records = body[..needed]
            .chunks_exact(block_len)
            .map(|block| RasterRecord::new(block.to_vec(), header.width))
            .collect::<Result<Vec<_>>>()?;

        debug!("Decoded {} images", records.len());
        Ok(records)
    }

    fn read_labels(&self, records: &mut [RasterRecord], data: &[u8]) -> Result<()> {
        debug!("Decoding label file, {} bytes", data.len());

        if records.is_empty() {
            return Err(DatasetError::NoImageRecords);
        }

        let header = self.parse_label_header(data)?;
        let count = header.item_count as usize;

        if count > records.len() {
            return Err(DatasetError::CorruptFile(format!(
                "label file declares {} labels for {} images",
                count,
                records.len()
            )));
        }

        let body = &data[LABEL_HEADER_LEN..];
        if body.len() < count {
            return Err(DatasetError::CorruptFile(format!(
                "header declares {} labels but only {} bytes follow",
                count,
                body.len()
            )));
        }

        let labels = &body[..count];
        let out_of_range = labels.iter().filter(|&&label| label > MAX_LABEL).count();
        if out_of_range > 0 {
            warn!("{} labels fall outside 0..={}", out_of_range, MAX_LABEL);
        }

        for (record, &label) in records.iter_mut().zip(labels) {
            record.set_label(label);
        }

        debug!("Applied {} labels to {} images", count, records.len());
        Ok(())
    }
}

fn read_be_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32> {
    cursor
        .read_u32::<BigEndian>()
        .map_err(|e| DatasetError::CorruptFile(format!("truncated header: {}", e)))
}

/// Reads a whole file, rejecting it if it is empty.
pub(crate) fn read_dataset_file(path: &std::path::Path) -> Result<Vec<u8>> {
    let mut file = std::fs::File::open(path).map_err(|e| DatasetError::io(path, e))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|e| DatasetError::io(path, e))?;

    if data.is_empty() {
        return Err(DatasetError::EmptyFile(path.to_path_buf()));
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_file(magic: u32, count: u32, width: u32, height: u32, body: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        for field in [magic, count, width, height] {
            data.extend_from_slice(&field.to_be_bytes());
        }
        data.extend_from_slice(body);
        data
    }

    fn label_file(magic: u32, labels: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&magic.to_be_bytes());
        data.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        data.extend_from_slice(labels);
        data
    }

    fn records(count: usize) -> Vec<RasterRecord> {
        (0..count)
            .map(|i| RasterRecord::new(vec![i as u8; 4], 2).unwrap())
            .collect()
    }

    #[test]
    fn test_header_fields_are_big_endian() {
        let data = [
            0x00, 0x00, 0x08, 0x03, 0x00, 0x00, 0xEA, 0x60, 0x00, 0x00, 0x00, 0x1C, 0x00, 0x00,
            0x00, 0x1C,
        ];
        let header = IdxReader::default().parse_image_header(&data).unwrap();
        assert_eq!(header.magic, 2051);
        assert_eq!(header.item_count, 60_000);
        assert_eq!(header.width, 28);
        assert_eq!(header.height, 28);
    }

    #[test]
    fn test_header_dimensions_truncate_to_16_bits() {
        let data = image_file(IMAGE_FILE_MAGIC, 0, 0x0001_0002, 0x0003_0004, &[]);
        let header = IdxReader::default().parse_image_header(&data).unwrap();
        assert_eq!(header.width, 2);
        assert_eq!(header.height, 4);
    }

    #[test]
    fn test_read_images_in_file_order() {
        let body = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let data = image_file(IMAGE_FILE_MAGIC, 2, 3, 2, &body);

        let images = IdxReader::default().read_images(&data).unwrap();

        assert_eq!(images.len(), 2);
        for image in &images {
            assert_eq!(image.width(), 3);
            assert_eq!(image.height(), 2);
            assert_eq!(image.pixel_count(), 6);
            assert_eq!(image.label(), None);
        }
        assert_eq!(images[0].pixels(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(images[1].pixels(), &[7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_read_images_ignores_trailing_bytes() {
        let data = image_file(IMAGE_FILE_MAGIC, 1, 2, 1, &[5, 6, 7]);
        let images = IdxReader::default().read_images(&data).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].pixels(), &[5, 6]);
    }

    #[test]
    fn test_read_images_zero_count() {
        let data = image_file(IMAGE_FILE_MAGIC, 0, 28, 28, &[]);
        assert!(IdxReader::default().read_images(&data).unwrap().is_empty());
    }

    #[test]
    fn test_read_images_truncated_body() {
        let data = image_file(IMAGE_FILE_MAGIC, 3, 2, 2, &[0; 10]);
        let result = IdxReader::default().read_images(&data);
        assert!(matches!(result, Err(DatasetError::CorruptFile(_))));
    }

    #[test]
    fn test_read_images_truncated_header() {
        let result = IdxReader::default().read_images(&[0, 0, 8, 3, 0]);
        assert!(matches!(result, Err(DatasetError::CorruptFile(_))));
    }

    #[test]
    fn test_read_images_zero_width() {
        let data = image_file(IMAGE_FILE_MAGIC, 1, 0, 5, &[0; 5]);
        let result = IdxReader::default().read_images(&data);
        assert!(matches!(
            result,
            Err(DatasetError::InvalidDimensions { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_read_images_pixel_count_overflow() {
        let data = image_file(IMAGE_FILE_MAGIC, 1, 300, 300, &[]);
        let result = IdxReader::default().read_images(&data);
        assert!(matches!(result, Err(DatasetError::CorruptFile(_))));
    }

    #[test]
    fn test_magic_mismatch_rejected_by_default() {
        let data = image_file(LABEL_FILE_MAGIC, 1, 1, 1, &[0]);
        let result = IdxReader::default().read_images(&data);
        assert!(matches!(result, Err(DatasetError::CorruptFile(_))));
    }

    #[test]
    fn test_magic_mismatch_accepted_when_lenient() {
        let reader = IdxReader::new(DecoderConfig::builder().validate_magic(false).build());
        let data = image_file(0xDEAD_BEEF, 1, 1, 1, &[42]);
        let images = reader.read_images(&data).unwrap();
        assert_eq!(images[0].pixels(), &[42]);
    }

    #[test]
    fn test_read_labels_sets_prefix_only() {
        let mut images = records(4);
        let data = label_file(LABEL_FILE_MAGIC, &[7, 3]);

        IdxReader::default().read_labels(&mut images, &data).unwrap();

        assert_eq!(images[0].label(), Some(7));
        assert_eq!(images[1].label(), Some(3));
        assert_eq!(images[2].label(), None);
        assert_eq!(images[3].label(), None);
    }

    #[test]
    fn test_read_labels_requires_records() {
        let data = label_file(LABEL_FILE_MAGIC, &[1]);
        let result = IdxReader::default().read_labels(&mut [], &data);
        assert!(matches!(result, Err(DatasetError::NoImageRecords)));
    }

    #[test]
    fn test_read_labels_more_labels_than_records() {
        let mut images = records(2);
        let data = label_file(LABEL_FILE_MAGIC, &[1, 2, 3]);

        let result = IdxReader::default().read_labels(&mut images, &data);

        assert!(matches!(result, Err(DatasetError::CorruptFile(_))));
        assert!(images.iter().all(|image| image.label().is_none()));
    }

    #[test]
    fn test_read_labels_truncated_body_leaves_records_untouched() {
        let mut images = records(3);
        let mut data = label_file(LABEL_FILE_MAGIC, &[1, 2, 3]);
        data.pop();

        let result = IdxReader::default().read_labels(&mut images, &data);

        assert!(matches!(result, Err(DatasetError::CorruptFile(_))));
        assert!(images.iter().all(|image| image.label().is_none()));
    }

    #[test]
    fn test_read_labels_keeps_out_of_range_values() {
        let mut images = records(1);
        let data = label_file(LABEL_FILE_MAGIC, &[200]);
        IdxReader::default().read_labels(&mut images, &data).unwrap();
        assert_eq!(images[0].label(), Some(200));
    }
}
