use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use crate::image_pipeline::bitmap::types::{
    BMP_BITS_PER_PIXEL, BMP_HEADER_LEN, BMP_INFO_HEADER_LEN, BMP_SIGNATURE, BitmapConfig,
    BitmapHeader,
};
use crate::image_pipeline::bitmap::writer::BitmapWriter;
use crate::image_pipeline::common::error::{DatasetError, Result};
use crate::image_pipeline::dataset::types::RasterRecord;

/// Writes grayscale records as bottom-up 24-bit BGR bitmaps.
pub struct StandardBitmapWriter;

impl StandardBitmapWriter {
    /// Renders the complete bitmap file into memory.
    pub fn render(&self, record: &RasterRecord, config: &BitmapConfig) -> Result<Vec<u8>> {
        let width = record.width();
        let height = record.height();
        if width == 0 || height == 0 || record.pixels().len() != record.pixel_count() as usize {
            return Err(DatasetError::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }

        let header = BitmapHeader::new(width, height);
        let mut buffer = Vec::with_capacity(header.file_size as usize);

        write_header(&mut buffer, &header).map_err(|e| DatasetError::Encode(e.to_string()))?;

        let padding = [0u8; 3];
        for row in record.rows().rev() {
            for &value in row {
                let value = if config.invert { !value } else { value };
                buffer.extend_from_slice(&[value, value, value]);
            }
            buffer.extend_from_slice(&padding[..header.row_padding as usize]);
        }

        debug_assert_eq!(buffer.len(), header.file_size as usize);
        Ok(buffer)
    }
}

impl BitmapWriter for StandardBitmapWriter {
    fn write_bitmap(&self, record: &RasterRecord, output: &mut dyn Write, config: &BitmapConfig) -> Result<()> {
        debug!("Encoding bitmap: {}x{}", record.width(), record.height());

        let buffer = self.render(record, config)?;
        output
            .write_all(&buffer)
            .map_err(|e| DatasetError::Encode(e.to_string()))?;

        debug!("Bitmap encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

fn write_header(out: &mut Vec<u8>, header: &BitmapHeader) -> std::io::Result<()> {
    // file header
    out.write_u16::<LittleEndian>(BMP_SIGNATURE)?;
    out.write_u32::<LittleEndian>(header.file_size)?;
    out.write_u16::<LittleEndian>(0)?;
    out.write_u16::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(BMP_HEADER_LEN)?;

    // info header
    out.write_u32::<LittleEndian>(BMP_INFO_HEADER_LEN)?;
    out.write_u32::<LittleEndian>(header.width)?;
    out.write_u32::<LittleEndian>(header.height)?;
    out.write_u16::<LittleEndian>(1)?;
    out.write_u16::<LittleEndian>(BMP_BITS_PER_PIXEL)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(header.image_data_size)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(0)?;
    Ok(())
}
