//! Dataset record and header types

use crate::image_pipeline::common::error::{DatasetError, Result};

/// Magic number at the start of an image file (unsigned byte, 3 dimensions).
pub const IMAGE_FILE_MAGIC: u32 = 0x0000_0803;
/// Magic number at the start of a label file (unsigned byte, 1 dimension).
pub const LABEL_FILE_MAGIC: u32 = 0x0000_0801;

/// Size in bytes of the image file header: magic, count, width, height.
pub const IMAGE_HEADER_LEN: usize = 16;
/// Size in bytes of the label file header: magic, count.
pub const LABEL_HEADER_LEN: usize = 8;

/// A single decoded grayscale image with an optional class label.
///
/// `Default` produces an empty placeholder with no pixels; every pixel lookup
/// on it returns `None` and the bitmap encoder rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterRecord {
    pixels: Vec<u8>,
    width: u16,
    pixel_count: u16,
    label: Option<u8>,
}

impl RasterRecord {
    /// Builds a record from a row-major, top-to-bottom pixel buffer.
    ///
    /// The buffer length must be a non-zero multiple of `width` and fit in a `u16`.
    pub fn new(pixels: Vec<u8>, width: u16) -> Result<Self> {
        let len = pixels.len();
        if width == 0 || len == 0 || len % width as usize != 0 {
            return Err(DatasetError::InvalidDimensions {
                width: width as usize,
                height: if width == 0 { 0 } else { len / width as usize },
            });
        }

        let pixel_count = u16::try_from(len).map_err(|_| {
            DatasetError::CorruptFile(format!("{} pixels exceed the 16-bit pixel count", len))
        })?;

        Ok(Self {
            pixels,
            width,
            pixel_count,
            label: None,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Number of rows; zero for the placeholder record.
    pub fn height(&self) -> u16 {
        if self.width == 0 {
            0
        } else {
            self.pixel_count / self.width
        }
    }

    pub fn pixel_count(&self) -> u16 {
        self.pixel_count
    }

    pub fn label(&self) -> Option<u8> {
        self.label
    }

    pub fn set_label(&mut self, label: u8) {
        self.label = Some(label);
    }

    /// Pixel at a flat row-major index.
    pub fn pixel(&self, index: usize) -> Option<u8> {
        self.pixels.get(index).copied()
    }

    /// Pixel at column `x` of row `y`, with row 0 at the top.
    pub fn pixel_at(&self, x: u16, y: u16) -> Option<u8> {
        if x >= self.width || y >= self.height() {
            return None;
        }
        self.pixel(x as usize + y as usize * self.width as usize)
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u8]> + '_ {
        // chunks_exact panics on zero
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }
}

/// Header of an image file, decoded from big-endian fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFileHeader {
    pub magic: u32,
    pub item_count: u32,
    /// Width truncated to 16 bits.
    pub width: u16,
    /// Height truncated to 16 bits.
    pub height: u16,
}

/// Header of a label file, decoded from big-endian fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelFileHeader {
    pub magic: u32,
    pub item_count: u32,
}

/// Decoder behaviour switches.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Reject files whose magic number does not match the dataset format
    pub validate_magic: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            validate_magic: true,
        }
    }
}

impl DecoderConfig {
    pub fn builder() -> DecoderConfigBuilder {
        DecoderConfigBuilder::default()
    }
}

/// Builder for DecoderConfig
#[derive(Default)]
pub struct DecoderConfigBuilder {
    validate_magic: Option<bool>,
}

impl DecoderConfigBuilder {
    pub fn validate_magic(mut self, validate: bool) -> Self {
        self.validate_magic = Some(validate);
        self
    }

    pub fn build(self) -> DecoderConfig {
        let default = DecoderConfig::default();
        DecoderConfig {
            validate_magic: self.validate_magic.unwrap_or(default.validate_magic),
        }
    }
}
