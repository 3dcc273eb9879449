//! Bitmap encoding configuration types

/// "BM" read as a little-endian u16.
pub const BMP_SIGNATURE: u16 = 19778;
/// File header (14 bytes) plus info header (40 bytes).
pub const BMP_HEADER_LEN: u32 = 54;
pub const BMP_INFO_HEADER_LEN: u32 = 40;
pub const BMP_BITS_PER_PIXEL: u16 = 24;
/// Bytes per output pixel (blue, green, red).
pub const BMP_CHANNELS: u32 = 3;

/// Zero bytes appended after each pixel row.
///
/// Written as `width % 4`; since `3 * width ≡ -width (mod 4)` this equals the
/// bytes needed to bring a `width * 3` byte row up to a multiple of 4.
pub fn row_padding(width: u16) -> u32 {
    width as u32 % 4
}

/// Configuration for writing a record as a bitmap
#[derive(Debug, Clone)]
pub struct BitmapConfig {
    /// Write `255 - v` instead of `v`, giving dark digits on a light background
    pub invert: bool,
}

impl Default for BitmapConfig {
    fn default() -> Self {
        Self { invert: true }
    }
}

impl BitmapConfig {
    pub fn builder() -> BitmapConfigBuilder {
        BitmapConfigBuilder::default()
    }
}

/// Builder for BitmapConfig
#[derive(Default)]
pub struct BitmapConfigBuilder {
    invert: Option<bool>,
}

impl BitmapConfigBuilder {
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = Some(invert);
        self
    }

    pub fn build(self) -> BitmapConfig {
        let default = BitmapConfig::default();
        BitmapConfig {
            invert: self.invert.unwrap_or(default.invert),
        }
    }
}

/// Size fields of the 54-byte header of a 24-bit uncompressed bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub file_size: u32,
    pub width: u32,
    pub height: u32,
    pub image_data_size: u32,
    pub row_padding: u32,
}

impl BitmapHeader {
    pub fn new(width: u16, height: u16) -> Self {
        let row_padding = row_padding(width);
        let width = width as u32;
        let height = height as u32;
        let image_data_size = width * height * BMP_CHANNELS;

        Self {
            file_size: image_data_size + row_padding * height + BMP_HEADER_LEN,
            width,
            height,
            image_data_size,
            row_padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_padding() {
        assert_eq!(row_padding(4), 0);
        assert_eq!(row_padding(28), 0);
        assert_eq!(row_padding(1), 1);
        assert_eq!(row_padding(2), 2);
        assert_eq!(row_padding(3), 3);
    }

    #[test]
    fn test_row_padding_aligns_rows_to_four_bytes() {
        for width in 1..=512u16 {
            let canonical = (4 - (width as u32 * BMP_CHANNELS) % 4) % 4;
            assert_eq!(row_padding(width), canonical, "width {}", width);
            assert_eq!((width as u32 * BMP_CHANNELS + row_padding(width)) % 4, 0);
        }
    }

    #[test]
    fn test_header_sizes() {
        let header = BitmapHeader::new(3, 2);
        assert_eq!(header.image_data_size, 18);
        assert_eq!(header.row_padding, 3);
        assert_eq!(header.file_size, 18 + 6 + 54);

        let header = BitmapHeader::new(4, 1);
        assert_eq!(header.file_size, 66);
    }

    #[test]
    fn test_config_builder() {
        assert!(BitmapConfig::default().invert);
        let config = BitmapConfig::builder().invert(false).build();
        assert!(!config.invert);
    }
}
