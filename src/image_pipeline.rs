//! Image processing pipeline module
//!
//! This module provides a structured approach to dataset conversions,
//! with separate modules for IDX decoding, bitmap writing, and conversion orchestration.

pub mod dataset;
pub mod bitmap;
pub mod conversions;
pub mod common;

pub use common::{
    DatasetError,
    Result,
};

pub use dataset::{
    DatasetReader,
    DecoderConfig,
    DecoderConfigBuilder,
    IdxReader,
    RasterRecord,
    decode_images,
    decode_images_or_empty,
    decode_labels,
    decode_labels_or_skip,
};

pub use bitmap::{
    BitmapConfig,
    BitmapConfigBuilder,
    BitmapWriter,
    StandardBitmapWriter,
    encode,
};

pub use conversions::{
    DatasetToBitmapPipeline,
    PipelineConfig,
};
