//! Pipeline conversions module
//!
//! This module contains orchestration logic for turning dataset files into bitmaps.

mod dataset_to_bitmap;


pub use dataset_to_bitmap::{DatasetToBitmapPipeline, PipelineConfig};
