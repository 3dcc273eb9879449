//! Decode IDX (MNIST) image and label files and write single images as bitmaps.

pub mod image_pipeline;
pub mod logger;
