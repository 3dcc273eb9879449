use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::dataset::types::RasterRecord;
use crate::image_pipeline::bitmap::types::BitmapConfig;

pub trait BitmapWriter {
    fn write_bitmap(&self, record: &RasterRecord, output: &mut dyn Write, config: &BitmapConfig) -> Result<()>;
}
