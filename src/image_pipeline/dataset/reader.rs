use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::dataset::types::RasterRecord;

pub trait DatasetReader {
    fn read_images(&self, data: &[u8]) -> Result<Vec<RasterRecord>>;
    fn read_labels(&self, records: &mut [RasterRecord], data: &[u8]) -> Result<()>;
}
