use tracing::{info, instrument, warn};
use std::io::Write;
use std::path::Path;

use crate::image_pipeline::{
    common::error::{DatasetError, Result},
    dataset::{DatasetReader, DecoderConfig, IdxReader, RasterRecord, read_dataset_file},
    bitmap::{BitmapConfig, BitmapWriter, StandardBitmapWriter, encode_with},
};

/// Decoder and encoder settings used by [`DatasetToBitmapPipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub decoder: DecoderConfig,
    pub bitmap: BitmapConfig,
}

pub struct DatasetToBitmapPipeline<R: DatasetReader, W: BitmapWriter> {
    reader: R,
    writer: W,
    config: PipelineConfig,
}

impl DatasetToBitmapPipeline<IdxReader, StandardBitmapWriter> {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            reader: IdxReader::new(config.decoder.clone()),
            writer: StandardBitmapWriter,
            config,
        }
    }
}

impl<R: DatasetReader, W: BitmapWriter> DatasetToBitmapPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: PipelineConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Decodes an image buffer and, if given, applies a label buffer to it.
    #[instrument(skip(self, images, labels), fields(images_size = images.len()))]
    pub fn decode(&self, images: &[u8], labels: Option<&[u8]>) -> Result<Vec<RasterRecord>> {
        let mut records = {
            let _span = tracing::info_span!("decode_images").entered();
            self.reader.read_images(images)?
        };

        if let Some(labels) = labels {
            let _span = tracing::info_span!("decode_labels").entered();
            self.reader.read_labels(&mut records, labels)?;
        }

        info!(count = records.len(), "Decoded dataset");
        Ok(records)
    }

    /// Decodes an image file and its label file from disk.
    #[instrument(skip(self, images_path, labels_path))]
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        images_path: P,
        labels_path: Q,
    ) -> Result<Vec<RasterRecord>> {
        let images_path = images_path.as_ref();
        let labels_path = labels_path.as_ref();

        info!(
            images = %images_path.display(),
            labels = %labels_path.display(),
            "Loading dataset"
        );

        let images = {
            let _span = tracing::info_span!("read_images_file").entered();
            read_dataset_file(images_path)?
        };
        let mut records = self.decode(&images, None)?;

        let labels = {
            let _span = tracing::info_span!("read_labels_file").entered();
            read_dataset_file(labels_path)?
        };
        {
            let _span = tracing::info_span!("decode_labels").entered();
            self.reader.read_labels(&mut records, &labels)?;
        }

        Ok(records)
    }

    /// Like [`load`](Self::load), but failures are logged and handed back next to the result.
    ///
    /// An image failure yields an empty dataset. A label failure keeps the
    /// decoded images unlabelled.
    pub fn load_or_empty<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        images_path: P,
        labels_path: Q,
    ) -> (Vec<RasterRecord>, Option<DatasetError>) {
        let images_path = images_path.as_ref();
        let mut records = match read_dataset_file(images_path)
            .and_then(|data| self.reader.read_images(&data))
        {
            Ok(records) => records,
            Err(e) => {
                warn!("Image decode failed: {}", e);
                return (Vec::new(), Some(e));
            }
        };

        let labelled = read_dataset_file(labels_path.as_ref())
            .and_then(|data| self.reader.read_labels(&mut records, &data));
        match labelled {
            Ok(()) => (records, None),
            Err(e) => {
                warn!("Label decode failed: {}", e);
                (records, Some(e))
            }
        }
    }

    /// Encodes a single record into `output`.
    pub fn export(&self, record: &RasterRecord, output: &mut dyn Write) -> Result<()> {
        let _span = tracing::info_span!("encode_bitmap",
            width = record.width(),
            height = record.height()
        ).entered();
        self.writer.write_bitmap(record, output, &self.config.bitmap)
    }

    /// Encodes a single record to `output_path`; the file is written whole or not at all.
    #[instrument(skip(self, record, output_path), fields(label = ?record.label()))]
    pub fn export_file<P: AsRef<Path>>(&self, record: &RasterRecord, output_path: P) -> Result<()> {
        encode_with(record, output_path, &self.writer, &self.config.bitmap)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
