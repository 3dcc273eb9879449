use mnist_bmp_rs::image_pipeline::{DatasetToBitmapPipeline, PipelineConfig};
use mnist_bmp_rs::logger;

use anyhow::{Context, bail};
use rand::Rng;
use tracing::{error, info};

const DEFAULT_IMAGES: &str = "train-images.idx3-ubyte";
const DEFAULT_LABELS: &str = "train-labels.idx1-ubyte";
const DEFAULT_OUTPUT: &str = "test-image.bmp";

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let images_path = args.next().unwrap_or_else(|| DEFAULT_IMAGES.to_string());
    let labels_path = args.next().unwrap_or_else(|| DEFAULT_LABELS.to_string());
    let output_path = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    info!("Starting mnist-bmp...");

    let pipeline = DatasetToBitmapPipeline::new(PipelineConfig::default());
    info!(
        "Magic number validation: {}",
        if pipeline.config().decoder.validate_magic {
            "enabled"
        } else {
            "disabled"
        }
    );

    let (records, err) = pipeline.load_or_empty(&images_path, &labels_path);
    if let Some(e) = &err {
        error!("Dataset load incomplete: {}", e);
    }
    if records.is_empty() {
        bail!("no images decoded from {}", images_path);
    }

    let index = rand::thread_rng().gen_range(0..records.len());
    let record = &records[index];
    info!(
        index,
        label = ?record.label(),
        width = record.width(),
        height = record.height(),
        "Picked random image"
    );

    pipeline
        .export_file(record, &output_path)
        .with_context(|| format!("writing {}", output_path))?;

    info!("Image generated at {}", output_path);
    Ok(())
}
