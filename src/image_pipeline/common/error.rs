use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {} is empty", .0.display())]
    EmptyFile(PathBuf),

    #[error("There are no image records to attach labels to")]
    NoImageRecords,

    #[error("Corrupt dataset file: {0}")]
    CorruptFile(String),

    #[error("Invalid image dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Failed to encode bitmap: {0}")]
    Encode(String),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatasetError>;
