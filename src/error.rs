use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yolo2flat operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to read image directory {path}: {message}")]
    DirectoryRead { path: PathBuf, message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} reports dimensions that do not fit in u32: {message}")]
    ImageDimensionRange { path: PathBuf, message: String },

    #[error("Failed to read label file {path}: {source}")]
    LabelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse label file {path} at line {line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to read flat record file {path}: {source}")]
    RecordRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse flat record file {path} at line {line}: {message}")]
    RecordParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize conversion report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
