use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Region ({x},{y} {width}x{height}) exceeds bounds ({bound_width}x{bound_height})")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        bound_width: usize,
        bound_height: usize,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Expected {expected} channels for {color_space}, got {actual}")]
    InvalidChannelCount {
        color_space: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported color conversion: {from} -> {to}")]
    UnsupportedConversion { from: String, to: String },

    #[error("Region has zero area")]
    EmptyRegion,

    #[error("Channel index {index} out of range (image has {channels} channels)")]
    ChannelMismatch { index: usize, channels: usize },

    #[error("Mask extent {mask_width}x{mask_height} does not match region {width}x{height}")]
    MaskMismatch {
        mask_width: usize,
        mask_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Invalid histogram configuration: {0}")]
    InvalidHistogramConfig(String),

    #[error("Histogram length mismatch: {left} vs {right}")]
    HistogramLengthMismatch { left: usize, right: usize },

    #[error("Malformed profile: {0}")]
    MalformedProfile(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
