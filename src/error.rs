//! Error types for the feather-matte crate.

/// Errors that can occur during mask refinement and matte generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured feathering method is not registered.
    #[error("unknown feathering method: {0:?}")]
    UnknownMethod(String),

    /// The configured feather width is zero, negative, or not finite.
    #[error("feather width must be a positive finite number, got {0}")]
    InvalidWidth(f32),

    /// A mask was constructed with a zero-sized pixel grid.
    #[error("mask has an empty pixel grid")]
    EmptyMask,

    /// Raw pixel data does not match the declared mask dimensions.
    #[error("pixel buffer length {actual} does not match {width}x{height} = {expected}")]
    DimensionMismatch {
        /// Declared mask width in pixels.
        width: u32,
        /// Declared mask height in pixels.
        height: u32,
        /// Expected buffer length (`width * height`).
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred while decoding or encoding an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
