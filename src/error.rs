//! Error types for stack loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for stack loading operations.
pub type Result<T> = std::result::Result<T, StackLoaderError>;

#[derive(Debug, Error)]
pub enum StackLoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no usable fields in header file {}", .0.display())]
    EmptyHeader(PathBuf),

    #[error("header field `{0}` is missing or malformed")]
    MissingField(&'static str),

    #[error("raw files carrying their own header are not supported (headersize = {0})")]
    HeaderedRawFile(f64),

    #[error("unsupported element data type `{0}`")]
    UnsupportedDataType(String),

    #[error("raw payload is {actual} bytes but the header implies {expected}")]
    PayloadSizeMismatch { expected: usize, actual: usize },

    #[error("{}: not loaded, stack format unknown", .0.display())]
    UnknownFormat(PathBuf),

    /// Returned by [`MetaImageBackend`] implementations whose native library
    /// turns out to be missing at call time. The loader treats this the same
    /// as no backend being registered.
    ///
    /// [`MetaImageBackend`]: crate::backend::MetaImageBackend
    #[error("accelerated volume backend is not available")]
    BackendUnavailable,

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("pages in the stack differ in dimensions or sample type")]
    InconsistentPages,

    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
