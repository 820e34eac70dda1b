//! Error types for mdocx operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a rendering or splitting run.
///
/// Unresolved images and malformed tables are not errors: they degrade to
/// literal text and are reported through [`crate::RenderReport`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("missing section: {0}")]
    MissingSection(String),

    #[error("unsupported image (dimensions unknown): {}", .0.display())]
    UnsupportedImage(PathBuf),

    #[error("usage: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
