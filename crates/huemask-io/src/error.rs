use std::path::PathBuf;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(PathBuf),

    /// Error when the file cannot be accessed.
    #[error("Failed to access the file")]
    FileError(#[from] std::io::Error),

    /// Error when the image data cannot be decoded.
    #[error("Failed to decode the image")]
    ImageDecodeError(#[from] image::ImageError),

    /// Error when the decoded data cannot be wrapped into an image buffer.
    #[error(transparent)]
    ImageCreationError(#[from] huemask_image::ImageError),
}
