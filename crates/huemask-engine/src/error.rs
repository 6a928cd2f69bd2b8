use huemask_image::ImageError;

/// An error type for the engine module.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// An error occurred while operating on image buffers.
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// An error reported by the active frame source.
    #[error("Frame source failure: {0}")]
    SourceError(#[source] Box<dyn std::error::Error + Send + Sync>),
}
