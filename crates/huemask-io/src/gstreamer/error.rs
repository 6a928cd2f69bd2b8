/// An error type for the capture module.
#[derive(thiserror::Error, Debug)]
pub enum StreamCaptureError {
    /// An error occurred during GStreamer initialization.
    #[error(transparent)]
    GStreamerError(#[from] gstreamer::glib::Error),

    /// An error occurred during GStreamer downcast of a pipeline element.
    #[error("Failed to downcast pipeline element")]
    DowncastPipelineError(gstreamer::Element),

    /// An error occurred while looking up an element by name.
    #[error("Failed to get an element by name")]
    GetElementByNameError,

    /// An error occurred while getting the pipeline bus.
    #[error("Failed to get the bus")]
    BusError,

    /// An error occurred while setting the pipeline state.
    #[error(transparent)]
    SetPipelineStateError(#[from] gstreamer::StateChangeError),

    /// An error occurred while pulling a sample from the appsink.
    #[error(transparent)]
    PullSampleError(#[from] gstreamer::glib::BoolError),

    /// An error occurred while reading the caps of a sample.
    #[error("Failed caps: {0}")]
    GetCapsError(String),

    /// An error occurred while getting the buffer from a sample.
    #[error("Failed to get the buffer from the sample")]
    GetBufferError,

    /// An error occurred while creating an image from a sample.
    #[error("Failed to create an image frame")]
    CreateImageFrameError,

    /// An error occurred while sending the end-of-stream event.
    #[error("Failed to send eos event")]
    SendEosError,

    /// An error occurred while starting the device monitor.
    #[error("Failed to start the device monitor")]
    DeviceMonitorError,

    /// An error for an invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An error occurred while checking the image format of a sample.
    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    /// An error occurred when the pipeline is not running.
    #[error("Pipeline is not running")]
    PipelineNotRunning,
}
