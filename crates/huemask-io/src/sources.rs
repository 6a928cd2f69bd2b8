//! Adapters that normalize cameras, video files and still images into the
//! render loop's [`FrameSource`] contract.

use std::path::Path;

use huemask_engine::{EngineError, FrameSource};
use huemask_image::Image;

use crate::error::IoError;
use crate::functional;

#[cfg(feature = "gstreamer")]
use crate::gstreamer::{CameraCapture, StreamCaptureError, V4L2CameraConfig, VideoReader, VideoReaderError};

/// A frame source backed by a decoded still image.
///
/// Every grab hands out the decoded image at its natural dimensions, so the
/// pipeline re-renders it each tick with the current range and options.
pub struct StillImageSource {
    image: Option<Image<u8, 4>>,
}

impl StillImageSource {
    /// Decode the image at `path` into a source.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IoError> {
        Ok(Self {
            image: Some(functional::read_image_any_rgba8(path)?),
        })
    }

    /// Wrap an already decoded image.
    pub fn new(image: Image<u8, 4>) -> Self {
        Self { image: Some(image) }
    }
}

impl FrameSource for StillImageSource {
    fn grab(&mut self) -> Result<Option<Image<u8, 4>>, EngineError> {
        Ok(self.image.clone())
    }

    fn release(&mut self) {
        self.image = None;
    }

    fn is_active(&self) -> bool {
        self.image.is_some()
    }
}

/// A frame source backed by a live V4L2 camera.
#[cfg(feature = "gstreamer")]
pub struct CameraSource {
    capture: CameraCapture,
}

#[cfg(feature = "gstreamer")]
impl CameraSource {
    /// Open and start the camera described by the configuration.
    ///
    /// A denied or absent device surfaces here, before any render loop is
    /// started.
    pub fn open(config: V4L2CameraConfig) -> Result<Self, StreamCaptureError> {
        let mut capture = config.build()?;
        capture.start()?;
        Ok(Self { capture })
    }
}

#[cfg(feature = "gstreamer")]
impl FrameSource for CameraSource {
    fn grab(&mut self) -> Result<Option<Image<u8, 4>>, EngineError> {
        self.capture
            .grab()
            .map_err(|err| EngineError::SourceError(Box::new(err)))
    }

    fn release(&mut self) {
        if let Err(err) = self.capture.close() {
            log::warn!("failed to close camera capture: {err}");
        }
    }

    fn is_active(&self) -> bool {
        self.capture.is_running()
    }
}

/// A frame source backed by a video file.
#[cfg(feature = "gstreamer")]
pub struct VideoFileSource {
    reader: VideoReader,
}

#[cfg(feature = "gstreamer")]
impl VideoFileSource {
    /// Open and start playback of the video file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VideoReaderError> {
        let mut reader = VideoReader::new(path)?;
        reader.start()?;
        Ok(Self { reader })
    }

    /// The underlying reader, for playback queries and seeking.
    pub fn reader(&self) -> &VideoReader {
        &self.reader
    }
}

#[cfg(feature = "gstreamer")]
impl FrameSource for VideoFileSource {
    fn grab(&mut self) -> Result<Option<Image<u8, 4>>, EngineError> {
        self.reader
            .grab()
            .map_err(|err| EngineError::SourceError(Box::new(err)))
    }

    fn release(&mut self) {
        if let Err(err) = self.reader.close() {
            log::warn!("failed to close video reader: {err}");
        }
    }

    fn is_active(&self) -> bool {
        self.reader.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::StillImageSource;
    use huemask_engine::FrameSource;
    use huemask_image::{Image, ImageSize};

    #[test]
    fn still_image_source_serves_frames_until_released() {
        let image = Image::<u8, 4>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            128,
        )
        .expect("valid image");

        let mut source = StillImageSource::new(image.clone());
        assert!(source.is_active());

        let frame = source.grab().expect("grab").expect("frame");
        assert_eq!(frame, image);

        // grabbing again keeps serving the same snapshot
        assert!(source.grab().expect("grab").is_some());

        source.release();
        assert!(!source.is_active());
        assert!(source.grab().expect("grab").is_none());

        // release is idempotent
        source.release();
        assert!(!source.is_active());
    }
}
