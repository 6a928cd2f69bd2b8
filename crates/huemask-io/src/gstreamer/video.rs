use std::path::Path;
use std::time::Duration;

use gstreamer as gst;
use gstreamer::prelude::*;

use huemask_image::Image;

use crate::gstreamer::capture::StreamCapture;
use crate::gstreamer::error::StreamCaptureError;

/// An error type for the video reader.
#[derive(thiserror::Error, Debug)]
pub enum VideoReaderError {
    /// An error from the underlying capture pipeline.
    #[error(transparent)]
    StreamCaptureError(#[from] StreamCaptureError),

    /// An error occurred while seeking in the video.
    #[error("Failed to seek in the video")]
    SeekError,
}

/// A struct for reading RGBA frames from video files.
///
/// Playback is clocked by GStreamer (`sync=true`), so grabbing at display
/// rate yields frames at the video's natural speed.
pub struct VideoReader(StreamCapture);

impl VideoReader {
    /// Creates a new `VideoReader` for the given file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the video file to be read.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, VideoReaderError> {
        let pipeline = format!(
            "filesrc location=\"{}\" ! \
            decodebin ! \
            videoconvert ! \
            video/x-raw,format=RGBA ! \
            appsink name=sink sync=true",
            path.as_ref().to_string_lossy()
        );

        let capture = StreamCapture::new(&pipeline)?;

        Ok(Self(capture))
    }

    /// Starts the video reader pipeline.
    #[inline]
    pub fn start(&mut self) -> Result<(), VideoReaderError> {
        self.0.start().map_err(VideoReaderError::from)
    }

    /// Whether the reader pipeline is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.0.is_running()
    }

    /// Grabs the most recent decoded frame.
    ///
    /// # Returns
    ///
    /// An Option containing the frame, or None if no new frame was decoded
    /// since the last grab (or the stream ended).
    #[inline]
    pub fn grab(&mut self) -> Result<Option<Image<u8, 4>>, VideoReaderError> {
        self.0.grab().map_err(VideoReaderError::from)
    }

    /// Closes the video reader pipeline.
    #[inline]
    pub fn close(&mut self) -> Result<(), VideoReaderError> {
        self.0.close().map_err(VideoReaderError::from)
    }

    /// The frame rate of the video, if known yet.
    #[inline]
    pub fn fps(&self) -> Option<f64> {
        self.0.fps()
    }

    /// The current playback position, if known.
    pub fn pos(&self) -> Option<Duration> {
        let clock_time = self
            .0
            .pipeline
            .query_position::<gst::format::ClockTime>()?;
        Some(Duration::from_nanos(clock_time.nseconds()))
    }

    /// The total duration of the video, if known.
    pub fn duration(&self) -> Option<Duration> {
        let clock_time = self
            .0
            .pipeline
            .query_duration::<gst::format::ClockTime>()?;
        Some(Duration::from_nanos(clock_time.nseconds()))
    }

    /// Seeks to a position measured from the start of the video.
    pub fn seek(&self, pos: Duration) -> Result<(), VideoReaderError> {
        let clock_time = gst::ClockTime::from_nseconds(pos.as_nanos() as u64);
        self.0
            .pipeline
            .seek_simple(
                gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
                clock_time,
            )
            .map_err(|_| VideoReaderError::SeekError)
    }
}
