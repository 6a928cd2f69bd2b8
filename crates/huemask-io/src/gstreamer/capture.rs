use std::sync::{Arc, Mutex};

use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;

use huemask_image::{Image, ImageSize};

use crate::gstreamer::error::StreamCaptureError;

/// Represents an RGBA stream capture pipeline using GStreamer.
///
/// Frames arrive on GStreamer's streaming thread and are parked in a
/// single-slot buffer; [`StreamCapture::grab`] is a non-blocking take of
/// that slot, so a caller polling at display rate sees the most recent
/// decoded frame or `None` when nothing new arrived.
pub struct StreamCapture {
    pub(crate) pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
    last_frame: Arc<Mutex<Option<Image<u8, 4>>>>,
    running: bool,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl StreamCapture {
    /// Creates a new StreamCapture instance with the given pipeline description.
    ///
    /// The description must contain an appsink named `sink` negotiating RGBA.
    ///
    /// # Arguments
    ///
    /// * `pipeline_desc` - A string describing the GStreamer pipeline.
    pub fn new(pipeline_desc: &str) -> Result<Self, StreamCaptureError> {
        gst::init()?;

        log::debug!("capture pipeline: {pipeline_desc}");

        let pipeline = gst::parse::launch(pipeline_desc)?
            .dynamic_cast::<gst::Pipeline>()
            .map_err(StreamCaptureError::DowncastPipelineError)?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or(StreamCaptureError::GetElementByNameError)?
            .dynamic_cast::<gst_app::AppSink>()
            .map_err(StreamCaptureError::DowncastPipelineError)?;

        let last_frame = Arc::new(Mutex::new(None));

        appsink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample({
                    let last_frame = last_frame.clone();
                    move |sink| match Self::extract_image_frame(sink) {
                        Ok(frame) => {
                            let mut slot = last_frame.lock().map_err(|_| gst::FlowError::Error)?;
                            *slot = Some(frame);
                            Ok(gst::FlowSuccess::Ok)
                        }
                        Err(_) => Err(gst::FlowError::Error),
                    }
                })
                .build(),
        );

        Ok(Self {
            pipeline,
            appsink,
            last_frame,
            running: false,
            handle: None,
        })
    }

    /// Starts the capture pipeline and processes messages on the bus.
    pub fn start(&mut self) -> Result<(), StreamCaptureError> {
        self.pipeline.set_state(gst::State::Playing)?;
        self.running = true;

        let bus = self.pipeline.bus().ok_or(StreamCaptureError::BusError)?;

        let handle = std::thread::spawn(move || {
            for msg in bus.iter_timed(gst::ClockTime::NONE) {
                use gst::MessageView;
                match msg.view() {
                    MessageView::Eos(..) => {
                        log::debug!("capture pipeline reached end of stream");
                        break;
                    }
                    MessageView::Error(err) => {
                        log::error!(
                            "capture pipeline error from {:?}: {} ({:?})",
                            msg.src().map(|s| s.path_string()),
                            err.error(),
                            err.debug()
                        );
                        break;
                    }
                    _ => (),
                }
            }
        });

        self.handle = Some(handle);

        Ok(())
    }

    /// Whether the pipeline is currently running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Grabs the most recent captured frame.
    ///
    /// # Returns
    ///
    /// An Option containing the frame, or None if no new frame arrived since
    /// the last grab.
    pub fn grab(&mut self) -> Result<Option<Image<u8, 4>>, StreamCaptureError> {
        if !self.running {
            return Err(StreamCaptureError::PipelineNotRunning);
        }

        let mut slot = self
            .last_frame
            .lock()
            .map_err(|_| StreamCaptureError::GetBufferError)?;
        Ok(slot.take())
    }

    /// The negotiated frame rate of the stream, if known yet.
    pub fn fps(&self) -> Option<f64> {
        let pad = self.appsink.static_pad("sink")?;
        let caps = pad.current_caps()?;
        let structure = caps.structure(0)?;
        let framerate = structure.get::<gst::Fraction>("framerate").ok()?;
        if framerate.denom() == 0 {
            return None;
        }
        Some(framerate.numer() as f64 / framerate.denom() as f64)
    }

    /// Closes the capture pipeline and releases the underlying device.
    ///
    /// Idempotent: closing an already closed capture is a no-op.
    pub fn close(&mut self) -> Result<(), StreamCaptureError> {
        if !self.running {
            return Ok(());
        }
        self.running = false;

        if !self.pipeline.send_event(gst::event::Eos::new()) {
            return Err(StreamCaptureError::SendEosError);
        }

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        self.pipeline.set_state(gst::State::Null)?;
        Ok(())
    }

    /// Extracts an RGBA image frame from the appsink.
    fn extract_image_frame(appsink: &gst_app::AppSink) -> Result<Image<u8, 4>, StreamCaptureError> {
        let sample = appsink.pull_sample()?;

        let caps = sample
            .caps()
            .ok_or_else(|| StreamCaptureError::GetCapsError("no caps on sample".to_string()))?;

        let structure = caps
            .structure(0)
            .ok_or_else(|| StreamCaptureError::GetCapsError("no caps structure".to_string()))?;

        let width = structure
            .get::<i32>("width")
            .map_err(|e| StreamCaptureError::GetCapsError(e.to_string()))? as usize;

        let height = structure
            .get::<i32>("height")
            .map_err(|e| StreamCaptureError::GetCapsError(e.to_string()))? as usize;

        let buffer = sample
            .buffer()
            .ok_or(StreamCaptureError::GetBufferError)?
            .map_readable()?;

        let data = buffer.as_slice();
        if data.len() != width * height * 4 {
            return Err(StreamCaptureError::InvalidImageFormat(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                width * height * 4,
                width,
                height,
                data.len()
            )));
        }

        Image::new(ImageSize { width, height }, data.to_vec())
            .map_err(|_| StreamCaptureError::CreateImageFrameError)
    }
}

impl Drop for StreamCapture {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::error!("failed to close capture pipeline: {err}");
        }
    }
}
