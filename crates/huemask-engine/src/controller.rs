use huemask_image::Image;

use crate::pipeline::MaskPipeline;
use crate::sampler::{self, EyedropSample};
use crate::source::FrameSource;
use crate::state::{HsvRange, PipelineOptions};

/// The lifecycle state of the render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// No source attached, ticks do nothing.
    Stopped,
    /// A source is attached and ticks drive the pipeline.
    Running,
}

/// The result of a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A fresh frame was grabbed and its mask computed.
    Rendered,
    /// The source had no decoded frame yet; retried on the next tick.
    NotReady,
    /// The loop is stopped; nothing was done.
    Idle,
    /// A failure occurred during this tick and the loop transitioned to
    /// stopped. The failure is logged, previous output is kept.
    Stopped,
}

/// Drives the frame source and the mask pipeline in lockstep with the host's
/// repaint callback.
///
/// The host calls [`RenderLoop::tick`] once per display refresh; exactly one
/// source-grab plus pipeline invocation runs per tick, synchronously, so ticks
/// never overlap and the retained frame and mask always belong to the most
/// recently completed tick. Range and option values are read fresh on every
/// tick, so control changes take effect on the next tick without restarting
/// the loop.
///
/// Stopping releases the attached source (for a camera this stops the
/// capture) and guarantees no further pipeline invocation until a new source
/// is started.
pub struct RenderLoop {
    state: LoopState,
    source: Option<Box<dyn FrameSource>>,
    pipeline: MaskPipeline,
    frame: Option<Image<u8, 4>>,
    mask: Option<Image<u8, 1>>,
}

impl RenderLoop {
    /// Create a stopped render loop with no source attached.
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            source: None,
            pipeline: MaskPipeline::new(),
            frame: None,
            mask: None,
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether the loop is currently running.
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Attach a new source and enter the running state.
    ///
    /// Any previously attached source is released first, so switching from a
    /// camera to an uploaded file stops the camera capture. The retained
    /// frame and mask of the previous source are dropped.
    pub fn start(&mut self, source: Box<dyn FrameSource>) {
        self.release_source();
        self.frame = None;
        self.mask = None;
        self.source = Some(source);
        self.state = LoopState::Running;
    }

    /// Release the attached source and enter the stopped state.
    ///
    /// The most recently rendered frame and mask stay available for display.
    pub fn stop(&mut self) {
        self.release_source();
        self.state = LoopState::Stopped;
    }

    fn release_source(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
    }

    /// Run one tick: grab a snapshot and compute its mask.
    ///
    /// A not-ready source defers silently to the next tick. Any source or
    /// pipeline failure is logged, the source is released and the loop
    /// transitions to stopped; the previously rendered output is kept so no
    /// partial mask is ever displayed.
    pub fn tick(&mut self, range: &HsvRange, options: &PipelineOptions) -> TickOutcome {
        if self.state != LoopState::Running {
            return TickOutcome::Idle;
        }

        let Some(source) = self.source.as_mut() else {
            self.state = LoopState::Stopped;
            return TickOutcome::Idle;
        };

        let frame = match source.grab() {
            Ok(Some(frame)) => frame,
            Ok(None) => return TickOutcome::NotReady,
            Err(err) => {
                log::error!("frame source failed: {err}");
                self.stop();
                return TickOutcome::Stopped;
            }
        };

        match self.pipeline.compute(&frame, range, options) {
            Ok(mask) => {
                self.mask = Some(mask.clone());
                self.frame = Some(frame);
                TickOutcome::Rendered
            }
            Err(err) => {
                log::error!("mask pipeline failed: {err}");
                self.stop();
                TickOutcome::Stopped
            }
        }
    }

    /// The snapshot of the most recently completed tick.
    pub fn current_frame(&self) -> Option<&Image<u8, 4>> {
        self.frame.as_ref()
    }

    /// The mask of the most recently completed tick.
    pub fn current_mask(&self) -> Option<&Image<u8, 1>> {
        self.mask.as_ref()
    }

    /// Eyedrop the displayed frame at a display coordinate.
    ///
    /// Returns `None` when no frame has been rendered yet.
    pub fn sample(
        &self,
        click_x: f32,
        click_y: f32,
        display_w: f32,
        display_h: f32,
    ) -> Option<EyedropSample> {
        let frame = self.frame.as_ref()?;
        sampler::sample(frame, click_x, click_y, display_w, display_h).ok()
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{LoopState, RenderLoop, TickOutcome};
    use crate::error::EngineError;
    use crate::source::FrameSource;
    use crate::state::{HsvRange, PipelineOptions};
    use huemask_image::{Image, ImageSize};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records how often it was grabbed and whether it was released.
    #[derive(Default)]
    struct SourceProbe {
        grabs: usize,
        released: bool,
    }

    enum Feed {
        Frame([u8; 4]),
        NotReady,
        Fail,
    }

    struct FakeSource {
        probe: Rc<RefCell<SourceProbe>>,
        feed: Feed,
        size: ImageSize,
    }

    impl FakeSource {
        fn new(feed: Feed) -> (Self, Rc<RefCell<SourceProbe>>) {
            let probe = Rc::new(RefCell::new(SourceProbe::default()));
            (
                Self {
                    probe: probe.clone(),
                    feed,
                    size: ImageSize {
                        width: 4,
                        height: 4,
                    },
                },
                probe,
            )
        }
    }

    impl FrameSource for FakeSource {
        fn grab(&mut self) -> Result<Option<Image<u8, 4>>, EngineError> {
            self.probe.borrow_mut().grabs += 1;
            match self.feed {
                Feed::Frame(pixel) => Ok(Some(
                    Image::new(self.size, pixel.repeat(self.size.width * self.size.height))
                        .expect("valid image"),
                )),
                Feed::NotReady => Ok(None),
                Feed::Fail => Err(EngineError::SourceError("device lost".into())),
            }
        }

        fn release(&mut self) {
            self.probe.borrow_mut().released = true;
        }

        fn is_active(&self) -> bool {
            !self.probe.borrow().released
        }
    }

    #[test]
    fn tick_renders_frame_and_mask() {
        let (source, _) = FakeSource::new(Feed::Frame([255, 0, 0, 255]));
        let mut render_loop = RenderLoop::new();
        render_loop.start(Box::new(source));

        let outcome = render_loop.tick(&HsvRange::default(), &PipelineOptions::default());

        assert_eq!(outcome, TickOutcome::Rendered);
        let mask = render_loop.current_mask().expect("mask after tick");
        assert!(mask.as_slice().iter().all(|&p| p == 255));
        assert_eq!(
            render_loop.current_frame().map(|f| f.size()),
            Some(mask.size())
        );
    }

    #[test]
    fn not_ready_source_defers_and_keeps_output() {
        let (source, _) = FakeSource::new(Feed::Frame([255, 0, 0, 255]));
        let mut render_loop = RenderLoop::new();
        render_loop.start(Box::new(source));
        render_loop.tick(&HsvRange::default(), &PipelineOptions::default());

        // switching feeds mid-run is easiest with a fresh loop; instead keep
        // the same loop and verify NotReady on a second loop run
        let (source, _) = FakeSource::new(Feed::NotReady);
        let mut waiting_loop = RenderLoop::new();
        waiting_loop.start(Box::new(source));

        assert_eq!(
            waiting_loop.tick(&HsvRange::default(), &PipelineOptions::default()),
            TickOutcome::NotReady
        );
        assert!(waiting_loop.is_running());
        assert!(waiting_loop.current_mask().is_none());
    }

    #[test]
    fn stop_releases_source_and_blocks_further_grabs() {
        let (source, probe) = FakeSource::new(Feed::Frame([255, 0, 0, 255]));
        let mut render_loop = RenderLoop::new();
        render_loop.start(Box::new(source));
        render_loop.tick(&HsvRange::default(), &PipelineOptions::default());

        render_loop.stop();
        assert_eq!(render_loop.state(), LoopState::Stopped);
        assert!(probe.borrow().released);

        let grabs_at_stop = probe.borrow().grabs;
        for _ in 0..3 {
            assert_eq!(
                render_loop.tick(&HsvRange::default(), &PipelineOptions::default()),
                TickOutcome::Idle
            );
        }
        assert_eq!(probe.borrow().grabs, grabs_at_stop);

        // the last rendered output survives the stop
        assert!(render_loop.current_mask().is_some());
    }

    #[test]
    fn source_failure_stops_loop_and_releases() {
        let (source, probe) = FakeSource::new(Feed::Fail);
        let mut render_loop = RenderLoop::new();
        render_loop.start(Box::new(source));

        assert_eq!(
            render_loop.tick(&HsvRange::default(), &PipelineOptions::default()),
            TickOutcome::Stopped
        );
        assert_eq!(render_loop.state(), LoopState::Stopped);
        assert!(probe.borrow().released);
    }

    #[test]
    fn starting_new_source_releases_previous() {
        let (camera, camera_probe) = FakeSource::new(Feed::Frame([255, 0, 0, 255]));
        let mut render_loop = RenderLoop::new();
        render_loop.start(Box::new(camera));
        render_loop.tick(&HsvRange::default(), &PipelineOptions::default());

        let (upload, _) = FakeSource::new(Feed::Frame([0, 255, 0, 255]));
        render_loop.start(Box::new(upload));

        assert!(camera_probe.borrow().released);
        assert!(render_loop.is_running());
        // the previous source's output was dropped with it
        assert!(render_loop.current_frame().is_none());
    }

    #[test]
    fn parameter_changes_apply_on_next_tick() {
        let (source, _) = FakeSource::new(Feed::Frame([255, 0, 0, 255]));
        let mut render_loop = RenderLoop::new();
        render_loop.start(Box::new(source));

        let mut range = HsvRange::default();
        render_loop.tick(&range, &PipelineOptions::default());
        assert!(render_loop
            .current_mask()
            .expect("mask")
            .as_slice()
            .iter()
            .all(|&p| p == 255));

        // narrow the band to green; the running loop picks it up without a
        // restart
        range.h_min = 60;
        range.h_max = 120;
        render_loop.tick(&range, &PipelineOptions::default());
        assert!(render_loop
            .current_mask()
            .expect("mask")
            .as_slice()
            .iter()
            .all(|&p| p == 0));
    }

    #[test]
    fn sample_uses_latest_frame() {
        let (source, _) = FakeSource::new(Feed::Frame([0, 0, 255, 255]));
        let mut render_loop = RenderLoop::new();
        render_loop.start(Box::new(source));

        assert!(render_loop.sample(1.0, 1.0, 4.0, 4.0).is_none());

        render_loop.tick(&HsvRange::default(), &PipelineOptions::default());
        let sample = render_loop.sample(1.0, 1.0, 4.0, 4.0).expect("sample");
        assert_eq!((sample.h, sample.s, sample.v), (120, 255, 255));
    }
}
