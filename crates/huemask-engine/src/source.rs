use huemask_image::Image;

use crate::error::EngineError;

/// A source of RGBA snapshots consumed by the render loop.
///
/// Implementations normalize a camera stream, a video file or a still image
/// into on-demand snapshots at their intrinsic pixel dimensions.
pub trait FrameSource {
    /// Return the most recent decoded frame, or `Ok(None)` when no frame is
    /// ready yet (e.g. media still loading). A not-ready source is retried on
    /// the next tick and is never an error.
    fn grab(&mut self) -> Result<Option<Image<u8, 4>>, EngineError>;

    /// Tear down the source and release any acquired device.
    ///
    /// Must be idempotent; after a release [`FrameSource::grab`] is not
    /// called again by the render loop.
    fn release(&mut self);

    /// Whether the source still holds its underlying media handle.
    fn is_active(&self) -> bool;
}

/// A shared handle to a source.
///
/// Lets the host keep a handle to a source it handed to the render loop, for
/// source-specific controls such as video seeking. The loop and the host run
/// on the same thread, so the interior mutability is never contended.
impl<S: FrameSource> FrameSource for std::rc::Rc<std::cell::RefCell<S>> {
    fn grab(&mut self) -> Result<Option<Image<u8, 4>>, EngineError> {
        self.borrow_mut().grab()
    }

    fn release(&mut self) {
        self.borrow_mut().release()
    }

    fn is_active(&self) -> bool {
        self.borrow().is_active()
    }
}
