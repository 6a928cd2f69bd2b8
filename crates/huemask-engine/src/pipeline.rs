use huemask_image::{Image, ImageSize};
use huemask_imgproc::{color, filter, morphology, threshold};

use crate::error::EngineError;
use crate::state::{HsvRange, PipelineOptions};

/// Computes a binary in-range mask from an RGBA snapshot.
///
/// The computation is a fixed four-step transform:
///
/// 1. convert the snapshot to 8-bit HSV (H in [0, 179]),
/// 2. optionally smooth the HSV image with a 3x3 box blur,
/// 3. threshold every pixel against the inclusive [`HsvRange`] box,
/// 4. optionally clean the mask with a 3x3 morphological opening.
///
/// The result is a pure function of (snapshot, range, options). The struct
/// only holds working buffers so repeated per-frame calls do not reallocate;
/// the buffers are resized whenever the snapshot dimensions change, so the
/// returned mask always matches the snapshot size.
///
/// # Examples
///
/// ```
/// use huemask_engine::{HsvRange, MaskPipeline, PipelineOptions};
/// use huemask_image::{Image, ImageSize};
///
/// let red = Image::<u8, 4>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![255, 0, 0, 255].repeat(4),
/// )
/// .unwrap();
///
/// let mut pipeline = MaskPipeline::new();
/// let mask = pipeline
///     .compute(&red, &HsvRange::default(), &PipelineOptions::default())
///     .unwrap();
///
/// assert!(mask.as_slice().iter().all(|&p| p == 255));
/// ```
pub struct MaskPipeline {
    hsv: Image<u8, 3>,
    smoothed: Image<u8, 3>,
    scratch: Image<u8, 1>,
    mask: Image<u8, 1>,
}

const EMPTY: ImageSize = ImageSize {
    width: 0,
    height: 0,
};

impl MaskPipeline {
    /// Create a pipeline with empty working buffers.
    pub fn new() -> Self {
        Self {
            hsv: Image::new(EMPTY, vec![]).expect("empty image"),
            smoothed: Image::new(EMPTY, vec![]).expect("empty image"),
            scratch: Image::new(EMPTY, vec![]).expect("empty image"),
            mask: Image::new(EMPTY, vec![]).expect("empty image"),
        }
    }

    /// Resize the working buffers when the snapshot dimensions change.
    fn ensure_buffers(&mut self, size: ImageSize) -> Result<(), EngineError> {
        if self.hsv.size() != size {
            self.hsv = Image::from_size_val(size, 0)?;
            self.smoothed = Image::from_size_val(size, 0)?;
            self.scratch = Image::from_size_val(size, 0)?;
            self.mask = Image::from_size_val(size, 0)?;
        }
        Ok(())
    }

    /// Compute the in-range mask for a snapshot.
    ///
    /// Returns a borrow of the internal mask buffer; it stays valid until the
    /// next call and always has the snapshot's dimensions.
    pub fn compute(
        &mut self,
        snapshot: &Image<u8, 4>,
        range: &HsvRange,
        options: &PipelineOptions,
    ) -> Result<&Image<u8, 1>, EngineError> {
        self.ensure_buffers(snapshot.size())?;

        color::hsv_from_rgba(snapshot, &mut self.hsv)?;

        let hsv = if options.blur {
            filter::box_blur_3x3(&self.hsv, &mut self.smoothed)?;
            &self.smoothed
        } else {
            &self.hsv
        };

        threshold::in_range(hsv, &mut self.mask, &range.lower(), &range.upper())?;

        if options.morphology {
            morphology::erode_3x3(&self.mask, &mut self.scratch)?;
            morphology::dilate_3x3(&self.scratch, &mut self.mask)?;
        }

        Ok(&self.mask)
    }
}

impl Default for MaskPipeline {
    fn default() -> Self {
        Self::new()
    }
}
