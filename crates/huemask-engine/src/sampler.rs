use huemask_image::Image;
use huemask_imgproc::color;

use crate::error::EngineError;

/// The HSV readout of a single sampled pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyedropSample {
    /// Sampled x coordinate in source pixels.
    pub x: usize,
    /// Sampled y coordinate in source pixels.
    pub y: usize,
    /// Hue in [0, 179].
    pub h: u8,
    /// Saturation in [0, 255].
    pub s: u8,
    /// Value in [0, 255].
    pub v: u8,
}

impl std::fmt::Display for EyedropSample {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "({}, {})  H {}  S {}  V {}",
            self.x, self.y, self.h, self.s, self.v
        )
    }
}

/// Map a display coordinate to its source pixel position.
///
/// Scales linearly with floor and clamps into [0, len - 1], so clicks on the
/// right or bottom display edge (or outside the element) stay in bounds.
fn to_source_coord(click: f32, display_len: f32, source_len: usize) -> usize {
    if source_len == 0 {
        return 0;
    }
    if display_len <= 0.0 {
        return 0;
    }
    let scaled = (click * source_len as f32 / display_len).floor();
    if scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(source_len - 1)
    }
}

/// Sample the HSV value of the source pixel under a display click.
///
/// The click coordinate is given in the coordinate space of the rendered
/// (possibly scaled) display element of size `display_w` x `display_h`; it is
/// mapped to source pixels by linear scaling and clamped to the image bounds.
/// Sampling has no side effects and is idempotent for an unchanged snapshot.
///
/// # Errors
///
/// Returns an error only when the snapshot has no pixels.
///
/// # Examples
///
/// ```
/// use huemask_engine::sampler::sample;
/// use huemask_image::{Image, ImageSize};
///
/// let red = Image::<u8, 4>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![255, 0, 0, 255].repeat(4),
/// )
/// .unwrap();
///
/// let s = sample(&red, 1.0, 1.0, 2.0, 2.0).unwrap();
/// assert_eq!((s.x, s.y), (1, 1));
/// assert_eq!((s.h, s.s, s.v), (0, 255, 255));
/// ```
pub fn sample(
    snapshot: &Image<u8, 4>,
    click_x: f32,
    click_y: f32,
    display_w: f32,
    display_h: f32,
) -> Result<EyedropSample, EngineError> {
    let x = to_source_coord(click_x, display_w, snapshot.width());
    let y = to_source_coord(click_y, display_h, snapshot.height());

    let pixel = snapshot.pixel(x, y)?;
    let [h, s, v] = color::rgba_pixel_to_hsv([pixel[0], pixel[1], pixel[2], pixel[3]]);

    Ok(EyedropSample { x, y, h, s, v })
}

#[cfg(test)]
mod tests {
    use super::sample;
    use crate::error::EngineError;
    use huemask_image::{Image, ImageSize};

    fn gradient_image() -> Image<u8, 4> {
        // 200x200 image whose red channel encodes x / 2 and green y / 2
        let size = ImageSize {
            width: 200,
            height: 200,
        };
        let mut data = Vec::with_capacity(200 * 200 * 4);
        for y in 0..200u32 {
            for x in 0..200u32 {
                data.extend_from_slice(&[(x / 2) as u8, (y / 2) as u8, 0, 255]);
            }
        }
        Image::new(size, data).expect("valid image")
    }

    #[test]
    fn center_click_on_downscaled_display() -> Result<(), EngineError> {
        let image = gradient_image();

        // 100x100 display showing the 200x200 source; the exact center maps
        // to source pixel (100, 100) within rounding
        let s = sample(&image, 50.0, 50.0, 100.0, 100.0)?;
        assert!((s.x as i64 - 100).abs() <= 1, "x = {}", s.x);
        assert!((s.y as i64 - 100).abs() <= 1, "y = {}", s.y);
        Ok(())
    }

    #[test]
    fn sampling_is_idempotent() -> Result<(), EngineError> {
        let image = gradient_image();

        let first = sample(&image, 33.3, 66.6, 150.0, 150.0)?;
        for _ in 0..5 {
            assert_eq!(sample(&image, 33.3, 66.6, 150.0, 150.0)?, first);
        }
        Ok(())
    }

    #[test]
    fn clicks_outside_display_are_clamped() -> Result<(), EngineError> {
        let image = gradient_image();

        let s = sample(&image, -10.0, 500.0, 100.0, 100.0)?;
        assert_eq!((s.x, s.y), (0, 199));

        let s = sample(&image, 100.0, 100.0, 100.0, 100.0)?;
        assert_eq!((s.x, s.y), (199, 199));
        Ok(())
    }

    #[test]
    fn reads_the_expected_pixel_value() -> Result<(), EngineError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        // left pixel pure red, right pixel pure blue
        let image = Image::<u8, 4>::new(size, vec![255, 0, 0, 255, 0, 0, 255, 255])?;

        let left = sample(&image, 10.0, 5.0, 100.0, 10.0)?;
        assert_eq!((left.h, left.s, left.v), (0, 255, 255));

        let right = sample(&image, 90.0, 5.0, 100.0, 10.0)?;
        assert_eq!((right.h, right.s, right.v), (120, 255, 255));
        Ok(())
    }

    #[test]
    fn degenerate_display_size_clamps_to_first_pixel() -> Result<(), EngineError> {
        let image = gradient_image();
        let s = sample(&image, 10.0, 10.0, 0.0, 0.0)?;
        assert_eq!((s.x, s.y), (0, 0));
        Ok(())
    }

    #[test]
    fn empty_snapshot_is_an_error() {
        let image = Image::<u8, 4>::new(
            ImageSize {
                width: 0,
                height: 0,
            },
            vec![],
        )
        .expect("empty image");
        assert!(sample(&image, 0.0, 0.0, 10.0, 10.0).is_err());
    }
}
