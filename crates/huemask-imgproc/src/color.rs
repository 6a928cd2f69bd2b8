use crate::parallel;
use huemask_image::{Image, ImageError};

/// Convert a single RGBA pixel to its 8-bit HSV representation.
///
/// The alpha channel is ignored. The hue is quantized to [0, 179] (half
/// degrees, the 8-bit HSV convention), saturation and value to [0, 255].
///
/// # Example
///
/// ```
/// use huemask_imgproc::color::rgba_pixel_to_hsv;
///
/// assert_eq!(rgba_pixel_to_hsv([255, 0, 0, 255]), [0, 255, 255]);
/// assert_eq!(rgba_pixel_to_hsv([0, 255, 0, 255]), [60, 255, 255]);
/// assert_eq!(rgba_pixel_to_hsv([0, 0, 255, 255]), [120, 255, 255]);
/// ```
pub fn rgba_pixel_to_hsv(pixel: [u8; 4]) -> [u8; 3] {
    let r = pixel[0] as f32 / 255.0;
    let g = pixel[1] as f32 / 255.0;
    let b = pixel[2] as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    // ensure h is in the range [0, 360)
    let h = if h < 0.0 { h + 360.0 } else { h };

    // half degrees; 180 wraps back to 0
    let h = ((h * 0.5).round() as u16 % 180) as u8;

    let s = if max == 0.0 {
        0
    } else {
        ((delta / max) * 255.0).round() as u8
    };

    let v = (max * 255.0).round() as u8;

    [h, s, v]
}

/// Convert an RGBA image to an HSV image.
///
/// The input image is assumed to have 4 channels in the order R, G, B, A;
/// the alpha channel is ignored.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output HSV image.
///
/// # Returns
///
/// The HSV image with the following channels:
///
/// * H: The hue channel in the range [0, 179] (half degrees).
/// * S: The saturation channel in the range [0, 255].
/// * V: The value channel in the range [0, 255].
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use huemask_image::{Image, ImageSize};
/// use huemask_imgproc::color::hsv_from_rgba;
///
/// let image = Image::<u8, 4>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5 * 4],
/// )
/// .unwrap();
///
/// let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// hsv_from_rgba(&image, &mut hsv).unwrap();
///
/// assert_eq!(hsv.num_channels(), 3);
/// assert_eq!(hsv.size().width, 4);
/// assert_eq!(hsv.size().height, 5);
/// ```
pub fn hsv_from_rgba(src: &Image<u8, 4>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let hsv = rgba_pixel_to_hsv([src_pixel[0], src_pixel[1], src_pixel[2], src_pixel[3]]);
        dst_pixel.copy_from_slice(&hsv);
    });

    Ok(())
}
