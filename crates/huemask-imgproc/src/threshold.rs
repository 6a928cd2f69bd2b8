use crate::parallel;
use huemask_image::{Image, ImageError};

/// Apply a range threshold to an image.
///
/// A mask pixel is set to 255 iff every channel of the source pixel lies
/// inside the corresponding closed interval `[lower_bound, upper_bound]`,
/// and to 0 otherwise. If a lower bound exceeds its upper bound no pixel can
/// satisfy that channel and the mask comes out all zero; this is a valid
/// request, not an error.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels.
/// * `dst` - The output single channel mask image.
/// * `lower_bound` - The lower bound for each channel, inclusive.
/// * `upper_bound` - The upper bound for each channel, inclusive.
///
/// # Examples
///
/// ```
/// use huemask_image::{Image, ImageSize};
/// use huemask_imgproc::threshold::in_range;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<u8, 3>::new(ImageSize { width: 2, height: 1 }, data).unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// in_range(&image, &mut mask, &[100, 150, 0], &[200, 250, 255]).unwrap();
/// assert_eq!(mask.as_slice(), &[255, 255]);
/// ```
pub fn in_range<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<u8, 1>,
    lower_bound: &[T; C],
    upper_bound: &[T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let mut is_in_range = true;
        src_pixel
            .iter()
            .zip(lower_bound.iter().zip(upper_bound.iter()))
            .for_each(|(src_val, (lower, upper))| {
                is_in_range &= src_val >= lower && src_val <= upper;
            });
        dst_pixel[0] = if is_in_range { 255 } else { 0 };
    });

    Ok(())
}
