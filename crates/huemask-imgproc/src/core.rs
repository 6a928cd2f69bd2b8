use crate::parallel;
use huemask_image::{Image, ImageError};

/// Copy the source pixels selected by a mask into the destination image.
///
/// Pixels whose mask value is non-zero are copied verbatim; the remaining
/// pixels are set to opaque black. Useful to visualize which parts of an
/// image a mask selects.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `mask` - The single channel selection mask.
/// * `dst` - The output RGBA image. All three must have the same size.
///
/// # Examples
///
/// ```
/// use huemask_image::{Image, ImageSize};
/// use huemask_imgproc::core::apply_mask;
///
/// let size = ImageSize { width: 2, height: 1 };
/// let image = Image::<u8, 4>::new(size, vec![10, 20, 30, 255, 40, 50, 60, 255]).unwrap();
/// let mask = Image::<u8, 1>::new(size, vec![255, 0]).unwrap();
/// let mut out = Image::<u8, 4>::from_size_val(size, 0).unwrap();
///
/// apply_mask(&image, &mask, &mut out).unwrap();
/// assert_eq!(out.as_slice(), &[10, 20, 30, 255, 0, 0, 0, 255]);
/// ```
pub fn apply_mask(
    src: &Image<u8, 4>,
    mask: &Image<u8, 1>,
    dst: &mut Image<u8, 4>,
) -> Result<(), ImageError> {
    if src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_two(src, mask, dst, |src_pixel, mask_pixel, dst_pixel| {
        if mask_pixel[0] != 0 {
            dst_pixel.copy_from_slice(src_pixel);
        } else {
            dst_pixel.copy_from_slice(&[0, 0, 0, 255]);
        }
    });

    Ok(())
}
