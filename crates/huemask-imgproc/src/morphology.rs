use huemask_image::{Image, ImageError};
use rayon::prelude::*;

/// Shared 3x3 neighborhood reduction with replicated borders.
fn morph_3x3(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    f: impl Fn(u8, u8) -> u8 + Send + Sync,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let cols = src.cols();
    let rows = src.rows();
    if cols == 0 || rows == 0 {
        return Ok(());
    }

    let src_data = src.as_slice();
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let ym = y.saturating_sub(1);
            let yp = (y + 1).min(rows - 1);
            for (x, out) in dst_row.iter_mut().enumerate() {
                let xm = x.saturating_sub(1);
                let xp = (x + 1).min(cols - 1);
                let mut acc = src_data[ym * cols + xm];
                for &ny in &[ym, y, yp] {
                    for &nx in &[xm, x, xp] {
                        acc = f(acc, src_data[ny * cols + nx]);
                    }
                }
                *out = acc;
            }
        });

    Ok(())
}

/// Erode a single-channel image with a 3x3 structuring element.
///
/// Each pixel is replaced by the minimum over its 3x3 neighborhood; borders
/// are replicated so regions touching the image edge keep their border
/// pixels.
///
/// # Arguments
///
/// * `src` - The input mask image.
/// * `dst` - The output mask image. Must have the same size as `src`.
pub fn erode_3x3(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    morph_3x3(src, dst, |a, b| a.min(b))
}

/// Dilate a single-channel image with a 3x3 structuring element.
///
/// Each pixel is replaced by the maximum over its 3x3 neighborhood; borders
/// are replicated.
///
/// # Arguments
///
/// * `src` - The input mask image.
/// * `dst` - The output mask image. Must have the same size as `src`.
pub fn dilate_3x3(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    morph_3x3(src, dst, |a, b| a.max(b))
}

/// Morphological opening with a 3x3 structuring element.
///
/// Applies an erosion followed by a dilation, which removes isolated
/// speckles smaller than the structuring element from a binary mask while
/// leaving larger regions intact.
///
/// # Arguments
///
/// * `src` - The input mask image.
/// * `scratch` - Working image for the intermediate erosion result.
/// * `dst` - The output mask image. All three must have the same size.
///
/// # Examples
///
/// ```
/// use huemask_image::{Image, ImageSize};
/// use huemask_imgproc::morphology::open_3x3;
///
/// let size = ImageSize { width: 5, height: 5 };
/// let mut data = vec![0u8; 5 * 5];
/// data[2 * 5 + 2] = 255; // lone speckle
/// let mask = Image::<u8, 1>::new(size, data).unwrap();
///
/// let mut scratch = Image::<u8, 1>::from_size_val(size, 0).unwrap();
/// let mut opened = Image::<u8, 1>::from_size_val(size, 0).unwrap();
/// open_3x3(&mask, &mut scratch, &mut opened).unwrap();
///
/// assert!(opened.as_slice().iter().all(|&p| p == 0));
/// ```
pub fn open_3x3(
    src: &Image<u8, 1>,
    scratch: &mut Image<u8, 1>,
    dst: &mut Image<u8, 1>,
) -> Result<(), ImageError> {
    erode_3x3(src, scratch)?;
    dilate_3x3(scratch, dst)
}

#[cfg(test)]
mod tests {
    use huemask_image::{Image, ImageError, ImageSize};

    fn mask_from(rows: &[&[u8]]) -> Result<Image<u8, 1>, ImageError> {
        let height = rows.len();
        let width = rows[0].len();
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Image::new(ImageSize { width, height }, data)
    }

    #[test]
    fn erode_shrinks_region() -> Result<(), ImageError> {
        let mask = mask_from(&[
            &[0, 0, 0, 0, 0],
            &[0, 255, 255, 255, 0],
            &[0, 255, 255, 255, 0],
            &[0, 255, 255, 255, 0],
            &[0, 0, 0, 0, 0],
        ])?;
        let mut eroded = Image::from_size_val(mask.size(), 0)?;

        super::erode_3x3(&mask, &mut eroded)?;

        // only the center of the 3x3 block survives
        for y in 0..5 {
            for x in 0..5 {
                let expected = if x == 2 && y == 2 { 255 } else { 0 };
                assert_eq!(eroded.get_pixel(x, y, 0)?, expected, "({x}, {y})");
            }
        }
        Ok(())
    }

    #[test]
    fn dilate_grows_region() -> Result<(), ImageError> {
        let mask = mask_from(&[
            &[0, 0, 0],
            &[0, 255, 0],
            &[0, 0, 0],
        ])?;
        let mut dilated = Image::from_size_val(mask.size(), 0)?;

        super::dilate_3x3(&mask, &mut dilated)?;

        assert!(dilated.as_slice().iter().all(|&p| p == 255));
        Ok(())
    }

    #[test]
    fn open_removes_speckles_keeps_blocks() -> Result<(), ImageError> {
        let mask = mask_from(&[
            &[255, 0, 0, 0, 0, 0],
            &[0, 0, 0, 255, 255, 255],
            &[0, 0, 0, 255, 255, 255],
            &[0, 255, 0, 255, 255, 255],
            &[0, 0, 0, 0, 0, 0],
        ])?;
        let mut scratch = Image::from_size_val(mask.size(), 0)?;
        let mut opened = Image::from_size_val(mask.size(), 0)?;

        super::open_3x3(&mask, &mut scratch, &mut opened)?;

        // the lone pixels vanish, the 3x3 block survives intact
        assert_eq!(opened.get_pixel(0, 0, 0)?, 0);
        assert_eq!(opened.get_pixel(1, 3, 0)?, 0);
        for y in 1..4 {
            for x in 3..6 {
                assert_eq!(opened.get_pixel(x, y, 0)?, 255, "({x}, {y})");
            }
        }
        Ok(())
    }

    #[test]
    fn open_keeps_region_touching_border() -> Result<(), ImageError> {
        // replicated borders must not erode a block flush with the edge
        let mask = mask_from(&[
            &[255, 255, 255],
            &[255, 255, 255],
            &[255, 255, 255],
        ])?;
        let mut scratch = Image::from_size_val(mask.size(), 0)?;
        let mut opened = Image::from_size_val(mask.size(), 0)?;

        super::open_3x3(&mask, &mut scratch, &mut opened)?;

        assert!(opened.as_slice().iter().all(|&p| p == 255));
        Ok(())
    }
}
