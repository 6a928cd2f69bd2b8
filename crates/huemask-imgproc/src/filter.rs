use huemask_image::{Image, ImageError};
use rayon::prelude::*;

/// Apply a 3x3 box blur to a 3-channel image.
///
/// The blur is computed as two separable passes (horizontal then vertical)
/// with replicated borders, so the output stays the same size as the input.
/// Sums are accumulated in 16 bit and divided by 9 with rounding.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image. Must have the same size as `src`.
///
/// # Examples
///
/// ```
/// use huemask_image::{Image, ImageSize};
/// use huemask_imgproc::filter::box_blur_3x3;
///
/// let image = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 4 }, 90).unwrap();
/// let mut blurred = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// box_blur_3x3(&image, &mut blurred).unwrap();
/// // a uniform image stays uniform
/// assert!(blurred.as_slice().iter().all(|&p| p == 90));
/// ```
pub fn box_blur_3x3(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
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

    let row_stride = cols * 3;
    let src_data = src.as_slice();

    // horizontal pass: per-channel sums over the clamped 3-neighborhood
    let mut hsum = vec![0u16; src_data.len()];
    hsum.par_chunks_exact_mut(row_stride)
        .zip(src_data.par_chunks_exact(row_stride))
        .for_each(|(hsum_row, src_row)| {
            for x in 0..cols {
                let xm = x.saturating_sub(1);
                let xp = (x + 1).min(cols - 1);
                for c in 0..3 {
                    hsum_row[x * 3 + c] = src_row[xm * 3 + c] as u16
                        + src_row[x * 3 + c] as u16
                        + src_row[xp * 3 + c] as u16;
                }
            }
        });

    // vertical pass over the horizontal sums
    dst.as_slice_mut()
        .par_chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let ym = y.saturating_sub(1);
            let yp = (y + 1).min(rows - 1);
            let row_m = &hsum[ym * row_stride..(ym + 1) * row_stride];
            let row_0 = &hsum[y * row_stride..(y + 1) * row_stride];
            let row_p = &hsum[yp * row_stride..(yp + 1) * row_stride];
            for (i, out) in dst_row.iter_mut().enumerate() {
                let sum = row_m[i] + row_0[i] + row_p[i];
                *out = ((sum + 4) / 9) as u8;
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use huemask_image::{Image, ImageError, ImageSize};

    #[test]
    fn box_blur_uniform_image_is_unchanged() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 5,
                height: 4,
            },
            200,
        )?;
        let mut blurred = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        super::box_blur_3x3(&image, &mut blurred)?;

        assert!(blurred.as_slice().iter().all(|&p| p == 200));
        Ok(())
    }

    #[test]
    fn box_blur_averages_neighborhood() -> Result<(), ImageError> {
        // single bright pixel in the center of a 3x3 black image spreads
        // its value over all nine outputs
        let mut data = vec![0u8; 3 * 3 * 3];
        data[(1 * 3 + 1) * 3] = 90; // center pixel, first channel
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            data,
        )?;
        let mut blurred = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        super::box_blur_3x3(&image, &mut blurred)?;

        // every output pixel sees the center exactly once: 90 / 9 = 10
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(blurred.get_pixel(x, y, 0)?, 10);
                assert_eq!(blurred.get_pixel(x, y, 1)?, 0);
            }
        }
        Ok(())
    }

    #[test]
    fn box_blur_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut blurred = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            0,
        )?;

        assert!(super::box_blur_3x3(&image, &mut blurred).is_err());
        Ok(())
    }
}
