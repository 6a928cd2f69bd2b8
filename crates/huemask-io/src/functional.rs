use std::path::Path;

use huemask_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as 8-bit RGBA.
///
/// The method tries to read any image format supported by the image crate
/// and converts the result to RGBA.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGBA image at its natural dimensions.
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let image = Image::new(
        ImageSize {
            width: width as usize,
            height: height as usize,
        },
        rgba.into_raw(),
    )?;

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::read_image_any_rgba8;
    use crate::error::IoError;

    #[test]
    fn read_png_rgba8() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("red.png");

        let buf = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        buf.save(&file_path)?;

        let img = read_image_any_rgba8(&file_path)?;
        assert_eq!(img.size().width, 3);
        assert_eq!(img.size().height, 2);
        assert_eq!(img.num_channels(), 4);
        assert_eq!(img.pixel(0, 0)?, &[255, 0, 0, 255]);

        Ok(())
    }

    #[test]
    fn read_missing_file_fails() {
        let res = read_image_any_rgba8("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }
}
