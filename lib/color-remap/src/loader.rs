use crate::{Error, Result};
use image::{DynamicImage, ImageReader, RgbaImage};
use std::path::Path;

/// Read an image from disk and normalize it to 8-bit RGBA.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let read_err = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };

    // Sniff the content so a mislabelled file still decodes.
    let reader = ImageReader::open(path)
        .map_err(read_err)?
        .with_guessed_format()
        .map_err(read_err)?;

    let image = reader.decode().map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    Ok(normalize(image))
}

/// Convert any decoded image to RGBA.
///
/// Alpha is kept when present, synthesized as 255 otherwise. Gray sources
/// have their luma copied into R, G and B. Deeper channels are scaled to 8 bits.
pub fn normalize(image: DynamicImage) -> RgbaImage {
    match image {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => {
            log::debug!("normalizing {:?} to rgba8", other.color());
            other.to_rgba8()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba};

    #[test]
    fn test_missing_file() {
        let err = load_rgba("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert_eq!(err.stage(), crate::Stage::Load);
    }

    #[test]
    fn test_corrupt_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"this is not a png")?;

        let err = load_rgba(&path).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{err:?}");
        Ok(())
    }

    #[test]
    fn test_grayscale_is_replicated() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(3, 2, Luma([77])).save(&path)?;

        let image = load_rgba(&path)?;
        assert_eq!(image.dimensions(), (3, 2));
        assert!(image.pixels().all(|p| *p == Rgba([77, 77, 77, 255])));
        Ok(())
    }

    #[test]
    fn test_rgb_gets_opaque_alpha() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("opaque.bmp");
        RgbImage::from_pixel(4, 4, Rgb([10, 20, 30])).save(&path)?;

        let image = load_rgba(&path)?;
        assert!(image.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
        Ok(())
    }

    #[test]
    fn test_alpha_is_preserved() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("alpha.png");
        let mut source = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        source.put_pixel(1, 1, Rgba([4, 5, 6, 0]));
        source.save(&path)?;

        let image = load_rgba(&path)?;
        assert_eq!(image, source);
        Ok(())
    }

    #[test]
    fn test_mislabelled_extension() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let png_path = dir.path().join("real.png");
        let jpg_path = dir.path().join("actually-png.jpg");
        RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 128])).save(&png_path)?;
        std::fs::copy(&png_path, &jpg_path)?;

        let image = load_rgba(&jpg_path)?;
        assert_eq!(*image.get_pixel(0, 0), Rgba([9, 9, 9, 128]));
        Ok(())
    }
}
