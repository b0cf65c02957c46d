use crate::{Color, Error, Mask, Result};
use derivative::Derivative;
use derive_setters::Setters;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use std::{
    fs::Permissions,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Output encoding options
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SaveOptions {
    /// Color transparent pixels are composited over when the output format
    /// has no alpha channel.
    #[derivative(Default(value = "Color::WHITE"))]
    pub flatten_background: Color,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Formats whose encoders cannot take an alpha channel.
pub fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Pnm | ImageFormat::Hdr)
}

/// Alpha-composite `image` over an opaque `background`.
pub fn flatten(image: &RgbaImage, background: Color) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let alpha = pixel[3] as u32;
        let blend =
            |fg: u8, bg: u8| ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8;

        Rgb([
            blend(pixel[0], background.r),
            blend(pixel[1], background.g),
            blend(pixel[2], background.b),
        ])
    })
}

/// An encoded image waiting in a temporary file next to its destination.
///
/// Nothing is visible at the destination until [`persist`](Self::persist).
/// Dropping it removes the temporary file.
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
    path: PathBuf,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the encoded file over the destination.
    pub fn persist(self) -> Result<()> {
        let path = self.path;
        self.file.persist(&path).map_err(|e| Error::Io {
            path: path.clone(),
            source: e.error,
        })?;

        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

/// Encode `image` to `path`, picking the format from the extension.
///
/// The image is written to a temporary file next to `path` and renamed into
/// place, so a failed save never leaves a truncated or half-replaced file.
pub fn save_rgba<P: AsRef<Path>>(image: &RgbaImage, path: P, options: &SaveOptions) -> Result<()> {
    stage_rgba(image, path, options)?.persist()
}

/// Encode `image` for `path` without touching `path` yet.
pub fn stage_rgba<P: AsRef<Path>>(
    image: &RgbaImage,
    path: P,
    options: &SaveOptions,
) -> Result<StagedImage> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(|e| {
        io_err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot infer output format: {e}"),
        ))
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if !dir.is_dir() {
        return Err(io_err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("output directory does not exist: {}", dir.display()),
        )));
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix(".color-remap-").suffix(".tmp");
    if let Some(permissions) = output_permissions(path) {
        builder.permissions(permissions);
    }
    let mut tmp = builder.tempfile_in(dir).map_err(io_err)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let encoded = if supports_alpha(format) {
            image.write_to(&mut writer, format)
        } else {
            log::debug!(
                "{format:?} has no alpha channel, flattening over {}",
                options.flatten_background.to_hex()
            );
            flatten(image, options.flatten_background).write_to(&mut writer, format)
        };

        encoded.map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(io_err)?;
    }

    log::debug!("encoded {:?} image for {}", format, path.display());
    Ok(StagedImage {
        file: tmp,
        path: path.to_path_buf(),
    })
}

/// Mode for the temporary file: an existing output keeps its mode, a new one
/// gets `0o666` minus the umask like any other created file.
#[cfg(unix)]
fn output_permissions(path: &Path) -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o777)
        .unwrap_or(0o666);
    Some(Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn output_permissions(_path: &Path) -> Option<Permissions> {
    None
}

/// Write a mask as an opaque black and white image, white where matched.
pub fn save_mask<P: AsRef<Path>>(mask: &Mask, path: P) -> Result<()> {
    stage_mask(mask, path)?.persist()
}

pub fn stage_mask<P: AsRef<Path>>(mask: &Mask, path: P) -> Result<StagedImage> {
    let rgba = DynamicImage::ImageLuma8(mask.to_gray_image()).to_rgba8();
    stage_rgba(&rgba, path, &SaveOptions::default())
}
