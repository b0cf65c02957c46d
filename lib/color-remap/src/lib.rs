pub mod color;
pub mod loader;
pub mod mask;
pub mod remapper;
pub mod rule;
pub mod writer;

pub use color::{Color, ColorInput};
pub use loader::load_rgba;
pub use mask::Mask;
pub use remapper::{ColorRemapper, RemapOptions, RemapOutput, RemapReport};
pub use rule::{BackgroundFill, ReplacementRule};
pub use writer::{SaveOptions, StagedImage, save_mask, save_rgba, stage_mask, stage_rgba};

use image::RgbaImage;
use std::{fmt, path::Path, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input image not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read image {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid color format: {0}")]
    InvalidColorFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Mask is {mask:?} but image is {image:?}")]
    DimensionMismatch { mask: (u32, u32), image: (u32, u32) },

    #[error("IO error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode image {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// The step of a remap call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Parse,
    Transform,
    Save,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Parse => "parse",
            Stage::Transform => "transform",
            Stage::Save => "save",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn stage(&self) -> Stage {
        match self {
            Error::FileNotFound(_) | Error::Read { .. } | Error::Decode { .. } => Stage::Load,
            Error::InvalidColorFormat(_) | Error::InvalidParameter(_) => Stage::Parse,
            Error::DimensionMismatch { .. } => Stage::Transform,
            Error::Io { .. } | Error::Encode { .. } => Stage::Save,
        }
    }
}

/// In-place image transform.
pub trait Effect {
    fn apply(&self, image: &mut RgbaImage) -> Result<()>;
}

/// Load `input`, remap its colors and write the result to `output`.
///
/// The options are validated before the input is touched, so a bad tolerance
/// never costs a decode. Nothing is written when any step fails.
pub fn modify_image_colors<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &RemapOptions,
    save_options: &SaveOptions,
) -> Result<RemapReport> {
    let remapper = ColorRemapper::new(options)?;
    let mut image = load_rgba(input)?;

    let report = remapper.apply_with_report(&mut image)?;
    log::info!("{report}");

    let output = output.as_ref();
    save_rgba(&image, output, save_options)?;
    log::info!("image saved to {}", output.display());

    Ok(report)
}
