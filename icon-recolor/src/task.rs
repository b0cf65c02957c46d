use anyhow::Result;
use color_remap::{
    ColorRemapper, RemapOptions, RemapReport, SaveOptions, load_rgba, modify_image_colors,
    stage_mask, stage_rgba,
};
use std::path::PathBuf;

/// One input -> output remap, fully resolved.
#[derive(Debug, Clone)]
pub struct Task {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: RemapOptions,
    pub save_options: SaveOptions,
    pub save_mask: Option<PathBuf>,
}

impl Task {
    pub fn execute(&self) -> Result<RemapReport> {
        self.run().map_err(|e| {
            let stage = e.stage();
            anyhow::Error::new(e).context(format!(
                "{stage} failed for {} -> {}",
                self.input.display(),
                self.output.display()
            ))
        })
    }

    fn run(&self) -> color_remap::Result<RemapReport> {
        let Some(mask_path) = &self.save_mask else {
            return modify_image_colors(&self.input, &self.output, &self.options, &self.save_options);
        };

        let remapper = ColorRemapper::new(&self.options)?;
        log::debug!(
            "{} -> {} with {} rule",
            self.input.display(),
            self.output.display(),
            remapper.rule()
        );

        let output = remapper.process(&load_rgba(&self.input)?)?;
        log::info!("{}", output.report);

        // Encode both before persisting either.
        let image = stage_rgba(&output.image, &self.output, &self.save_options)?;
        let mask = match &output.mask {
            Some(mask) => Some(stage_mask(mask, mask_path)?),
            None => {
                log::warn!(
                    "{} rule computes no mask, skip {}",
                    output.report.rule,
                    mask_path.display()
                );
                None
            }
        };

        image.persist()?;
        log::info!("image saved to {}", self.output.display());

        if let Some(mask) = mask {
            mask.persist()?;
            log::info!("mask saved to {}", mask_path.display());
        }

        Ok(output.report)
    }
}
