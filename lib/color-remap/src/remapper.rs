//! Color remapping engine
//!
//! Turns a set of remap options into a [`ReplacementRule`] once, then runs
//! that rule over RGBA images.

use crate::{
    BackgroundFill, Color, Effect, Error, Mask, ReplacementRule, Result,
    rule::{fill_masked, recolor_masked},
};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use std::fmt;

/// Raw remap options, before the replacement mode is decided.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct RemapOptions {
    /// Background color to match. `None` disables background matching.
    #[derivative(Default(value = "Some(Color::WHITE)"))]
    pub target_bg_color: Option<Color>,

    /// Background replacement. `None` makes matched pixels transparent.
    pub new_bg_color: Option<Color>,

    /// Only consulted when `target_bg_color` is `None`
    pub target_fg_color: Option<Color>,

    pub new_fg_color: Option<Color>,

    /// Recolor every non-background pixel with `new_fg_color`
    pub change_all_fg: bool,

    pub invert_mask: bool,

    /// Euclidean RGB distance below which a pixel matches
    #[derivative(Default(value = "40.0"))]
    pub tolerance: f64,
}

impl RemapOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What one remap pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemapReport {
    pub width: u32,
    pub height: u32,
    pub rule: ReplacementRule,
    /// Pixels in the primary mask, after inversion
    pub matched: usize,
    pub recolored: usize,
    pub made_transparent: usize,
}

impl fmt::Display for RemapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "remapped {}x{} with {} rule: {} matched, {} recolored, {} made transparent",
            self.width, self.height, self.rule, self.matched, self.recolored, self.made_transparent
        )
    }
}

/// Result of remapping a copy of an image.
#[derive(Debug, Clone)]
pub struct RemapOutput {
    pub image: RgbaImage,
    pub report: RemapReport,
    /// Mask that drove the primary replacement step, `None` for a no-op rule
    pub mask: Option<Mask>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRemapper {
    rule: ReplacementRule,
    invert_mask: bool,
    tolerance: f64,
}

impl ColorRemapper {
    pub fn new(options: &RemapOptions) -> Result<Self> {
        if !options.tolerance.is_finite() || options.tolerance < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "tolerance must be a non-negative number, got {}",
                options.tolerance
            )));
        }

        let rule = ReplacementRule::select(options);
        log::debug!(
            "selected {rule} rule against {} (tolerance={}, invert_mask={})",
            rule.target().map_or_else(|| "nothing".to_string(), Color::to_hex),
            options.tolerance,
            options.invert_mask
        );

        Ok(Self {
            rule,
            invert_mask: options.invert_mask,
            tolerance: options.tolerance,
        })
    }

    pub fn rule(&self) -> ReplacementRule {
        self.rule
    }

    /// Remap a copy of `image`. The input is left untouched.
    pub fn remap(&self, image: &RgbaImage) -> Result<RgbaImage> {
        let mut output = image.clone();
        self.apply(&mut output)?;
        Ok(output)
    }

    /// Like [`remap`](Self::remap), also returning the mask that drove the
    /// primary replacement step. No mask is computed for a no-op rule.
    pub fn remap_with_mask(&self, image: &RgbaImage) -> Result<(RgbaImage, Option<Mask>)> {
        self.process(image).map(|output| (output.image, output.mask))
    }

    pub fn process(&self, image: &RgbaImage) -> Result<RemapOutput> {
        let mut output = image.clone();
        let (report, mask) = self.run(&mut output)?;

        Ok(RemapOutput {
            image: output,
            report,
            mask,
        })
    }

    pub fn apply_with_report(&self, image: &mut RgbaImage) -> Result<RemapReport> {
        self.run(image).map(|(report, _)| report)
    }

    fn run(&self, image: &mut RgbaImage) -> Result<(RemapReport, Option<Mask>)> {
        let (width, height) = image.dimensions();
        let mut report = RemapReport {
            width,
            height,
            rule: self.rule,
            matched: 0,
            recolored: 0,
            made_transparent: 0,
        };

        let mask = match self.rule {
            ReplacementRule::NoOp => {
                log::debug!("no replacement rule applies, image passes through");
                return Ok((report, None));
            }
            ReplacementRule::BackgroundOnly { target, fill } => {
                let mask = self.oriented(Mask::from_color_distance(image, target, self.tolerance));
                self.fill_background(image, &mask, fill, &mut report)?;
                mask
            }
            ReplacementRule::BackgroundPlusBlanketForeground {
                target,
                fill,
                foreground,
            } => {
                let raw = Mask::from_color_distance(image, target, self.tolerance);
                let mask = self.oriented(raw.clone());
                self.fill_background(image, &mask, fill, &mut report)?;

                // Foreground is everything outside the raw match, inversion aside.
                report.recolored += recolor_masked(image, &raw.inverted(), foreground)?;
                mask
            }
            ReplacementRule::ForegroundOnly {
                target,
                replacement,
            } => {
                let mask = self.oriented(Mask::from_color_distance(image, target, self.tolerance));
                report.matched = mask.count();
                report.recolored += recolor_masked(image, &mask, replacement)?;
                mask
            }
        };

        Ok((report, Some(mask)))
    }

    fn oriented(&self, mut mask: Mask) -> Mask {
        if self.invert_mask {
            mask.invert();
        }
        mask
    }

    fn fill_background(
        &self,
        image: &mut RgbaImage,
        mask: &Mask,
        fill: BackgroundFill,
        report: &mut RemapReport,
    ) -> Result<()> {
        report.matched = mask.count();
        let touched = fill_masked(image, mask, fill)?;

        match fill {
            BackgroundFill::Transparent => report.made_transparent += touched,
            BackgroundFill::Recolor(_) => report.recolored += touched,
        }

        Ok(())
    }
}

impl Effect for ColorRemapper {
    fn apply(&self, image: &mut RgbaImage) -> Result<()> {
        self.apply_with_report(image).map(|_| ())
    }
}
