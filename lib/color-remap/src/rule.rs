use crate::{Color, Mask, RemapOptions, Result};
use image::RgbaImage;
use std::fmt;

/// What happens to pixels matched by the background mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundFill {
    Transparent,
    Recolor(Color),
}

impl From<Option<Color>> for BackgroundFill {
    fn from(color: Option<Color>) -> Self {
        color.map_or(BackgroundFill::Transparent, BackgroundFill::Recolor)
    }
}

/// The replacement mode of one remap pass, chosen once from the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementRule {
    NoOp,
    BackgroundOnly {
        target: Color,
        fill: BackgroundFill,
    },
    BackgroundPlusBlanketForeground {
        target: Color,
        fill: BackgroundFill,
        foreground: Color,
    },
    ForegroundOnly {
        target: Color,
        replacement: Color,
    },
}

impl ReplacementRule {
    /// Background wins: with a background target the specific foreground
    /// pair is never consulted, only the blanket foreground recolor.
    pub fn select(options: &RemapOptions) -> Self {
        if let Some(target) = options.target_bg_color {
            let fill = BackgroundFill::from(options.new_bg_color);

            return match (options.change_all_fg, options.new_fg_color) {
                (true, Some(foreground)) => ReplacementRule::BackgroundPlusBlanketForeground {
                    target,
                    fill,
                    foreground,
                },
                _ => {
                    if options.target_fg_color.is_some() && options.new_fg_color.is_some() {
                        log::debug!(
                            "background target {} set, ignoring foreground rule {} -> {}",
                            target.to_hex(),
                            options.target_fg_color.map_or_else(String::new, Color::to_hex),
                            options.new_fg_color.map_or_else(String::new, Color::to_hex)
                        );
                    }
                    ReplacementRule::BackgroundOnly { target, fill }
                }
            };
        }

        match (options.target_fg_color, options.new_fg_color) {
            (Some(target), Some(replacement)) => ReplacementRule::ForegroundOnly {
                target,
                replacement,
            },
            _ => ReplacementRule::NoOp,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReplacementRule::NoOp => "no-op",
            ReplacementRule::BackgroundOnly { .. } => "background",
            ReplacementRule::BackgroundPlusBlanketForeground { .. } => "background+foreground",
            ReplacementRule::ForegroundOnly { .. } => "foreground",
        }
    }

    /// Color the primary mask is computed against.
    pub fn target(&self) -> Option<Color> {
        match self {
            ReplacementRule::NoOp => None,
            ReplacementRule::BackgroundOnly { target, .. }
            | ReplacementRule::BackgroundPlusBlanketForeground { target, .. }
            | ReplacementRule::ForegroundOnly { target, .. } => Some(*target),
        }
    }
}

impl fmt::Display for ReplacementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply `fill` to every masked pixel. Returns the number of pixels touched.
pub fn fill_masked(image: &mut RgbaImage, mask: &Mask, fill: BackgroundFill) -> Result<usize> {
    mask.check_dimensions(image)?;

    let mut touched = 0;
    for (pixel, _) in image.pixels_mut().zip(mask.iter()).filter(|(_, hit)| *hit) {
        match fill {
            BackgroundFill::Transparent => pixel[3] = 0,
            BackgroundFill::Recolor(color) => {
                pixel[0] = color.r;
                pixel[1] = color.g;
                pixel[2] = color.b;
            }
        }
        touched += 1;
    }

    Ok(touched)
}

/// Set the RGB of every masked pixel to `color`, leaving alpha alone.
pub fn recolor_masked(image: &mut RgbaImage, mask: &Mask, color: Color) -> Result<usize> {
    fill_masked(image, mask, BackgroundFill::Recolor(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const GREEN: Color = Color::new(0, 255, 0);

    #[test]
    fn test_select_background_only() {
        let options = RemapOptions::default();
        assert_eq!(
            ReplacementRule::select(&options),
            ReplacementRule::BackgroundOnly {
                target: Color::WHITE,
                fill: BackgroundFill::Transparent,
            }
        );
    }

    #[test]
    fn test_background_shadows_foreground_pair() {
        let options = RemapOptions::default()
            .with_target_fg_color(Some(Color::BLACK))
            .with_new_fg_color(Some(GREEN));

        assert_eq!(
            ReplacementRule::select(&options),
            ReplacementRule::BackgroundOnly {
                target: Color::WHITE,
                fill: BackgroundFill::Transparent,
            }
        );
    }

    #[test]
    fn test_select_blanket_foreground() {
        let options = RemapOptions::default()
            .with_new_bg_color(Some(Color::BLACK))
            .with_new_fg_color(Some(GREEN))
            .with_change_all_fg(true);

        assert_eq!(
            ReplacementRule::select(&options),
            ReplacementRule::BackgroundPlusBlanketForeground {
                target: Color::WHITE,
                fill: BackgroundFill::Recolor(Color::BLACK),
                foreground: GREEN,
            }
        );
    }

    #[test]
    fn test_blanket_needs_replacement_color() {
        let options = RemapOptions::default().with_change_all_fg(true);
        assert_eq!(ReplacementRule::select(&options).name(), "background");
    }

    #[test]
    fn test_select_foreground_only() {
        let options = RemapOptions::default()
            .with_target_bg_color(None)
            .with_target_fg_color(Some(Color::BLACK))
            .with_new_fg_color(Some(GREEN));

        assert_eq!(
            ReplacementRule::select(&options),
            ReplacementRule::ForegroundOnly {
                target: Color::BLACK,
                replacement: GREEN,
            }
        );
    }

    #[test]
    fn test_select_noop() {
        let no_bg = RemapOptions::default().with_target_bg_color(None);
        assert_eq!(ReplacementRule::select(&no_bg), ReplacementRule::NoOp);

        let half_fg = no_bg.with_target_fg_color(Some(Color::BLACK));
        assert_eq!(ReplacementRule::select(&half_fg), ReplacementRule::NoOp);
        assert_eq!(ReplacementRule::NoOp.target(), None);
    }

    #[test]
    fn test_fill_masked() -> Result<()> {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([1, 2, 3, 200]));
        image.put_pixel(1, 0, Rgba([9, 9, 9, 200]));
        let mask = Mask::from_color_distance(&image, Color::new(1, 2, 3), 1.0);

        let mut transparent = image.clone();
        assert_eq!(fill_masked(&mut transparent, &mask, BackgroundFill::Transparent)?, 1);
        assert_eq!(*transparent.get_pixel(0, 0), Rgba([1, 2, 3, 0]));
        assert_eq!(*transparent.get_pixel(1, 0), Rgba([9, 9, 9, 200]));

        assert_eq!(recolor_masked(&mut image, &mask, GREEN)?, 1);
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 255, 0, 200]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([9, 9, 9, 200]));
        Ok(())
    }

    #[test]
    fn test_fill_rejects_foreign_mask() {
        let mut image = RgbaImage::new(2, 2);
        let err = fill_masked(&mut image, &Mask::new(1, 1), BackgroundFill::Transparent);
        assert!(err.is_err());
    }
}
