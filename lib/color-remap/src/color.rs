//! Color values and parsing
//!
//! Colors arrive as hex strings, comma lists, CSS names or raw numeric
//! components. All of them end up as a plain RGB triple; alpha is dropped.

use crate::{Error, Result};
use image::Rgba;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Raw shapes a color can be given in before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorInput {
    Text(String),
    Components(Vec<i64>),
}

impl From<&str> for ColorInput {
    fn from(text: &str) -> Self {
        ColorInput::Text(text.to_string())
    }
}

impl From<Vec<i64>> for ColorInput {
    fn from(components: Vec<i64>) -> Self {
        ColorInput::Components(components)
    }
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("white", Color::new(255, 255, 255)),
    ("black", Color::new(0, 0, 0)),
    ("red", Color::new(255, 0, 0)),
    ("lime", Color::new(0, 255, 0)),
    ("green", Color::new(0, 128, 0)),
    ("blue", Color::new(0, 0, 255)),
    ("yellow", Color::new(255, 255, 0)),
    ("cyan", Color::new(0, 255, 255)),
    ("magenta", Color::new(255, 0, 255)),
    ("gray", Color::new(128, 128, 128)),
    ("grey", Color::new(128, 128, 128)),
    ("silver", Color::new(192, 192, 192)),
    ("orange", Color::new(255, 165, 0)),
];

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Validate an optional raw color. `None` stays `None`.
    pub fn parse(input: Option<&ColorInput>) -> Result<Option<Self>> {
        match input {
            None => Ok(None),
            Some(ColorInput::Text(text)) => text.parse().map(Some),
            Some(ColorInput::Components(components)) => Self::from_components(components).map(Some),
        }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        let invalid = || Error::InvalidColorFormat(format!("not a hex color: {hex:?}"));

        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| -> Result<u8> {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };

        match digits.len() {
            // Short forms repeat each nibble: #f80 == #ff8800
            3 | 4 => Ok(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 | 8 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(invalid()),
        }
    }

    /// Build a color from 3 (RGB) or 4 (RGBA) numeric components.
    pub fn from_components(components: &[i64]) -> Result<Self> {
        if components.len() < 3 || components.len() > 4 {
            return Err(Error::InvalidColorFormat(format!(
                "expected 3 or 4 components, got {}: {components:?}",
                components.len()
            )));
        }

        let channel = |value: i64| -> Result<u8> {
            u8::try_from(value).map_err(|_| {
                Error::InvalidColorFormat(format!(
                    "component {value} out of range 0..=255 in {components:?}"
                ))
            })
        };

        // The alpha component only has to be in range, its value is not kept.
        if let Some(&alpha) = components.get(3) {
            channel(alpha)?;
        }

        Ok(Self::new(
            channel(components[0])?,
            channel(components[1])?,
            channel(components[2])?,
        ))
    }

    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(Error::InvalidColorFormat("empty color string".to_string()));
        }

        let lower = text.to_ascii_lowercase();
        let function_args = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'));

        if let Some(args) = function_args {
            return parse_component_list(args, s);
        }

        if text.contains(',') {
            return parse_component_list(text, s);
        }

        if let Some(color) = Self::from_name(text) {
            return Ok(color);
        }

        Self::from_hex(text)
    }
}

fn parse_component_list(list: &str, original: &str) -> Result<Color> {
    let components = list
        .split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| Error::InvalidColorFormat(format!("not a component list: {original:?}")))?;

    Color::from_components(&components)
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b]
    }
}
