use crate::{Color, Error, Result};
use image::{GrayImage, Rgba, RgbaImage};

/// Euclidean distance between a pixel's RGB and `target`. Alpha is ignored.
pub fn color_distance(pixel: &Rgba<u8>, target: Color) -> f64 {
    let dr = pixel[0] as f64 - target.r as f64;
    let dg = pixel[1] as f64 - target.g as f64;
    let db = pixel[2] as f64 - target.b as f64;

    (dr * dr + dg * dg + db * db).sqrt()
}

/// Per-pixel match flags, row-major, same size as the image they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Mark every pixel strictly closer than `tolerance` to `target`.
    pub fn from_color_distance(image: &RgbaImage, target: Color, tolerance: f64) -> Self {
        let bits = image
            .pixels()
            .map(|pixel| color_distance(pixel, target) < tolerance)
            .collect();

        Self {
            width: image.width(),
            height: image.height(),
            bits,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn invert(&mut self) {
        self.bits.iter_mut().for_each(|bit| *bit = !*bit);
    }

    pub fn inverted(&self) -> Self {
        let mut mask = self.clone();
        mask.invert();
        mask
    }

    /// Number of matched pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn check_dimensions(&self, image: &RgbaImage) -> Result<()> {
        if self.dimensions() != image.dimensions() {
            return Err(Error::DimensionMismatch {
                mask: self.dimensions(),
                image: image.dimensions(),
            });
        }
        Ok(())
    }

    // 255 = matched, 0 = not matched
    pub fn to_gray_image(&self) -> GrayImage {
        let data = self.bits.iter().map(|bit| if *bit { 255 } else { 0 }).collect();

        GrayImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }
}
