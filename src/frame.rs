use std::path::Path;

use crate::{material::Color, math::remap};

/// A rendered image: `height` rows of `width` colors, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Frame {
    /// # Panics
    ///
    /// Panics if `pixels` does not hold exactly `width * height` colors.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel buffer does not match a {}x{} frame",
            width,
            height
        );

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Iterate over the rows of the image, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.width as usize)
    }

    /// Linearly rescale every channel so the frame fits in 0-1. The range is
    /// widened to include 0 and 1, so frames already inside it are untouched.
    pub fn normalized(&self) -> Frame {
        let (lo, hi) = self
            .pixels
            .iter()
            .flat_map(|c| c.channels())
            .fold((0f64, 1f64), |(lo, hi), c| (lo.min(c), hi.max(c)));

        let pixels = self
            .pixels
            .iter()
            .map(|c| {
                Color::new(
                    remap(c.r, lo..hi, 0.0..1.0),
                    remap(c.g, lo..hi, 0.0..1.0),
                    remap(c.b, lo..hi, 0.0..1.0),
                )
            })
            .collect();

        Frame::new(self.width, self.height, pixels)
    }

    /// Convert to an 8-bit image, clamping each channel.
    pub fn to_image(&self) -> image::RgbImage {
        let mut imgbuf: image::RgbImage = image::ImageBuffer::new(self.width, self.height);

        for (i, color) in self.pixels.iter().enumerate() {
            imgbuf.put_pixel(
                i as u32 % self.width,
                i as u32 / self.width,
                (*color).into(),
            );
        }

        imgbuf
    }

    /// Write the frame out, picking the format from the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }
}
