use std::ops::{Add, AddAssign, Mul};

use crate::error::SceneError;

/// A linear RGB color. Channels are nominally 0-1 but are left unbounded while
/// shading accumulates light; they are only clamped when converted to a raster.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn black() -> Self {
        Self::new(0., 0., 0.)
    }

    pub const fn white() -> Self {
        Self::new(1., 1., 1.)
    }

    pub const fn red() -> Self {
        Self::new(1., 0., 0.)
    }

    pub const fn green() -> Self {
        Self::new(0., 1., 0.)
    }

    pub const fn blue() -> Self {
        Self::new(0., 0., 1.)
    }

    /// Instantiate a new Color.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Convert to 8-bit channels, `clamp(round(c * 255), 0, 255)`.
    pub fn to_rgb8(self) -> [u8; 3] {
        fn channel(c: f64) -> u8 {
            // NaN falls through both comparisons of clamp and casts to 0
            (c * 255.).round().clamp(0., 255.) as u8
        }

        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// Pack into a `0x00RRGGBB` integer.
    pub fn to_rgb_int(self) -> u32 {
        let [r, g, b] = self.to_rgb8();
        (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    pub fn channels(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        image::Rgb(color.to_rgb8())
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

/// The surface properties of a sphere.
///
/// Only `color` and `diffuse` take part in the basic shading model. The
/// remaining fields default to values that switch their effect off.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// The base color of the surface.
    pub color: Color,

    /// The Lambertian diffuse strength, 0 to 1.
    pub diffuse: f64,

    /// The strength of Blinn-Phong specular highlights.
    pub specular: f64,

    /// The power specular highlights are raised to. Generally speaking,
    /// 16, 32, and 64 are good values.
    pub shininess: i32,

    /// How much of a mirror reflection (0 to 1) is mixed in. Only used when the
    /// render allows recursion.
    pub reflectiveness: f64,
}

impl Material {
    /// A purely diffuse material.
    pub fn new(color: Color, diffuse: f64) -> Self {
        Self {
            color,
            diffuse,
            ..Default::default()
        }
    }

    /// Check that every coefficient is in the range shading expects.
    pub fn validate(&self) -> Result<(), SceneError> {
        let unit = |name: &'static str, value: f64| {
            if (0. ..=1.).contains(&value) {
                Ok(())
            } else {
                Err(SceneError::InvalidMaterial(name, value))
            }
        };

        unit("diffuse", self.diffuse)?;
        unit("reflectiveness", self.reflectiveness)?;

        if !(self.specular >= 0. && self.specular.is_finite()) {
            return Err(SceneError::InvalidMaterial("specular", self.specular));
        }
        if self.shininess < 0 {
            return Err(SceneError::InvalidMaterial("shininess", self.shininess as f64));
        }

        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::white(),
            diffuse: 1.,
            specular: 0.,
            shininess: 32,
            reflectiveness: 0.,
        }
    }
}
