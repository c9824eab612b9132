mod directed;
mod point;
mod spot;

use crate::{
    material::{Color, Material},
    math::{Ray, Vector3},
    object::Hit,
    scene::{RenderOptions, Scene},
};

pub use directed::*;
pub use point::*;
pub use spot::*;

/// The result of a light's influence on a ray intersection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightShading {
    pub diffuse: f64,
    pub specular: f64,
    pub intensity: f64,
}

impl LightShading {
    pub fn new(diffuse: f64, specular: f64, intensity: f64) -> Self {
        Self {
            diffuse,
            specular,
            intensity,
        }
    }

    /// The color this shading adds to a surface of the given material.
    /// Diffuse light takes on the surface color, highlights stay white.
    pub fn color(&self, material: &Material) -> Color {
        material.color * (self.diffuse * self.intensity)
            + Color::white() * (self.specular * self.intensity)
    }
}

/// Where light arrives from, as seen from a point on a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Incidence {
    /// Unit vector from the surface point toward the light.
    pub direction: Vector3,

    /// Distance to the light. Infinite for lights without a position.
    pub distance: f64,
}

/// Any light in a scene.
#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Point(Point),
    Spot(Spot),
    Directed(Directed),
}

impl Light {
    pub fn brightness(&self) -> f64 {
        match self {
            Self::Point(light) => light.brightness,
            Self::Spot(light) => light.brightness,
            Self::Directed(light) => light.brightness,
        }
    }

    /// The direction and distance to this light from `point`, or `None` when the
    /// point sits exactly on the light and no direction exists.
    pub fn incidence(&self, point: Vector3) -> Option<Incidence> {
        match self {
            Self::Point(light) => light.incidence(point),
            Self::Spot(light) => light.incidence(point),
            Self::Directed(light) => Some(light.incidence()),
        }
    }

    /// How much of this light's brightness arrives along `incidence`.
    pub fn falloff(&self, incidence: &Incidence, attenuation: bool) -> f64 {
        match self {
            Self::Point(light) => light.falloff(incidence, attenuation),
            Self::Spot(light) => light.falloff(incidence, attenuation),
            Self::Directed(light) => light.brightness,
        }
    }

    /// Shade a hit with this light. Shadow probing only happens when the render
    /// options ask for it.
    pub fn shading(
        &self,
        ray: &Ray,
        hit: &Hit,
        material: &Material,
        scene: &Scene,
        options: &RenderOptions,
    ) -> LightShading {
        let incidence = match self.incidence(hit.point) {
            Some(incidence) => incidence,
            None => return LightShading::default(),
        };

        let intensity = self.falloff(&incidence, options.light_attenuation);
        if intensity <= 0. {
            return LightShading::default();
        }

        let lvec = incidence.direction;
        let facing = hit.normal.dot(lvec);
        if facing <= 0. {
            return LightShading::default();
        }

        if options.shadows && scene.is_shadowed(hit, &incidence) {
            return LightShading::default();
        }

        let diffuse = facing * material.diffuse;

        let specular = if material.specular > 0. {
            let halfway_dir = (lvec - ray.direction).try_normalize().unwrap_or(hit.normal);
            hit.normal
                .dot(halfway_dir)
                .max(0.)
                .powi(material.shininess)
                * material.specular
        } else {
            0.
        };

        LightShading::new(diffuse, specular, intensity)
    }
}

impl From<Point> for Light {
    fn from(light: Point) -> Self {
        Self::Point(light)
    }
}

impl From<Spot> for Light {
    fn from(light: Spot) -> Self {
        Self::Spot(light)
    }
}

impl From<Directed> for Light {
    fn from(light: Directed) -> Self {
        Self::Directed(light)
    }
}

/// Inverse-square falloff over a sphere's worth of solid angle, or the raw
/// brightness when attenuation is switched off.
fn distance_falloff(brightness: f64, distance: f64, attenuation: bool) -> f64 {
    if attenuation {
        brightness / (std::f64::consts::PI * distance * distance)
    } else {
        brightness
    }
}
