use crate::math::Vector3;

use super::{distance_falloff, Incidence};

/// A point light, which is a light that emits in all directions from a specified position.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    /// The position in space of this light.
    pub position: Vector3,

    /// The radiant intensity of this light. Divided by `pi * distance^2` when it
    /// reaches a surface.
    pub brightness: f64,
}

impl Point {
    pub fn new(position: Vector3, brightness: f64) -> Self {
        Self {
            position,
            brightness,
        }
    }

    pub fn incidence(&self, point: Vector3) -> Option<Incidence> {
        // vector pointing from hit to light pos
        let lvec = self.position - point;

        // calculate distance and normalize, all at once
        let distance = lvec.magnitude();
        if distance <= 0. {
            return None;
        }

        Some(Incidence {
            direction: lvec / distance,
            distance,
        })
    }

    pub fn falloff(&self, incidence: &Incidence, attenuation: bool) -> f64 {
        distance_falloff(self.brightness, incidence.distance, attenuation)
    }
}
