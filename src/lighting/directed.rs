use crate::{error::SceneError, math::Vector3};

use super::Incidence;

/// A directed light, which has no position, just a vector direction that is
/// true for all points in the world. Its brightness does not fall off.
#[derive(Debug, Clone, PartialEq)]
pub struct Directed {
    /// The unit direction the light travels in.
    pub direction: Vector3,

    pub brightness: f64,
}

impl Directed {
    pub fn new(direction: Vector3, brightness: f64) -> Result<Self, SceneError> {
        let direction = direction
            .try_normalize()
            .ok_or(SceneError::DegenerateVector("directed light direction", direction))?;

        Ok(Self {
            direction,
            brightness,
        })
    }

    pub fn incidence(&self) -> Incidence {
        Incidence {
            direction: -self.direction,
            distance: f64::INFINITY,
        }
    }
}
