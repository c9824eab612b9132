use crate::{error::SceneError, math::Vector3};

use super::{distance_falloff, Incidence};

/// A spot light shines from a position toward an aim point, fading out
/// smoothly toward the edge of its cone.
#[derive(Clone, Debug, PartialEq)]
pub struct Spot {
    pub position: Vector3,

    /// Unit vector along the axis of the cone.
    pub direction: Vector3,

    /// Half-angle of the cone, in radians. Nothing outside it is lit.
    pub spread: f64,

    pub brightness: f64,
}

impl Spot {
    /// Create a spot light at `position` aimed at the point `at`.
    pub fn new(position: Vector3, at: Vector3, spread: f64, brightness: f64) -> Result<Self, SceneError> {
        let direction = (at - position)
            .try_normalize()
            .ok_or(SceneError::DegenerateVector("spot light aim", at - position))?;

        Ok(Self {
            position,
            direction,
            spread,
            brightness,
        })
    }

    pub fn incidence(&self, point: Vector3) -> Option<Incidence> {
        let lvec = self.position - point;
        let distance = lvec.magnitude();
        if distance <= 0. {
            return None;
        }

        Some(Incidence {
            direction: lvec / distance,
            distance,
        })
    }

    /// `1 - (angle / spread)^2` inside the cone, zero outside.
    pub fn cone(&self, incidence: &Incidence) -> f64 {
        let cos = self.direction.dot(-incidence.direction).clamp(-1., 1.);
        let angle = cos.acos();

        if self.spread > 0. && angle <= self.spread {
            1. - (angle / self.spread).powi(2)
        } else {
            0.
        }
    }

    pub fn falloff(&self, incidence: &Incidence, attenuation: bool) -> f64 {
        let cone = self.cone(incidence);
        if cone <= 0. {
            return 0.;
        }

        distance_falloff(self.brightness, incidence.distance, attenuation) * cone
    }
}
