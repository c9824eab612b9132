use super::Vector3;

#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    /// Instantiate a new Ray. The direction is normalized here, so callers may pass
    /// any non-zero vector (e.g. a point on the image plane).
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn along(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Reflect this ray off of a position and a normal.
    pub fn reflect(&self, pos: Vector3, normal: Vector3) -> Ray {
        Ray::new(pos, self.direction.reflect(normal))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn direction_is_normalized() {
        let ray = Ray::new(Vector3::zero(), Vector3::new(10., 0., 0.));
        assert_eq!(ray.direction, Vector3::unit_x());
        assert_eq!(ray.along(2.5), Vector3::new(2.5, 0., 0.));
    }

    #[test]
    fn reflection_stays_normalized() {
        let ray = Ray::new(Vector3::zero(), Vector3::new(1., -2., 0.));
        let bounced = ray.reflect(Vector3::new(1., -2., 0.), Vector3::unit_y());
        assert_relative_eq!(bounced.direction.magnitude(), 1., epsilon = 1e-12);
        assert!(bounced.direction.y > 0.);
    }
}
