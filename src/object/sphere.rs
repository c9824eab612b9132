use crate::{
    error::SceneError,
    material::Material,
    math::{Ray, Vector3, EPSILON},
};

use super::{Hit, Intersect};

/// A sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub origin: Vector3,
    pub radius: f64,
    pub material: Material,
}

impl Sphere {
    pub fn new(origin: Vector3, radius: f64, material: Material) -> Result<Self, SceneError> {
        if !(radius > 0. && radius.is_finite()) {
            return Err(SceneError::InvalidRadius(radius));
        }
        material.validate()?;

        Ok(Self {
            origin,
            radius,
            material,
        })
    }

    /// Solve `|o + t*d - c|^2 = r^2` for the smallest usable `t`.
    fn nearest_root(&self, ray: &Ray) -> Option<f64> {
        let l = ray.origin - self.origin;
        let a = ray.direction.dot(ray.direction);
        let b = 2. * ray.direction.dot(l);
        let c = l.dot(l) - self.radius * self.radius;
        let discriminant = b * b - 4. * a * c;

        if discriminant < 0. {
            None
        } else if discriminant == 0. {
            // grazing ray, one root
            let t = -b / (2. * a);
            (t > EPSILON).then(|| t)
        } else {
            let root = discriminant.sqrt();
            let (mut t1, mut t2) = ((-b + root) / (2. * a), (-b - root) / (2. * a));
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            // prefer the near side; fall back to the far side when the ray starts inside
            if t1 > EPSILON {
                Some(t1)
            } else if t2 > EPSILON {
                Some(t2)
            } else {
                None
            }
        }
    }
}

impl Intersect for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let t = self.nearest_root(ray)?;
        let point = ray.along(t);
        let normal = (point - self.origin) / self.radius;

        Some(Hit::new(point, normal, t))
    }
}
