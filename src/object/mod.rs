mod sphere;

use std::cmp::Ordering;

use crate::{
    material::Material,
    math::{Ray, Vector3},
};

pub use sphere::*;

/// The result of a ray intersection.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    /// Where the ray struck the surface.
    pub point: Vector3,

    /// The outward unit normal at `point`.
    pub normal: Vector3,

    /// The ray parameter of the hit, so that `point = origin + t * direction`.
    pub t: f64,
}

impl Hit {
    pub fn new(point: Vector3, normal: Vector3, t: f64) -> Self {
        Self { point, normal, t }
    }
}

/// A trait that represents any type that can be intersected by a Ray.
pub trait Intersect {
    /// Find the nearest intersection in front of the ray, if any.
    fn intersect(&self, ray: &Ray) -> Option<Hit>;
}

/// Any object that can be placed in a scene. Spheres are the only primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Sphere(Sphere),
}

impl Object {
    /// Grab this scene object's material.
    pub fn material(&self) -> &Material {
        match self {
            Self::Sphere(sphere) => &sphere.material,
        }
    }
}

impl Intersect for Object {
    fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match self {
            Self::Sphere(sphere) => sphere.intersect(ray),
        }
    }
}

impl From<Sphere> for Object {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

/// Order two intersection results by distance. A miss sorts after every hit and
/// two misses are equal.
pub fn compare_hits(a: Option<&Hit>, b: Option<&Hit>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.t.partial_cmp(&b.t).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Find the object nearest along the ray, together with where it was struck.
pub fn closest_hit<'a, I>(objects: I, ray: &Ray) -> Option<(&'a Object, Hit)>
where
    I: IntoIterator<Item = &'a Object>,
{
    objects
        .into_iter()
        .filter_map(|object| object.intersect(ray).map(|hit| (object, hit)))
        .min_by(|(_, a), (_, b)| compare_hits(Some(a), Some(b)))
}
