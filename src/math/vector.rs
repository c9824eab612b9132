use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A vector in 3D space.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Instantiate a new Vector3.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0., 0., 0.)
    }

    pub const fn unit_x() -> Self {
        Self::new(1., 0., 0.)
    }

    pub const fn unit_y() -> Self {
        Self::new(0., 1., 0.)
    }

    pub const fn unit_z() -> Self {
        Self::new(0., 0., 1.)
    }

    /// Find the dot product between two Vector3s.
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross two Vector3s.
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// The squared magnitude. Cheaper than `magnitude` when only comparing lengths.
    pub fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    /// Find the magnitude of this Vector3.
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Normalize this Vector3, or `None` if it has no usable length.
    pub fn try_normalize(self) -> Option<Self> {
        let mag = self.magnitude();
        if mag > 0. && mag.is_finite() {
            Some(self / mag)
        } else {
            None
        }
    }

    /// Normalize this Vector3 by dividing it by its own magnitude.
    ///
    /// # Panics
    ///
    /// Panics if the vector has zero (or non-finite) length. Scene construction
    /// rejects such vectors, so hitting this is a bug in the caller.
    pub fn normalize(self) -> Self {
        match self.try_normalize() {
            Some(v) => v,
            None => panic!("cannot normalize degenerate vector {:?}", self),
        }
    }

    /// Mirror this vector about a unit normal.
    pub fn reflect(self, normal: Self) -> Self {
        self - normal * (2. * self.dot(normal))
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
            z: self.z * rhs.z,
        }
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}
