use std::f64::consts::PI;

use crate::{
    error::SceneError,
    math::{Ray, Vector3},
};

/// Distance from the camera to the virtual image plane.
pub const SCREEN_DISTANCE: f64 = 1.;

/// A Camera object. It always sits at the world origin and looks along
/// `direction`, with `up` giving the vertical orientation of the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    direction: Vector3,
    up: Vector3,
    fov: f64,
}

impl Camera {
    /// Create a camera. Neither vector needs to be normalized, but they must be
    /// non-zero and not parallel. `fov` is in radians and must lie in `(0, pi)`.
    pub fn new(direction: Vector3, up: Vector3, fov: f64) -> Result<Self, SceneError> {
        let direction = direction
            .try_normalize()
            .ok_or(SceneError::DegenerateVector("camera direction", direction))?;
        let up = up
            .try_normalize()
            .ok_or(SceneError::DegenerateVector("camera up", up))?;

        if direction.cross(up).try_normalize().is_none() {
            return Err(SceneError::ParallelCameraAxes);
        }

        if !(fov > 0. && fov < PI) {
            return Err(SceneError::InvalidFieldOfView(fov));
        }

        Ok(Self { direction, up, fov })
    }

    /// The camera position. Fixed at the world origin.
    pub fn origin(&self) -> Vector3 {
        Vector3::zero()
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    pub fn up(&self) -> Vector3 {
        self.up
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            direction: Vector3::unit_x(),
            up: Vector3::unit_z(),
            fov: PI / 2.,
        }
    }
}

/// The size, in pixels, of a render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Result<Self, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidResolution(width, height));
        }

        Ok(Self { width, height })
    }

    /// Even sizes let pixel sampling sit symmetrically around the screen center.
    pub fn is_even(&self) -> bool {
        self.width % 2 == 0 && self.height % 2 == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// The image plane a camera projects through. Maps pixel coordinates to ray
/// directions; it holds no mutable state, so every pixel can be projected
/// independently.
#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    origin: Vector3,
    center: Vector3,
    right: Vector3,
    down: Vector3,
    resolution: Resolution,
}

impl Screen {
    pub fn new(camera: &Camera, resolution: Resolution) -> Self {
        // world-space size of one pixel on the image plane
        let density =
            2. * (camera.fov() / 2.).tan() * SCREEN_DISTANCE / resolution.width as f64;

        // direction and up are validated as non-parallel by `Camera::new`
        let right = camera.direction().cross(camera.up()).normalize();
        let down = camera.direction().cross(right).normalize();

        Self {
            origin: camera.origin(),
            center: camera.direction() * SCREEN_DISTANCE,
            right: right * density,
            down: down * density,
            resolution,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// The point on the image plane for pixel `(x, y)`, where top-left of the
    /// image is (0, 0). Not normalized.
    pub fn direction_at(&self, x: f64, y: f64) -> Vector3 {
        let nx = x - self.resolution.width as f64 * 0.5;
        let ny = y - self.resolution.height as f64 * 0.5;
        self.center + self.right * nx + self.down * ny
    }

    /// The primary ray through pixel `(x, y)`.
    pub fn ray_at(&self, x: u32, y: u32) -> Ray {
        Ray::new(self.origin, self.direction_at(x as f64, y as f64))
    }
}
