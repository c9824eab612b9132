use thiserror::Error;

use crate::math::Vector3;

/// A scene value that the renderer cannot work with. These are caught when the
/// scene is assembled, never while rendering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("{0} must have a non-zero, finite length (got {1:?})")]
    DegenerateVector(&'static str, Vector3),

    #[error("camera direction and up vectors must not be parallel")]
    ParallelCameraAxes,

    #[error("field of view must lie strictly between 0 and pi radians (got {0})")]
    InvalidFieldOfView(f64),

    #[error("sphere radius must be positive (got {0})")]
    InvalidRadius(f64),

    #[error("material {0} is out of range (got {1})")]
    InvalidMaterial(&'static str, f64),

    #[error("resolution must be at least 1x1 (got {0}x{1})")]
    InvalidResolution(u32, u32),
}
