#![allow(clippy::many_single_char_names)]

//! A ray caster for scenes made of spheres, lit by point, spot and directed
//! lights. A [`scene::Scene`] is rendered into a [`frame::Frame`] of linear
//! colors, one primary ray per pixel.

pub mod camera;
pub mod error;
pub mod frame;
pub mod lighting;
pub mod material;
pub mod math;
pub mod object;
pub mod scene;
