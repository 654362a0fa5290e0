//! Offline CPU raymarcher for fractal mountain terrain.
//!
//! One frame is a grid of independent fragments.  Each fragment casts a ray
//! from the camera, marches it against an fbm height field sampled from a
//! 256×256 noise table, and shades the hit with soft sun shadows, sky and
//! bounce light, fog and a filmic tone curve.

pub mod atmosphere;
pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod export;
pub mod lighting;
pub mod march;
pub mod math;
pub mod noise;
pub mod ray;
pub mod render;
pub mod sun;
pub mod terrain;
pub mod tonemap;
