use crate::math::pow;
use glam::Vec3;

/// Display encoding exponent, roughly `1 / 2.2`.
pub const GAMMA: f32 = 0.4545;

/// Narkowicz's fit of the ACES filmic curve.  Output is clamped to `[0, 1]`.
pub fn aces_film(x: Vec3) -> Vec3 {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    ((x * (a * x + Vec3::splat(b))) / (x * (c * x + Vec3::splat(d)) + Vec3::splat(e)))
        .clamp(Vec3::ZERO, Vec3::ONE)
}

pub fn gamma_correct(col: Vec3) -> Vec3 {
    pow(col, GAMMA)
}

/// Linear scene colour to display-ready `[0, 1]` RGB.
pub fn post_process(col: Vec3) -> Vec3 {
    gamma_correct(aces_film(col))
}
