use crate::config::AtmosphereParams;
use crate::math::mix;
use glam::Vec3;

pub const SKY_COLOUR: Vec3 = Vec3::new(0.65 * 0.09, 0.65 * 0.33, 0.65 * 0.81);
pub const SUN_COLOUR: Vec3 = Vec3::new(1.0, 1.0, 0.8);

/// Sky gradient, darker when looking up.
pub fn sky_colour(ray_dir: Vec3) -> Vec3 {
    mix(SKY_COLOUR, 0.2 * SKY_COLOUR, ray_dir.y)
}

/// Exponential height fog.  The density falls off with the ray origin's
/// altitude, and the colour warms towards the sun.
///
/// `dist` is `None` for rays that reached the sky.
pub fn apply_fog(
    rgb: Vec3,
    dist: Option<f32>,
    ray_origin: Vec3,
    ray_dir: Vec3,
    sun_dir: Vec3,
    params: &AtmosphereParams,
) -> Vec3 {
    let dist = dist.unwrap_or(params.horizon_distance);
    let mut dir_y = ray_dir.y;
    if dir_y.abs() < 1e-4 {
        dir_y = 1e-4;
    }

    let b = params.fog_density;
    let fog_amount = (-ray_origin.y * b).exp() * (1.0 - (-dist * dir_y * b).exp()) / dir_y;
    let sun_amount = ray_dir.dot(sun_dir).max(0.0);
    let haze = Vec3::from(params.haze_colour);
    let fog_colour = mix(haze, Vec3::ONE, sun_amount.powf(params.sun_haze_power));
    mix(rgb, fog_colour, fog_amount.clamp(0.0, 1.0))
}

/// Falloff `(radius / dist)^intensity`, with `dist` kept above zero.
pub fn glow(dist: f32, radius: f32, intensity: f32) -> f32 {
    let dist = dist.max(1e-6);
    (radius / dist).powf(intensity)
}

/// Sun disc for rays that reached the sky.
pub fn sun_glow(ray_dir: Vec3, sun_dir: Vec3, params: &AtmosphereParams) -> Vec3 {
    let mu = ray_dir.dot(sun_dir);
    SUN_COLOUR * glow(1.0 - mu, params.glow_radius, params.glow_intensity)
}
