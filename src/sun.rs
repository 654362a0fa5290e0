use crate::config::SunConfig;
use glam::{Vec3, vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

#[derive(Clone, Copy, Debug)]
pub struct Sun {
    /// Height over the horizon, `[0, π/2]`.
    pub elevation: f32,
    /// Rotation around the Y axis, `[0, 2π)`.
    pub azimuth: f32,
}

impl Sun {
    pub fn new(elevation: f32, azimuth: f32) -> Self {
        Self {
            elevation: elevation.clamp(0.0, FRAC_PI_2),
            azimuth: azimuth.rem_euclid(TAU),
        }
    }

    pub fn from_config(cfg: &SunConfig) -> Self {
        Self::new(cfg.elevation, cfg.azimuth)
    }

    /// Unit vector pointing at the sun.
    pub fn direction(&self) -> Vec3 {
        vec3(self.azimuth.sin(), self.elevation.sin(), self.azimuth.cos()).normalize()
    }

    pub fn advance(&mut self, d_elevation: f32, d_azimuth: f32) {
        *self = Self::new(self.elevation + d_elevation, self.azimuth + d_azimuth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_unit_length() {
        let mut e = 0.0;
        while e <= FRAC_PI_2 {
            let mut a = 0.0;
            while a < TAU {
                let d = Sun::new(e, a).direction();
                assert!((d.length() - 1.0).abs() < 1e-5);
                a += 0.31;
            }
            e += 0.13;
        }
    }

    #[test]
    fn angles_stay_in_range() {
        let mut sun = Sun::new(0.2, 1.633);
        for _ in 0..100 {
            sun.advance(0.05, 0.4);
        }
        assert_eq!(sun.elevation, FRAC_PI_2);
        assert!((0.0..TAU).contains(&sun.azimuth));
    }

    #[test]
    fn zenith_sun_points_up() {
        let d = Sun::new(FRAC_PI_2, 0.7).direction();
        assert!(d.y > 0.7);
    }
}
