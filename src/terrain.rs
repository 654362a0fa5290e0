use crate::config::TerrainParams;
use crate::noise::NoiseTable;
use glam::{Mat2, Vec2, Vec3, Vec3Swizzles, vec2};

/// Octave count is capped at this many layers regardless of the requested
/// detail.
pub const MAX_OCTAVES: u32 = 9;

/// The first octaves are folded into ridges, the rest add signed noise.
const RIDGE_OCTAVES: u32 = 3;
const RIDGE_GAIN: f32 = 2.5;
const BASE_FREQUENCY: f32 = 1.72;
const BASE_AMPLITUDE: f32 = 0.5;
const LACUNARITY: f32 = 2.5;
const GAIN: f32 = 0.25;

/// Per-octave domain transform applied as `xz * mat2(1, -.75, .75, 1)`.
/// Rotates and stretches by 1.25, breaking up axis-aligned features.
fn octave_matrix() -> Mat2 {
    Mat2::from_cols(vec2(1.0, -0.75), vec2(0.75, 1.0)).transpose()
}

/// How finely the height field is resolved.  Coarse detail is cheap,
/// fine detail sharpens normals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detail {
    /// Placing the eye above the ground.
    Camera,
    /// Primary and shadow marching.
    March,
    /// Normal estimation.
    Normal,
}

/// A scalar elevation over the xz plane.
pub trait HeightField: Sync {
    /// Terrain elevation below `pos.xz`.  `pos.y` is ignored.
    fn height(&self, pos: Vec3, detail: Detail) -> f32;

    /// Vertical scale of the field.  Shadow rays stop marching at twice this.
    fn height_scale(&self) -> f32;

    /// Upper bound on `height` at the given detail.  Nothing lies above it.
    fn max_height(&self, detail: Detail) -> f32;
}

/// Fractal Brownian Motion terrain over a noise lookup table.
pub struct FbmTerrain {
    table: NoiseTable,
    params: TerrainParams,
}

impl FbmTerrain {
    pub fn new(table: NoiseTable, params: TerrainParams) -> Self {
        Self { table, params }
    }

    pub fn table(&self) -> &NoiseTable {
        &self.table
    }

    pub fn octaves(&self, detail: Detail) -> u32 {
        match detail {
            Detail::Camera => self.params.camera_octaves,
            Detail::March => self.params.march_octaves,
            Detail::Normal => self.params.normal_octaves,
        }
    }

    /// Multi-octave noise at `xz` in noise space, roughly `[-1, 2]` before
    /// height scaling.
    ///
    /// * `limit` — stop after this many octaves (at most [`MAX_OCTAVES`]).
    pub fn fbm(&self, mut xz: Vec2, limit: u32) -> f32 {
        let m = octave_matrix();
        let mut res = 0.0;
        let mut freq = BASE_FREQUENCY;
        let mut amp = BASE_AMPLITUDE;

        for i in 0..MAX_OCTAVES.min(limit) {
            if i < RIDGE_OCTAVES {
                // Fold the noise into sharp crests.
                res += (1.0 - self.table.noised(freq * 0.5 * xz).abs()) * amp * RIDGE_GAIN;
            } else {
                res += self.table.noised(freq * xz) * amp;
            }
            freq *= LACUNARITY;
            amp *= GAIN;
            xz = m * xz;
        }
        res
    }
}

impl HeightField for FbmTerrain {
    fn height(&self, pos: Vec3, detail: Detail) -> f32 {
        let xz = self.params.scale * pos.xz();
        self.params.height * self.fbm(xz, self.octaves(detail))
    }

    fn height_scale(&self) -> f32 {
        self.params.height
    }

    fn max_height(&self, detail: Detail) -> f32 {
        let mut bound = 0.0;
        let mut amp = BASE_AMPLITUDE;
        for i in 0..MAX_OCTAVES.min(self.octaves(detail)) {
            bound += if i < RIDGE_OCTAVES {
                amp * RIDGE_GAIN
            } else {
                amp * 0.5
            };
            amp *= GAIN;
        }
        self.params.height * bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    fn terrain() -> FbmTerrain {
        FbmTerrain::new(NoiseTable::from_seed(2024), TerrainParams::default())
    }

    #[test]
    fn octave_matrix_matches_row_vector_product() {
        let v = vec2(2.0, 4.0);
        let r = octave_matrix() * v;
        assert_eq!(r, vec2(2.0 - 0.75 * 4.0, 0.75 * 2.0 + 4.0));
    }

    #[test]
    fn height_is_deterministic() {
        let a = terrain();
        let b = terrain();
        for &(x, z) in &[(0.0, 0.0), (371.0, -706.0), (-1234.5, 88.25)] {
            let p = vec3(x, 0.0, z);
            assert_eq!(a.height(p, Detail::March), b.height(p, Detail::March));
            assert_eq!(a.height(p, Detail::Normal), b.height(p, Detail::Normal));
        }
    }

    #[test]
    fn height_ignores_y() {
        let t = terrain();
        let a = t.height(vec3(10.0, -50.0, 20.0), Detail::March);
        let b = t.height(vec3(10.0, 900.0, 20.0), Detail::March);
        assert_eq!(a, b);
    }

    #[test]
    fn height_is_continuous() {
        let t = terrain();
        let delta = 1e-2;
        let mut x = -600.0f32;
        while x < 600.0 {
            let z = x * 0.61 + 37.0;
            for detail in [Detail::March, Detail::Normal] {
                let h0 = t.height(vec3(x, 0.0, z), detail);
                let hx = t.height(vec3(x + delta, 0.0, z), detail);
                let hz = t.height(vec3(x, 0.0, z + delta), detail);
                assert!((h0 - hx).abs() < 0.25, "jump at x={x}: {h0} vs {hx}");
                assert!((h0 - hz).abs() < 0.25, "jump at z={z}: {h0} vs {hz}");
            }
            x += 7.3;
        }
    }

    #[test]
    fn height_stays_under_bound() {
        let t = terrain();
        let bound = t.max_height(Detail::March);
        let mut x = -2000.0f32;
        while x < 2000.0 {
            let h = t.height(vec3(x, 0.0, -x * 0.3), Detail::March);
            assert!(h <= bound + 1e-3);
            x += 13.0;
        }
    }

    #[test]
    fn octave_limit_caps_at_nine() {
        let t = terrain();
        let xz = vec2(0.3, 1.7);
        assert_eq!(t.fbm(xz, 9), t.fbm(xz, 40));
        assert_ne!(t.fbm(xz, 2), t.fbm(xz, 5));
    }

    #[test]
    fn constant_table_is_flat() {
        let t = FbmTerrain::new(NoiseTable::constant(0), TerrainParams::default());
        let h = t.height(vec3(5.0, 0.0, 5.0), Detail::March);
        assert_eq!(h, t.height(vec3(-900.0, 0.0, 31.0), Detail::March));
        assert_eq!(h, t.height(vec3(1e4, 0.0, -3e3), Detail::March));
        // Ridge octaves give 0.5 * 2.5 * (0.5 + 0.125 + 0.03125), the two
        // signed octaves subtract 0.5 * (0.0078125 + 0.001953125).
        let expected = 200.0 * (0.5 * 2.5 * 0.65625 - 0.5 * 0.009765625);
        assert!((h - expected).abs() < 1e-3);
    }
}
