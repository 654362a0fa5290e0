/// 256×256 grey noise lookup table and the value-noise primitive built on it.
///
/// The table stands in for a noise texture: lookups wrap like repeat
/// addressing, and `sample` filters bilinearly like a linear sampler.
use crate::error::RenderError;
use glam::Vec2;
use noise::{NoiseFn, Value};
use std::path::Path;

pub const TABLE_SIZE: u32 = 256;

pub struct NoiseTable {
    texels: Vec<u8>,
}

impl NoiseTable {
    /// Deterministic white noise: each texel is the lattice value of seeded
    /// value noise, quantised to a byte.
    pub fn from_seed(seed: u32) -> Self {
        let source = Value::new(seed);
        let mut texels = Vec::with_capacity((TABLE_SIZE * TABLE_SIZE) as usize);
        for y in 0..TABLE_SIZE {
            for x in 0..TABLE_SIZE {
                let v = source.get([x as f64, y as f64]);
                let byte = ((v + 1.0) * 0.5 * 255.0).round().clamp(0.0, 255.0);
                texels.push(byte as u8);
            }
        }
        Self { texels }
    }

    /// Loads a greyscale texture.  Colour images are reduced to luma.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let img = image::open(path)?.to_luma8();
        let (width, height) = img.dimensions();
        if width != TABLE_SIZE || height != TABLE_SIZE {
            return Err(RenderError::NoiseTableSize {
                expected: TABLE_SIZE,
                width,
                height,
            });
        }
        Ok(Self {
            texels: img.into_raw(),
        })
    }

    /// Uniform table.  Every `noised` lookup returns `value - 0.5`.
    pub fn constant(value: u8) -> Self {
        Self {
            texels: vec![value; (TABLE_SIZE * TABLE_SIZE) as usize],
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.texels
    }

    /// Texel value in `[0, 1]`; coordinates wrap.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> f32 {
        let n = TABLE_SIZE as i32;
        let idx = y.rem_euclid(n) * n + x.rem_euclid(n);
        self.texels[idx as usize] as f32 / 255.0
    }

    /// Bilinear lookup at normalised coordinates, texel centres at
    /// `(i + 0.5) / 256`.
    pub fn sample(&self, uv: Vec2) -> f32 {
        let p = uv * TABLE_SIZE as f32 - Vec2::splat(0.5);
        let i = p.floor();
        let f = p - i;
        let (x, y) = (lattice(i.x), lattice(i.y));

        let a = self.texel(x, y);
        let b = self.texel(x + 1, y);
        let c = self.texel(x, y + 1);
        let d = self.texel(x + 1, y + 1);

        let top = a + (b - a) * f.x;
        let bottom = c + (d - c) * f.x;
        top + (bottom - top) * f.y
    }

    /// Smooth value noise in `[-0.5, 0.5]`.
    ///
    /// Reads the four lattice texels around `x` and blends them with a cubic
    /// weight `u = f²(3 − 2f)`.  Continuous across cell boundaries.
    pub fn noised(&self, x: Vec2) -> f32 {
        let p = x.floor();
        let f = x - p;
        let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
        let (ix, iy) = (lattice(p.x), lattice(p.y));

        let a = self.texel(ix, iy);
        let b = self.texel(ix + 1, iy);
        let c = self.texel(ix, iy + 1);
        let d = self.texel(ix + 1, iy + 1);

        a + (b - a) * u.x + (c - a) * u.y + (a - b - c + d) * u.x * u.y - 0.5
    }
}

/// Integer lattice coordinate of a floored value, reduced into the table
/// first so the cast can't saturate and the `+ 1` neighbours can't overflow.
#[inline]
fn lattice(v: f32) -> i32 {
    v.rem_euclid(TABLE_SIZE as f32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn seeded_tables_are_deterministic() {
        let a = NoiseTable::from_seed(42);
        let b = NoiseTable::from_seed(42);
        let c = NoiseTable::from_seed(43);
        assert_eq!(a.bytes(), b.bytes());
        assert_ne!(a.bytes(), c.bytes());
    }

    #[test]
    fn seeded_table_spans_the_byte_range() {
        let t = NoiseTable::from_seed(1);
        let min = *t.bytes().iter().min().unwrap();
        let max = *t.bytes().iter().max().unwrap();
        assert!(min < 32, "min texel {min}");
        assert!(max > 223, "max texel {max}");
    }

    #[test]
    fn texel_lookups_wrap() {
        let t = NoiseTable::from_seed(9);
        assert_eq!(t.texel(-1, 0), t.texel(255, 0));
        assert_eq!(t.texel(3, 256), t.texel(3, 0));
        assert_eq!(t.texel(-257, -1), t.texel(255, 255));
    }

    #[test]
    fn noised_matches_texels_on_lattice() {
        let t = NoiseTable::from_seed(5);
        for &(x, y) in &[(0, 0), (17, 3), (255, 128), (-4, 300)] {
            let expected = t.texel(x, y) - 0.5;
            let got = t.noised(vec2(x as f32, y as f32));
            assert!((got - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn noised_is_bounded_and_continuous() {
        let t = NoiseTable::from_seed(11);
        let mut x = -20.0f32;
        while x < 20.0 {
            let v = t.noised(vec2(x, x * 0.37));
            assert!((-0.5..=0.5).contains(&v));
            // Lattice crossings are smooth, so a tiny step gives a tiny change.
            let w = t.noised(vec2(x + 1e-3, x * 0.37));
            assert!((v - w).abs() < 5e-3);
            x += 0.173;
        }
    }

    #[test]
    fn huge_coordinates_stay_in_range() {
        let t = NoiseTable::from_seed(17);
        for &v in &[3.0e9f32, -3.0e9, 1.0e20, -7.5e12, 1.0e30] {
            let n = t.noised(vec2(v, -v));
            assert!((-0.5..=0.5).contains(&n), "{v} -> {n}");
            let s = t.sample(vec2(v, 0.25 * v));
            assert!((0.0..=1.0).contains(&s), "{v} -> {s}");
        }
    }

    #[test]
    fn large_coordinates_match_their_wrapped_cell() {
        let t = NoiseTable::from_seed(9);
        let period = TABLE_SIZE as f32;
        for &(x, y) in &[(3.25, 7.5), (100.75, -20.125)] {
            let near = t.noised(vec2(x, y));
            let far = t.noised(vec2(x + 4096.0 * period, y - 1024.0 * period));
            assert!((near - far).abs() < 1e-3, "{near} vs {far}");
        }
    }

    #[test]
    fn sample_at_texel_centre_is_exact() {
        let t = NoiseTable::from_seed(3);
        let uv = vec2(10.5, 20.5) / TABLE_SIZE as f32;
        assert!((t.sample(uv) - t.texel(10, 20)).abs() < 1e-5);
    }

    #[test]
    fn constant_table_gives_flat_noise() {
        let t = NoiseTable::constant(128);
        let v = t.noised(vec2(12.3, -45.6));
        assert!((v - (128.0 / 255.0 - 0.5)).abs() < 1e-6);
    }
}
