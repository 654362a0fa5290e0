/// Diagnostic images of the terrain inputs.
///
/// | File             | Range        | Description                                  |
/// |------------------|--------------|----------------------------------------------|
/// | height_map.png   | [0, max]     | March-detail elevation around the camera     |
/// | noise_table.png  | [0, 255]     | The 256×256 lookup table, as raw grey bytes  |
///
/// The height map uses a hypsometric ramp: valley green → grass → rock →
/// grey scree → snow, with elevations rescaled by the field's analytic
/// maximum.
use crate::error::RenderError;
use crate::noise::{NoiseTable, TABLE_SIZE};
use crate::terrain::{Detail, FbmTerrain, HeightField};
use glam::{Vec2, vec3};
use image::{GrayImage, Luma, Rgb, RgbImage};
use rayon::prelude::*;
use std::path::Path;

// ── Colour map ────────────────────────────────────────────────────────────────

/// Colour stops over normalised elevation, ascending.
const ELEVATION_RAMP: [(f32, [u8; 3]); 5] = [
    (0.0, [34, 70, 40]),
    (0.3, [96, 128, 62]),
    (0.55, [128, 104, 78]),
    (0.75, [150, 150, 150]),
    (1.0, [250, 250, 255]),
];

/// Piecewise-linear lookup into [`ELEVATION_RAMP`].  `t` is clamped to [0, 1].
fn elevation_colour(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let upper = ELEVATION_RAMP
        .iter()
        .position(|&(stop, _)| stop >= t)
        .unwrap_or(ELEVATION_RAMP.len() - 1)
        .max(1);
    let (t0, c0) = ELEVATION_RAMP[upper - 1];
    let (t1, c1) = ELEVATION_RAMP[upper];
    let f = (t - t0) / (t1 - t0);
    std::array::from_fn(|i| (c0[i] as f32 + (c1[i] as f32 - c0[i] as f32) * f).round() as u8)
}

// ── Writers ───────────────────────────────────────────────────────────────────

/// Top-down elevation map, `size`×`size` pixels covering `extent` world
/// units centred on `centre`.  North (+z) is up.
pub fn export_height_map(
    terrain: &FbmTerrain,
    centre: Vec2,
    extent: f32,
    size: u32,
    path: &Path,
) -> Result<(), RenderError> {
    let size = size.max(1);
    let max_height = terrain.max_height(Detail::March).max(1e-3);
    let texel = extent / size as f32;
    let origin = centre - Vec2::splat(extent * 0.5);

    let mut heights = vec![0.0f32; (size * size) as usize];
    heights
        .par_chunks_mut(size as usize)
        .enumerate()
        .for_each(|(row, line)| {
            let z = origin.y + (size - 1 - row as u32) as f32 * texel + texel * 0.5;
            for (col, h) in line.iter_mut().enumerate() {
                let x = origin.x + col as f32 * texel + texel * 0.5;
                *h = terrain.height(vec3(x, 0.0, z), Detail::March);
            }
        });

    let mut img = RgbImage::new(size, size);
    for (i, &h) in heights.iter().enumerate() {
        let x = i as u32 % size;
        let y = i as u32 / size;
        img.put_pixel(x, y, Rgb(elevation_colour(h / max_height)));
    }
    img.save(path)?;
    log::info!("[diagnostics] wrote {}", path.display());
    Ok(())
}

/// Writes the noise table as a greyscale PNG.  Loading it back gives the
/// same table.
pub fn export_noise_table(table: &NoiseTable, path: &Path) -> Result<(), RenderError> {
    let img = GrayImage::from_fn(TABLE_SIZE, TABLE_SIZE, |x, y| {
        Luma([table.bytes()[(y * TABLE_SIZE + x) as usize]])
    });
    img.save(path)?;
    log::info!("[diagnostics] wrote {}", path.display());
    Ok(())
}
