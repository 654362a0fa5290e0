//! Surface normal, soft shadow and material shading for terrain hits.
//!
//! Three lights: a white sun with marched soft shadows, a blue sky light from
//! straight above, and a white fill opposite the sun standing in for bounce
//! light off the snow.

use crate::config::{ShaderParams, ShadingParams, ShadowParams};
use crate::math::{mix, smoothstep};
use crate::noise::NoiseTable;
use crate::terrain::{Detail, HeightField};
use glam::{Vec2, Vec3, Vec3Swizzles, vec3};

const SUN_LIGHT_COLOUR: Vec3 = Vec3::ONE;
const SPECULAR_COLOUR: Vec3 = Vec3::ONE;
const SKY_LIGHT_COLOUR: Vec3 = Vec3::new(0.12, 0.29, 0.55);
const INDIRECT_LIGHT_COLOUR: Vec3 = Vec3::ONE;

/// Smallest finite-difference offset, keeps hits at the eye well defined.
const MIN_NORMAL_OFFSET: f32 = 1e-4;

/// Central-difference normal.  The offset grows with hit distance so far
/// terrain isn't sampled below its screen footprint.
pub fn normal<H: HeightField>(field: &H, p: Vec3, t: f32) -> Vec3 {
    let eps = (0.001 * t).max(MIN_NORMAL_OFFSET);
    let h = |x: f32, z: f32| field.height(vec3(x, p.y, z), Detail::Normal);

    vec3(
        h(p.x - eps, p.z) - h(p.x + eps, p.z),
        2.0 * eps,
        h(p.x, p.z - eps) - h(p.x, p.z + eps),
    )
    .normalize()
}

/// Penumbra estimate from the smallest clearance/distance ratio seen while
/// marching towards the light.  `1.0` is fully lit.
pub fn soft_shadow<H: HeightField>(
    field: &H,
    pos: Vec3,
    light_dir: Vec3,
    params: &ShadowParams,
    epsilon: f32,
) -> f32 {
    let mut res: f32 = 1.0;
    let mut t = 1.0;

    // Start off the surface to avoid self-shadowing acne.
    let pos = pos + light_dir * params.start_offset * t;
    let ceiling = 2.0 * field.height_scale();

    for _ in 0..params.steps {
        let p = pos + t * light_dir;
        if p.y > ceiling {
            break;
        }

        let h = p.y - field.height(p, Detail::March);
        res = res.min(params.sharpness * h / t);

        t += h;
        if res < epsilon {
            break;
        }
    }
    res.clamp(0.0, 1.0)
}

/// Layered rock texture in `[0, 1]`: wavy horizontal strata plus fine grain
/// close to the camera.
pub fn rock_fbm(table: &NoiseTable, mut p: Vec3, dist: f32, s: &ShadingParams) -> f32 {
    let mut res = 0.0;
    let mut freq = 0.005;
    let mut amp = 0.5;

    // Fine grain shimmers at range, so fade it out.
    if dist < s.rock_detail_distance {
        let detail = smoothstep(s.rock_detail_fade, 0.0, dist);
        res += detail * table.noised(40.0 * p.xz());
    }

    p.y += table.noised(0.02 * p.xz()) * 150.0;

    for _ in 0..4 {
        res += table.sample(Vec2::splat(freq * p.y)) * amp;
        freq *= 1.5;
        amp *= 0.5;
    }
    res.clamp(0.0, 1.0)
}

struct Material {
    ambient: Vec3,
    diffuse: Vec3,
    specular_strength: f32,
}

fn is_snow(
    table: &NoiseTable,
    position: Vec3,
    normal: Vec3,
    height_scale: f32,
    s: &ShadingParams,
) -> bool {
    // Jitter the snow line so its border isn't a contour.
    let height = position.y
        + table.noised(s.snow_border_frequency * position.xz()) * s.snow_border_amplitude;
    normal.y > s.snow_normal_y
        || (height > height_scale * s.snow_line && normal.y > s.snow_line_normal_y)
}

fn material(
    table: &NoiseTable,
    position: Vec3,
    normal: Vec3,
    dist: f32,
    height_scale: f32,
    s: &ShadingParams,
) -> Material {
    if is_snow(table, position, normal, height_scale, s) {
        return Material {
            ambient: Vec3::ONE,
            diffuse: Vec3::ONE,
            specular_strength: s.snow_specular,
        };
    }

    let strata = rock_fbm(table, position, dist, s);
    let mut rock = mix(0.25 * vec3(0.3, 0.2, 0.1), Vec3::splat(0.8), 0.5 * strata);
    rock = mix(0.5 * rock, Vec3::splat(0.3), 0.5);

    // Darker blotches on steep faces.
    if normal.y < s.rock_dark_normal_y {
        rock *= 0.8;
    }

    Material {
        ambient: 0.75 * rock,
        diffuse: rock,
        specular_strength: 0.0,
    }
}

/// Linear colour of a terrain hit.
#[allow(clippy::too_many_arguments)]
pub fn shade<H: HeightField>(
    field: &H,
    table: &NoiseTable,
    position: Vec3,
    normal: Vec3,
    ray_dir: Vec3,
    dist: f32,
    light_dir: Vec3,
    params: &ShaderParams,
) -> Vec3 {
    let s = &params.shading;
    let mut mat = material(table, position, normal, dist, field.height_scale(), s);

    let halfway = (light_dir - ray_dir).normalize();
    let spec = normal.dot(halfway).max(0.0).powf(s.shininess);
    let specular = spec * SPECULAR_COLOUR * SUN_LIGHT_COLOUR;

    let shadow = soft_shadow(field, position, light_dir, &params.shadow, params.march.epsilon);
    if shadow < s.specular_shadow_cutoff {
        mat.specular_strength = 0.0;
    }

    let sun = normal.dot(light_dir).max(0.0);
    let sun_light = shadow * sun * SUN_LIGHT_COLOUR;

    let sky = normal.dot(Vec3::Y).max(0.0);
    let sky_light = sky * SKY_LIGHT_COLOUR;

    let indirect_dir = (vec3(-1.0, 0.0, -1.0) * light_dir).normalize_or_zero();
    let indirect = normal.dot(indirect_dir).max(0.0);
    let indirect_light = indirect * INDIRECT_LIGHT_COLOUR;

    let mut result =
        s.sun_weight * sun_light + s.sky_weight * sky_light + s.indirect_weight * indirect_light;
    result *= mat.diffuse;
    result + s.ambient_strength * mat.ambient + mat.specular_strength * specular
}
