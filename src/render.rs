//! Per-frame render context and the per-pixel pipeline:
//! ray → march → shade → fog → tone map.

use crate::atmosphere::{apply_fog, sky_colour, sun_glow};
use crate::camera::Camera;
use crate::config::ShaderParams;
use crate::error::RenderError;
use crate::lighting::{normal, shade};
use crate::march::{Trace, intersect};
use crate::ray::{Ray, ray_direction, to_world};
use crate::sun::Sun;
use crate::terrain::{Detail, FbmTerrain, HeightField};
use crate::tonemap::post_process;
use glam::{Mat3, Vec2, Vec3, vec2};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Everything one frame reads.  Built fresh for every frame and never
/// mutated while pixels are being evaluated.
pub struct RenderContext<'a> {
    pub terrain: &'a FbmTerrain,
    pub params: &'a ShaderParams,
    pub eye: Vec3,
    pub basis: Mat3,
    pub sun_dir: Vec3,
    pub resolution: Vec2,
    pub fov_degrees: f32,
    pub time: f32,
}

impl<'a> RenderContext<'a> {
    pub fn builder() -> RenderContextBuilder<'a> {
        RenderContextBuilder::default()
    }

    pub fn width(&self) -> u32 {
        self.resolution.x as u32
    }

    pub fn height(&self) -> u32 {
        self.resolution.y as u32
    }
}

#[derive(Default)]
pub struct RenderContextBuilder<'a> {
    terrain: Option<&'a FbmTerrain>,
    params: Option<&'a ShaderParams>,
    camera: Option<&'a Camera>,
    sun: Option<Sun>,
    viewport: Option<(u32, u32)>,
    fov_degrees: Option<f32>,
    eye_height: Option<f32>,
    time: f32,
}

impl<'a> RenderContextBuilder<'a> {
    pub fn terrain(mut self, terrain: &'a FbmTerrain) -> Self {
        self.terrain = Some(terrain);
        self
    }

    pub fn params(mut self, params: &'a ShaderParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn camera(mut self, camera: &'a Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn sun(mut self, sun: Sun) -> Self {
        self.sun = Some(sun);
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Some((width, height));
        self
    }

    pub fn fov(mut self, degrees: f32) -> Self {
        self.fov_degrees = Some(degrees);
        self
    }

    /// Height of the eye above the coarse terrain under the camera.
    pub fn eye_height(mut self, offset: f32) -> Self {
        self.eye_height = Some(offset);
        self
    }

    pub fn time(mut self, time: f32) -> Self {
        self.time = time;
        self
    }

    /// Checks every binding and reports all the missing ones together.
    pub fn build(self) -> Result<RenderContext<'a>, RenderError> {
        let mut missing = Vec::new();
        if self.terrain.is_none() {
            missing.push("terrain");
        }
        if self.params.is_none() {
            missing.push("params");
        }
        if self.camera.is_none() {
            missing.push("camera");
        }
        if self.sun.is_none() {
            missing.push("sun");
        }
        if self.viewport.is_none() {
            missing.push("viewport");
        }
        if self.fov_degrees.is_none() {
            missing.push("fov");
        }
        if self.eye_height.is_none() {
            missing.push("eye_height");
        }

        let (
            Some(terrain),
            Some(params),
            Some(camera),
            Some(sun),
            Some((width, height)),
            Some(fov_degrees),
            Some(eye_height),
        ) = (
            self.terrain,
            self.params,
            self.camera,
            self.sun,
            self.viewport,
            self.fov_degrees,
            self.eye_height,
        )
        else {
            return Err(RenderError::MissingBindings(missing));
        };

        if width == 0 || height == 0 {
            return Err(RenderError::InvalidViewport { width, height });
        }

        let mut eye = camera.position;
        eye.y = terrain.height(eye, Detail::Camera) + eye_height;

        Ok(RenderContext {
            terrain,
            params,
            eye,
            basis: camera.basis,
            sun_dir: sun.direction(),
            resolution: vec2(width as f32, height as f32),
            fov_degrees,
            time: self.time,
        })
    }
}

/// World-space ray through a fragment.
pub fn primary_ray(ctx: &RenderContext, frag_coord: Vec2) -> Ray {
    let view_dir = ray_direction(ctx.fov_degrees, frag_coord, ctx.resolution);
    Ray::new(ctx.eye, to_world(&ctx.basis, view_dir))
}

/// Linear colour and trace result for one fragment, before tone mapping.
pub fn trace_pixel(ctx: &RenderContext, frag_coord: Vec2) -> (Vec3, Trace) {
    let ray = primary_ray(ctx, frag_coord);
    let params = ctx.params;
    let trace = intersect(ctx.terrain, &ray, params.march.max_distance, &params.march);

    let mut col = match trace {
        Trace::Sky => sky_colour(ray.dir),
        Trace::Hit { distance } => {
            let position = ray.at(distance);
            let n = normal(ctx.terrain, position, distance);
            shade(
                ctx.terrain,
                ctx.terrain.table(),
                position,
                n,
                ray.dir,
                distance,
                ctx.sun_dir,
                params,
            )
        }
    };

    let fog_dist = match trace {
        Trace::Hit { distance } => Some(distance),
        Trace::Sky => None,
    };
    col = apply_fog(col, fog_dist, ray.origin, ray.dir, ctx.sun_dir, &params.atmosphere);

    if trace.is_sky() {
        col += sun_glow(ray.dir, ctx.sun_dir, &params.atmosphere);
    }
    (col, trace)
}

/// Display-ready `[0, 1]` RGB for one fragment.
pub fn render_pixel(ctx: &RenderContext, frag_coord: Vec2) -> Vec3 {
    post_process(trace_pixel(ctx, frag_coord).0)
}

/// A rendered frame: display-ready RGB, row 0 at the top.
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
    pub sky_fraction: f32,
    pub elapsed: Duration,
}

impl Frame {
    pub fn pixel(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Renders every pixel.  Rows run in parallel; pixels are independent.
pub fn render_frame(ctx: &RenderContext) -> Frame {
    let started = Instant::now();
    let width = ctx.width();
    let height = ctx.height();
    let mut pixels = vec![Vec3::ZERO; (width * height) as usize];

    let sky_pixels: usize = pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .map(|(row, line)| {
            // Fragment coordinates grow upwards; image rows grow downwards.
            let frag_y = (height - 1 - row as u32) as f32 + 0.5;
            let mut sky = 0;
            for (x, pixel) in line.iter_mut().enumerate() {
                let (col, trace) = trace_pixel(ctx, vec2(x as f32 + 0.5, frag_y));
                if trace.is_sky() {
                    sky += 1;
                }
                *pixel = post_process(col);
            }
            sky
        })
        .sum();

    Frame {
        width,
        height,
        sky_fraction: sky_pixels as f32 / (width * height) as f32,
        pixels,
        elapsed: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ShaderParams, TerrainParams};
    use crate::noise::NoiseTable;
    use glam::vec3;

    #[test]
    fn builder_reports_every_missing_binding() {
        let err = RenderContext::builder().time(1.0).build().err().unwrap();
        match err {
            RenderError::MissingBindings(missing) => assert_eq!(
                missing,
                vec!["terrain", "params", "camera", "sun", "viewport", "fov", "eye_height"]
            ),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn builder_reports_only_what_is_missing() {
        let terrain = FbmTerrain::new(NoiseTable::constant(0), TerrainParams::default());
        let params = ShaderParams::default();
        let err = RenderContext::builder()
            .terrain(&terrain)
            .params(&params)
            .fov(30.0)
            .build()
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "missing render bindings: camera, sun, viewport, eye_height"
        );
    }

    #[test]
    fn builder_rejects_empty_viewport() {
        let terrain = FbmTerrain::new(NoiseTable::constant(0), TerrainParams::default());
        let params = ShaderParams::default();
        let camera = Camera::new(Vec3::ZERO, 0.0, 0.0);
        let result = RenderContext::builder()
            .terrain(&terrain)
            .params(&params)
            .camera(&camera)
            .sun(Sun::new(0.2, 1.0))
            .viewport(0, 10)
            .fov(30.0)
            .eye_height(30.0)
            .build();
        assert!(matches!(
            result,
            Err(RenderError::InvalidViewport {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn flat_field_hit_matches_plane_intersection() {
        // A constant table flattens the field.
        let terrain = FbmTerrain::new(NoiseTable::constant(0), TerrainParams::default());
        let params = ShaderParams::default();
        let camera = Camera::new(vec3(100.0, 0.0, -50.0), 0.4, -0.5);
        let ctx = RenderContext::builder()
            .terrain(&terrain)
            .params(&params)
            .camera(&camera)
            .sun(Sun::new(0.3, 1.0))
            .viewport(32, 24)
            .fov(30.0)
            .eye_height(30.0)
            .build()
            .unwrap();

        let ground = terrain.height(Vec3::ZERO, Detail::March);
        assert!((ctx.eye.y - (terrain.height(Vec3::ZERO, Detail::Camera) + 30.0)).abs() < 1e-4);

        for frag in [vec2(16.0, 12.0), vec2(3.5, 2.5), vec2(30.5, 8.5)] {
            let ray = primary_ray(&ctx, frag);
            assert!(ray.dir.y < 0.0);
            let analytic = (ground - ray.origin.y) / ray.dir.y;
            let (_, trace) = trace_pixel(&ctx, frag);
            let Trace::Hit { distance } = trace else {
                panic!("expected a hit at {frag}, got {trace:?}");
            };
            assert!(
                (distance - analytic).abs() < 1e-2,
                "{frag}: {distance} vs {analytic}"
            );
        }
    }

    #[test]
    fn small_frame_renders_in_range() {
        let terrain = FbmTerrain::new(NoiseTable::from_seed(99), TerrainParams::default());
        let params = ShaderParams::default();
        let camera = Camera::new(vec3(371.0, 0.0, -706.0), 0.78, -0.12);
        let ctx = RenderContext::builder()
            .terrain(&terrain)
            .params(&params)
            .camera(&camera)
            .sun(Sun::new(0.2, 1.633))
            .viewport(12, 8)
            .fov(30.0)
            .eye_height(30.0)
            .build()
            .unwrap();
        let frame = render_frame(&ctx);
        assert_eq!(frame.pixels.len(), 96);
        // Row 0 is the top of the screen.
        assert_eq!(frame.pixel(2, 0), render_pixel(&ctx, vec2(2.5, 7.5)));
        assert_eq!(frame.pixel(9, 7), render_pixel(&ctx, vec2(9.5, 0.5)));
        assert!((0.0..=1.0).contains(&frame.sky_fraction));
        for p in &frame.pixels {
            assert!(p.is_finite());
            assert!(p.min_element() >= 0.0 && p.max_element() <= 1.0);
        }
    }

    #[test]
    fn looking_up_sees_only_sky() {
        let terrain = FbmTerrain::new(NoiseTable::from_seed(5), TerrainParams::default());
        let params = ShaderParams::default();
        let mut camera = Camera::new(vec3(0.0, 0.0, 0.0), 0.0, 0.0);
        camera.rotate(0.0, 700.0, 0.005, 0.002);
        let ctx = RenderContext::builder()
            .terrain(&terrain)
            .params(&params)
            .camera(&camera)
            .sun(Sun::new(0.2, 1.633))
            .viewport(6, 4)
            .fov(30.0)
            .eye_height(terrain.max_height(Detail::March))
            .build()
            .unwrap();
        let frame = render_frame(&ctx);
        assert_eq!(frame.sky_fraction, 1.0);
    }
}
