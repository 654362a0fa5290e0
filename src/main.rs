use anyhow::{Context, Result};
use glam::Vec3Swizzles;
use std::path::PathBuf;
use structopt::StructOpt;
use terrain_marcher::camera::Camera;
use terrain_marcher::config::Config;
use terrain_marcher::controls::{Controls, FlightPlan};
use terrain_marcher::export::{
    FrameInfo, export_frame_info, export_height_map, export_noise_table, save_frame,
};
use terrain_marcher::noise::NoiseTable;
use terrain_marcher::render::{RenderContext, render_frame};
use terrain_marcher::sun::Sun;
use terrain_marcher::terrain::{Detail, FbmTerrain, HeightField};

#[derive(Debug, StructOpt)]
#[structopt(name = "terrain-marcher", about = "CPU raymarched fractal terrain")]
struct Opt {
    /// JSON config; missing fields take their defaults.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Output root; frames land in `<output>/<seed>/`.
    #[structopt(short = "o", long, parse(from_os_str))]
    output: Option<PathBuf>,

    #[structopt(long)]
    frames: Option<u32>,

    #[structopt(long)]
    seed: Option<u32>,

    #[structopt(long)]
    width: Option<u32>,

    #[structopt(long)]
    height: Option<u32>,

    /// Render-resolution multiplier, 0.2 to 1.0.
    #[structopt(long)]
    quality: Option<f32>,

    #[structopt(long)]
    no_hud: bool,
}

impl Opt {
    fn apply(&self, cfg: &mut Config) {
        if let Some(dir) = &self.output {
            cfg.output.dir = dir.clone();
        }
        if let Some(frames) = self.frames {
            cfg.animation.frames = frames;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(w) = self.width {
            cfg.viewport.width = w;
        }
        if let Some(h) = self.height {
            cfg.viewport.height = h;
        }
        if let Some(q) = self.quality {
            cfg.viewport.quality = q;
        }
        if self.no_hud {
            cfg.output.hud = false;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    let mut cfg = match &opt.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    opt.apply(&mut cfg);
    log::debug!("{cfg:?}");

    let seed = cfg.seed.unwrap_or_else(rand::random);
    let table = match &cfg.noise_texture {
        Some(path) => {
            log::info!("noise table from {}", path.display());
            NoiseTable::load(path)
                .with_context(|| format!("failed to load noise texture {}", path.display()))?
        }
        None => {
            log::info!("noise table from seed {seed}");
            NoiseTable::from_seed(seed)
        }
    };
    let terrain = FbmTerrain::new(table, cfg.terrain.clone());

    let dir = cfg.output.dir.join(seed.to_string());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut camera = Camera::from_config(&cfg.camera);
    let mut sun = Sun::from_config(&cfg.sun);
    let controls = Controls::from_config(&cfg.camera);
    let plan = FlightPlan::new(cfg.animation.flight.clone());

    if cfg.output.noise_preview {
        export_noise_table(terrain.table(), &dir.join("noise_table.png"))?;
    }
    if cfg.output.height_map {
        export_height_map(
            &terrain,
            camera.position.xz(),
            cfg.output.height_map_extent,
            cfg.output.height_map_size,
            &dir.join("height_map.png"),
        )?;
    }

    let frames = cfg.animation.frames.max(plan.total_frames());
    let dt = 1.0 / cfg.animation.fps.max(1e-3);
    let (width, height) = cfg.viewport.render_size();
    let upscale = cfg
        .output
        .upscale
        .then_some((cfg.viewport.width, cfg.viewport.height));
    log::info!(
        "rendering {frames} frame(s) at {width}x{height}, peak height {:.1}",
        terrain.max_height(Detail::March)
    );

    let mut time = 0.0;
    for index in 0..frames {
        // Input is replayed between frames, never during one.
        if index > 0 {
            controls.apply(&mut camera, &plan.input_at(index - 1), dt);
            sun.advance(cfg.animation.sun_elevation_step, cfg.animation.sun_azimuth_step);
            time += dt;
        }

        let ctx = RenderContext::builder()
            .terrain(&terrain)
            .params(&cfg.shader)
            .camera(&camera)
            .sun(sun)
            .viewport(width, height)
            .fov(cfg.camera.fov_degrees)
            .eye_height(cfg.camera.height_offset)
            .time(time)
            .build()?;
        let frame = render_frame(&ctx);
        let info = FrameInfo::new(index, &ctx, &camera, &sun, &frame);

        let png = dir.join(format!("frame_{index:04}.png"));
        let hud = if cfg.output.hud { info.hud_lines() } else { Vec::new() };
        save_frame(&frame, &png, upscale, &hud)
            .with_context(|| format!("failed to write {}", png.display()))?;
        if cfg.output.metadata {
            export_frame_info(&info, &dir.join(format!("frame_{index:04}.json")))?;
        }

        log::info!(
            "frame {index:04}: {:.1} ms, sky {:.0}%",
            info.render_ms,
            info.sky_fraction * 100.0
        );
    }

    log::info!("frames written to {}/", dir.display());
    Ok(())
}
