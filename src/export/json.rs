use crate::camera::Camera;
use crate::error::RenderError;
use crate::render::{Frame, RenderContext};
use crate::sun::Sun;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Per-frame sidecar metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameInfo {
    pub frame: u32,
    pub time: f32,
    /// Eye position after the height offset, i.e. where rays start.
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub sun_elevation: f32,
    pub sun_azimuth: f32,
    pub sun_direction: Vec3,
    pub width: u32,
    pub height: u32,
    pub render_ms: f64,
    pub sky_fraction: f32,
}

impl FrameInfo {
    pub fn new(index: u32, ctx: &RenderContext, camera: &Camera, sun: &Sun, frame: &Frame) -> Self {
        Self {
            frame: index,
            time: ctx.time,
            eye: ctx.eye,
            yaw: camera.yaw,
            pitch: camera.pitch,
            sun_elevation: sun.elevation,
            sun_azimuth: sun.azimuth,
            sun_direction: ctx.sun_dir,
            width: frame.width,
            height: frame.height,
            render_ms: frame.elapsed.as_secs_f64() * 1000.0,
            sky_fraction: frame.sky_fraction,
        }
    }

    /// One-line-per-stat summary for the image HUD.
    pub fn hud_lines(&self) -> Vec<String> {
        vec![
            format!("frame {:>4}  t {:.2}s", self.frame, self.time),
            format!("{:.1} ms  {}x{}", self.render_ms, self.width, self.height),
            format!("sky {:.0}%", self.sky_fraction * 100.0),
            format!("eye {:.0} {:.0} {:.0}", self.eye.x, self.eye.y, self.eye.z),
        ]
    }
}

pub fn export_frame_info(info: &FrameInfo, path: &Path) -> Result<(), RenderError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, info)?;
    out.write_all(b"\n")?;
    out.flush()?;
    log::debug!("[json] wrote {}", path.display());
    Ok(())
}
