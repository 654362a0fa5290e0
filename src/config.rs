//! Run configuration.  Every section has a default, so a config file only
//! needs to name the values it changes.
//!
//! The shading and atmosphere coefficients are empirically tuned and kept
//! as opaque numbers.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for the generated noise table.  `None` picks one at random.
    pub seed: Option<u32>,
    /// Greyscale 256×256 image to use instead of a generated table.
    pub noise_texture: Option<PathBuf>,
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub sun: SunConfig,
    pub terrain: TerrainParams,
    pub shader: ShaderParams,
    pub animation: AnimationConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    /// Render-resolution multiplier in `[0.2, 1.0]`.
    pub quality: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            quality: 0.5,
        }
    }
}

impl ViewportConfig {
    /// Size of the buffer actually traced.
    pub fn render_size(&self) -> (u32, u32) {
        let q = self.quality.clamp(0.2, 1.0);
        (
            ((self.width as f32 * q) as u32).max(1),
            ((self.height as f32 * q) as u32).max(1),
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Left/right, radians.
    pub yaw: f32,
    /// Up/down, radians in `[-π/2, π/2]`.
    pub pitch: f32,
    /// World units per second.
    pub speed: f32,
    pub fov_degrees: f32,
    /// Eye height above the coarse terrain under the camera.
    pub height_offset: f32,
    pub yaw_sensitivity: f32,
    pub pitch_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [371.0, 0.0, -706.0],
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: -0.12,
            speed: 50.0,
            fov_degrees: 30.0,
            height_offset: 30.0,
            yaw_sensitivity: 0.005,
            pitch_sensitivity: 0.002,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    /// Height over the horizon in `[0, π/2]`.
    pub elevation: f32,
    /// Rotation around Y in `[0, 2π]`.
    pub azimuth: f32,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            elevation: 0.2,
            azimuth: 1.633,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Vertical scale applied to the fbm output.
    pub height: f32,
    /// Horizontal scale from world units to noise space.
    pub scale: f32,
    pub camera_octaves: u32,
    pub march_octaves: u32,
    pub normal_octaves: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            height: 200.0,
            scale: 0.005,
            camera_octaves: 2,
            march_octaves: 5,
            normal_octaves: 9,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderParams {
    pub march: MarchParams,
    pub shadow: ShadowParams,
    pub shading: ShadingParams,
    pub atmosphere: AtmosphereParams,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchParams {
    pub max_steps: u32,
    pub max_distance: f32,
    pub epsilon: f32,
    pub bisection_steps: u32,
    /// Fraction of the height gap taken as the next step.
    pub step_fraction: f32,
}

impl Default for MarchParams {
    fn default() -> Self {
        Self {
            max_steps: 250,
            max_distance: 3000.0,
            epsilon: 1e-4,
            bisection_steps: 8,
            step_fraction: 0.5,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowParams {
    pub steps: u32,
    /// 8 is soft, 128 is hard.
    pub sharpness: f32,
    /// Distance moved off the surface before marching towards the light.
    pub start_offset: f32,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            steps: 64,
            sharpness: 16.0,
            start_offset: 5.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingParams {
    pub snow_normal_y: f32,
    pub snow_line: f32,
    pub snow_line_normal_y: f32,
    pub snow_border_frequency: f32,
    pub snow_border_amplitude: f32,
    pub snow_specular: f32,
    pub rock_dark_normal_y: f32,
    /// Fine rock grain is only evaluated closer than this.
    pub rock_detail_distance: f32,
    /// Distance at which the grain has faded out completely.
    pub rock_detail_fade: f32,
    pub ambient_strength: f32,
    pub shininess: f32,
    pub specular_shadow_cutoff: f32,
    pub sun_weight: f32,
    pub sky_weight: f32,
    pub indirect_weight: f32,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            snow_normal_y: 0.65,
            snow_line: 1.55,
            snow_line_normal_y: 0.5,
            snow_border_frequency: 0.2,
            snow_border_amplitude: 14.0,
            snow_specular: 0.2,
            rock_dark_normal_y: 0.5,
            rock_detail_distance: 80.0,
            rock_detail_fade: 75.0,
            ambient_strength: 0.15,
            shininess: 32.0,
            specular_shadow_cutoff: 0.75,
            sun_weight: 1.2,
            sky_weight: 0.2,
            indirect_weight: 0.3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphereParams {
    /// Fog fade rate.
    pub fog_density: f32,
    /// Distance used for sky rays so the horizon reads hazier.
    pub horizon_distance: f32,
    pub haze_colour: [f32; 3],
    pub sun_haze_power: f32,
    pub glow_radius: f32,
    pub glow_intensity: f32,
}

impl Default for AtmosphereParams {
    fn default() -> Self {
        Self {
            fog_density: 0.012,
            horizon_distance: 4000.0,
            haze_colour: [0.5, 0.6, 0.7],
            sun_haze_power: 8.0,
            glow_radius: 0.00015,
            glow_intensity: 0.9,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub frames: u32,
    pub fps: f32,
    /// Sun elevation change per frame, radians.
    pub sun_elevation_step: f32,
    /// Sun azimuth change per frame, radians.
    pub sun_azimuth_step: f32,
    pub flight: Vec<FlightSegment>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 1,
            fps: 30.0,
            sun_elevation_step: 0.0,
            sun_azimuth_step: 0.0,
            flight: Vec::new(),
        }
    }
}

/// Input held for a run of frames.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightSegment {
    pub frames: u32,
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Mouse drag per frame, in pixels.
    pub mouse_dx: f32,
    pub mouse_dy: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Stamp frame stats into the corner of each image.
    pub hud: bool,
    /// Write a JSON sidecar per frame.
    pub metadata: bool,
    /// Scale frames back up to the viewport size.
    pub upscale: bool,
    pub height_map: bool,
    pub height_map_size: u32,
    /// World units covered by the height map, centred on the camera.
    pub height_map_extent: f32,
    pub noise_preview: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("renders"),
            hud: true,
            metadata: true,
            upscale: true,
            height_map: false,
            height_map_size: 512,
            height_map_extent: 4000.0,
            noise_preview: false,
        }
    }
}
