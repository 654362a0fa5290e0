use crate::camera::Camera;
use crate::config::{CameraConfig, FlightSegment};

/// Movement keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Input applied between two frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub keys: Keys,
    /// Mouse drag in pixels.
    pub mouse_delta: (f32, f32),
}

impl From<&FlightSegment> for FrameInput {
    fn from(seg: &FlightSegment) -> Self {
        Self {
            keys: Keys {
                forward: seg.forward,
                backward: seg.backward,
                left: seg.left,
                right: seg.right,
            },
            mouse_delta: (seg.mouse_dx, seg.mouse_dy),
        }
    }
}

/// Mouse-look and WASD movement for a [`Camera`].
pub struct Controls {
    pub speed: f32,
    pub yaw_sensitivity: f32,
    pub pitch_sensitivity: f32,
}

impl Controls {
    pub fn from_config(cfg: &CameraConfig) -> Self {
        Self {
            speed: cfg.speed,
            yaw_sensitivity: cfg.yaw_sensitivity,
            pitch_sensitivity: cfg.pitch_sensitivity,
        }
    }

    /// Advances the camera by `dt` seconds of input.
    pub fn apply(&self, camera: &mut Camera, input: &FrameInput, dt: f32) {
        let (dx, dy) = input.mouse_delta;
        if dx != 0.0 || dy != 0.0 {
            camera.rotate(dx, dy, self.yaw_sensitivity, self.pitch_sensitivity);
        }

        let keys = input.keys;
        let forward = keys.forward as i32 - keys.backward as i32;
        let left = keys.left as i32 - keys.right as i32;
        if forward != 0 || left != 0 {
            camera.translate(forward as f32, left as f32, dt * self.speed);
        }
    }
}

/// Scripted input, one entry per frame.  Frames past the end of the plan get
/// no input.
pub struct FlightPlan {
    segments: Vec<FlightSegment>,
}

impl FlightPlan {
    pub fn new(segments: Vec<FlightSegment>) -> Self {
        Self { segments }
    }

    pub fn input_at(&self, frame: u32) -> FrameInput {
        let mut start = 0;
        for seg in &self.segments {
            if frame < start + seg.frames {
                return FrameInput::from(seg);
            }
            start += seg.frames;
        }
        FrameInput::default()
    }

    pub fn total_frames(&self) -> u32 {
        self.segments.iter().map(|s| s.frames).sum()
    }
}
