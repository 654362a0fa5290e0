use crate::config::CameraConfig;
use glam::{Mat3, Vec3, vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

const UP: Vec3 = Vec3::Y;

/// Free-look camera driven by yaw/pitch angles.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub view_direction: Vec3,
    /// Columns are right, up and backward.  Maps view space to world space.
    pub basis: Mat3,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        let view_direction = vec3(yaw.sin(), pitch.sin(), yaw.cos());
        Self {
            position,
            yaw,
            pitch,
            view_direction,
            basis: look_at(view_direction, UP),
        }
    }

    pub fn from_config(cfg: &CameraConfig) -> Self {
        Self::new(Vec3::from(cfg.position), cfg.yaw, cfg.pitch)
    }

    /// Applies a mouse drag in pixels and rebuilds the basis.
    pub fn rotate(&mut self, dx: f32, dy: f32, yaw_sensitivity: f32, pitch_sensitivity: f32) {
        self.yaw += (dx * yaw_sensitivity) % TAU;
        let horizontal = vec3(self.yaw.sin(), 0.0, self.yaw.cos()).normalize();

        self.pitch += (dy * pitch_sensitivity) % TAU;
        self.pitch = self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);

        self.view_direction = vec3(horizontal.x, self.pitch.sin(), horizontal.z);
        self.basis = look_at(self.view_direction, UP);
    }

    /// Horizontal direction to the camera's left.
    pub fn left(&self) -> Vec3 {
        UP.cross(self.view_direction)
    }

    /// Moves across the xz plane.  `forward` and `left` are signed unit
    /// amounts; the height is left to the terrain.
    pub fn translate(&mut self, forward: f32, left: f32, distance: f32) {
        let side = self.left();
        self.position.x += distance * (forward * self.view_direction.x + left * side.x);
        self.position.z += distance * (forward * self.view_direction.z + left * side.z);
    }
}

/// Orthonormal camera basis facing `target_dir`: columns right, up, -forward.
pub fn look_at(target_dir: Vec3, up: Vec3) -> Mat3 {
    let zaxis = target_dir.normalize();
    let xaxis = zaxis.cross(up).normalize();
    let yaxis = xaxis.cross(zaxis);
    Mat3::from_cols(xaxis, yaxis, -zaxis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(m: &Mat3) {
        let cols = [m.x_axis, m.y_axis, m.z_axis];
        for (i, a) in cols.iter().enumerate() {
            assert!((a.length() - 1.0).abs() < 1e-4, "column {i} not unit: {a}");
            for b in cols.iter().skip(i + 1) {
                assert!(a.dot(*b).abs() < 1e-4, "columns not orthogonal: {a} {b}");
            }
        }
    }

    #[test]
    fn default_camera_basis_is_orthonormal() {
        let cam = Camera::from_config(&CameraConfig::default());
        assert_orthonormal(&cam.basis);
    }

    #[test]
    fn basis_stays_orthonormal_under_rotation() {
        let mut cam = Camera::new(Vec3::ZERO, 0.3, 0.0);
        for i in 0..500 {
            let dx = ((i * 37) % 101) as f32 - 50.0;
            let dy = ((i * 53) % 89) as f32 - 44.0;
            cam.rotate(dx, dy * 10.0, 0.005, 0.002);
            assert_orthonormal(&cam.basis);
            assert!(cam.pitch.abs() <= FRAC_PI_2);
        }
    }

    #[test]
    fn basis_maps_forward_to_view_direction() {
        let cam = Camera::new(Vec3::ZERO, 1.1, -0.3);
        let forward = cam.basis * vec3(0.0, 0.0, -1.0);
        assert!((forward - cam.view_direction.normalize()).length() < 1e-5);
    }

    #[test]
    fn pitch_clamps_at_the_poles() {
        let mut cam = Camera::new(Vec3::ZERO, 0.0, 0.0);
        cam.rotate(0.0, 5000.0, 0.005, 0.002);
        assert_eq!(cam.pitch, FRAC_PI_2);
        assert_orthonormal(&cam.basis);
    }

    #[test]
    fn translate_stays_on_the_ground_plane() {
        let mut cam = Camera::new(vec3(10.0, 5.0, 10.0), 0.0, 0.4);
        cam.translate(1.0, 0.0, 2.0);
        assert!((cam.position - vec3(10.0, 5.0, 12.0)).length() < 1e-5);
        cam.translate(0.0, 1.0, 3.0);
        // Facing +z, left is +x.
        assert!((cam.position - vec3(13.0, 5.0, 12.0)).length() < 1e-5);
    }
}
