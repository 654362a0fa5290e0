use glam::{Mat3, Vec2, Vec3};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// View-space direction through `frag_coord`, looking down -Z.
///
/// `frag_coord` has its origin at the bottom-left of the viewport and pixel
/// centres at half-integers.
pub fn ray_direction(fov_degrees: f32, frag_coord: Vec2, resolution: Vec2) -> Vec3 {
    let xy = frag_coord - resolution / 2.0;
    let z = (0.5 * resolution.y) / (fov_degrees.to_radians() / 2.0).tan();
    xy.extend(-z).normalize()
}

/// Rotates a view-space direction into world space.
#[inline]
pub fn to_world(basis: &Mat3, dir: Vec3) -> Vec3 {
    (*basis * dir).normalize()
}
