/// Shader-style scalar and vector helpers shared by the lighting, atmosphere
/// and post-process stages.
use glam::{Vec3, vec3};
use std::ops::{Add, Mul, Sub};

pub fn saturate(x: f32) -> f32 {
    x.max(0.0).min(1.0)
}

/// Hermite interpolation between two edges.  Also valid when
/// `edge0 > edge1`, which gives a falling ramp.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let x = saturate((x - edge0) / (edge1 - edge0));
    x * x * (3.0 - 2.0 * x)
}

pub fn mix<X: Copy + Mul<A, Output = X> + Add<Output = X> + Sub<Output = X>, A: Copy>(
    x: X,
    y: X,
    a: A,
) -> X {
    x - x * a + y * a
}

/// Component-wise `powf`.
pub fn pow(v: Vec3, power: f32) -> Vec3 {
    vec3(v.x.powf(power), v.y.powf(power), v.z.powf(power))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_hits_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn reversed_smoothstep_falls() {
        // Fades fine rock detail out with distance.
        assert_eq!(smoothstep(75.0, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(75.0, 0.0, 80.0), 0.0);
        assert!(smoothstep(75.0, 0.0, 20.0) > smoothstep(75.0, 0.0, 50.0));
    }

    #[test]
    fn mix_blends_vectors() {
        let v = mix(Vec3::ZERO, Vec3::ONE, 0.25);
        assert!((v - Vec3::splat(0.25)).length() < 1e-6);
    }
}
