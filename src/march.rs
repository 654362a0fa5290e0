//! Ray/height-field intersection.
//!
//! The ray advances by a fixed fraction of its height above the terrain, so
//! steps shrink near the surface and grow in open air.  Once a step ends
//! below the terrain, the crossing is refined by bisection between the last
//! two samples.

use crate::config::MarchParams;
use crate::ray::Ray;
use crate::terrain::{Detail, HeightField};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trace {
    Hit { distance: f32 },
    /// Nothing was hit within the maximum distance.
    Sky,
}

impl Trace {
    /// Distance along the ray, with `Sky` mapped to `max_distance`.
    pub fn distance(self, max_distance: f32) -> f32 {
        match self {
            Trace::Hit { distance } => distance,
            Trace::Sky => max_distance,
        }
    }

    pub fn is_sky(self) -> bool {
        matches!(self, Trace::Sky)
    }
}

/// Binary search for the surface crossing between `near` (above) and `far`
/// (below).  Returns the last midpoint, which is within
/// `(far - near) / 2^steps` of the crossing.
pub fn bisect<H: HeightField>(
    field: &H,
    ray: &Ray,
    near: f32,
    far: f32,
    params: &MarchParams,
) -> f32 {
    let mut near = near;
    let mut far = far;
    let mut midpoint = (far + near) * 0.5;

    for _ in 0..params.bisection_steps {
        let p = ray.at(midpoint);
        let diff = p.y - field.height(p, Detail::March);

        if diff.abs() < params.epsilon {
            break;
        }
        if diff < params.epsilon {
            far = midpoint;
        } else {
            near = midpoint;
        }
        midpoint = (far + near) * 0.5;
    }
    midpoint
}

/// Marches `ray` through the height field.
pub fn intersect<H: HeightField>(
    field: &H,
    ray: &Ray,
    max_distance: f32,
    params: &MarchParams,
) -> Trace {
    // Level or rising rays above the highest peak can never come back down.
    if ray.dir.y >= 0.0 && ray.origin.y > field.max_height(Detail::March) {
        return Trace::Sky;
    }

    let mut step = 0.0;
    let mut dist = 0.0;

    for _ in 0..params.max_steps {
        let p = ray.at(dist);
        let height = field.height(p, Detail::March);
        let diff = (p.y - height).abs();

        if diff < params.epsilon {
            return Trace::Hit { distance: dist };
        }

        // Overshot: the crossing lies within the last step.
        if p.y < height {
            let distance = bisect(field, ray, dist - step, dist, params);
            return Trace::Hit { distance };
        }

        step = diff * params.step_fraction;
        dist += step;

        if dist > max_distance {
            return Trace::Sky;
        }
    }
    // Out of steps: best approximation so far.
    Trace::Hit { distance: dist }
}
