use crate::foundation::core::{FrameIndex, Vec2};

/// Horizontal sway: three full periods per loop, 1.5 px amplitude.
const SWAY_CYCLES: f64 = 3.0;
const SWAY_AMP_PX: f64 = 1.5;
/// Vertical bob: one and a half periods per loop, 0.8 px amplitude.
const BOB_CYCLES: f64 = 1.5;
const BOB_AMP_PX: f64 = 0.8;

/// Flicker displacement of the flame for `frame` out of `frame_count`.
///
/// Pure and stateless. A `frame_count` of zero samples the loop start.
pub fn flicker_offset(frame: FrameIndex, frame_count: u32) -> Vec2 {
    let t = if frame_count == 0 {
        0.0
    } else {
        f64::from(frame.0) / f64::from(frame_count)
    };
    let tau = std::f64::consts::TAU;
    Vec2::new(
        (tau * SWAY_CYCLES * t).sin() * SWAY_AMP_PX,
        (tau * BOB_CYCLES * t).cos() * BOB_AMP_PX,
    )
}

/// A disc of integer offsets around the flame center.
///
/// The disc's own center follows the flicker offset scaled by `follow`, so the inner lobe trails
/// the outer one by half.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlameLobe {
    pub radius_sq: f64,
    pub follow: f64,
}

pub const OUTER_LOBE: FlameLobe = FlameLobe {
    radius_sq: 10.0,
    follow: 1.0,
};

pub const INNER_LOBE: FlameLobe = FlameLobe {
    radius_sq: 3.0,
    follow: 0.5,
};

impl FlameLobe {
    /// Offsets `(x, y)` with `(x - fx)^2 + (y - fy)^2 < radius_sq`, in row-major order.
    pub fn offsets(&self, flicker: Vec2) -> Vec<(i32, i32)> {
        let center = flicker * self.follow;
        let reach = (self.radius_sq.sqrt() + center.x.abs().max(center.y.abs())).ceil() as i32;

        let mut out = Vec::new();
        for y in -reach..=reach {
            for x in -reach..=reach {
                let dx = f64::from(x) - center.x;
                let dy = f64::from(y) - center.y;
                if dx * dx + dy * dy < self.radius_sq {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/flame.rs"]
mod tests;
