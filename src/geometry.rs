//! Directional flip geometry: clip half-planes, rotation endpoints,
//! perspective.
//!
//! Each step's visual is a rotation of a clipped wrapper in front of a
//! static background mask. The direction determines which half-plane is
//! clipped for the outgoing and incoming faces, the sign of the rotation
//! endpoint, and (unless overridden) the perspective distance. The
//! payload produced here is consumed by an external renderer - this
//! module draws nothing.

use glam::Vec2;
use web_time::Duration;

use crate::policy::Direction;

/// Overshoot margin applied to clip polygons, in container-size
/// multiples. Keeps clip edges clear of the container bounds while faces
/// rotate (the CSS original overshoots by ±100vw/±100vh for the same
/// reason).
pub const CLIP_OVERSHOOT: f32 = 100.0;

/// Perspective distance as a multiple of the container extent along the
/// flip axis, used when no explicit override is configured.
pub const PERSPECTIVE_FACTOR: f32 = 4.0;

/// Rotation axis of a flip step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    /// Horizontal axis - vertical flips (up/down).
    X,
    /// Vertical axis - horizontal flips (left/right).
    Y,
}

/// One of the four half-planes of the container, in normalized
/// container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfPlane {
    /// Everything above the horizontal midline.
    Upper,
    /// Everything below the horizontal midline.
    Lower,
    /// Everything left of the vertical midline.
    Left,
    /// Everything right of the vertical midline.
    Right,
}

impl HalfPlane {
    /// Corner polygon of the half-plane, clockwise from the top-left
    /// corner, in normalized container space with overshoot margins.
    #[must_use]
    pub fn polygon(self) -> [Vec2; 4] {
        let o = CLIP_OVERSHOOT;
        let (x0, x1, y0, y1) = match self {
            Self::Upper => (-o, 1.0 + o, -o, 0.5),
            Self::Lower => (-o, 1.0 + o, 0.5, 1.0 + o),
            Self::Left => (-o, 0.5, -o, 1.0 + o),
            Self::Right => (0.5, 1.0 + o, -o, 1.0 + o),
        };
        [
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    }
}

/// Direction-tagged geometry payload for one flip step.
///
/// The rotating wrapper starts clipped to `rotating_clip_start` and
/// switches to `rotating_clip_end` at the rotation midpoint; the static
/// background mask (present only when there is an outgoing face) covers
/// `background_clip` so the outgoing face's stale half never shows once
/// the rotation passes the midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipGeometry {
    /// Direction this geometry was built for.
    pub direction: Direction,
    /// Rotation axis: X for the vertical family, Y for the horizontal.
    pub axis: RotationAxis,
    /// Rotation endpoint in degrees (±180).
    pub rotation_end_deg: f32,
    /// Clip of the rotating wrapper at animation start.
    pub rotating_clip_start: HalfPlane,
    /// Clip of the rotating wrapper from the midpoint on.
    pub rotating_clip_end: HalfPlane,
    /// Clip of the static background mask; `None` when there is no
    /// outgoing face (the initial flip).
    pub background_clip: Option<HalfPlane>,
    /// Perspective distance in host units.
    pub perspective: f32,
    /// Step duration.
    pub duration: Duration,
}

impl FlipGeometry {
    /// Build the geometry for one step.
    ///
    /// `container_size` is the host container extent in host units;
    /// `perspective_override` takes precedence over the derived
    /// perspective. `has_outgoing` is false only for the initial flip,
    /// when nothing was displayed before.
    #[must_use]
    pub fn for_direction(
        direction: Direction,
        container_size: Vec2,
        perspective_override: Option<f32>,
        duration: Duration,
        has_outgoing: bool,
    ) -> Self {
        let (axis, rotation_end_deg, start, end) = match direction {
            Direction::Down => {
                (RotationAxis::X, -180.0, HalfPlane::Upper, HalfPlane::Lower)
            }
            Direction::Up => {
                (RotationAxis::X, 180.0, HalfPlane::Lower, HalfPlane::Upper)
            }
            Direction::Left => {
                (RotationAxis::Y, -180.0, HalfPlane::Right, HalfPlane::Left)
            }
            Direction::Right => {
                (RotationAxis::Y, 180.0, HalfPlane::Left, HalfPlane::Right)
            }
        };

        Self {
            direction,
            axis,
            rotation_end_deg,
            rotating_clip_start: start,
            rotating_clip_end: end,
            background_clip: has_outgoing.then_some(end),
            perspective: perspective_override
                .unwrap_or_else(|| derive_perspective(direction, container_size)),
            duration,
        }
    }
}

/// Perspective derived from the container's own size: a fixed multiple
/// of the extent along the flip axis, floored at one host unit.
fn derive_perspective(direction: Direction, container_size: Vec2) -> f32 {
    let extent = if direction.is_vertical() {
        container_size.y
    } else {
        container_size.x
    };
    extent.max(1.0) * PERSPECTIVE_FACTOR
}
