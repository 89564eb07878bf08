use crate::direction::Direction;
use crate::grid::GridCoord;
use crate::shape::{normalize_steps, ConnectionMask, PipeShape};

pub const ROTATION_STEP_DEG: f32 = 90.0;
pub const ROTATION_SPEED_DEFAULT: f32 = 5.0;
pub const ROTATION_SPEED_MIN: f32 = 0.01;
const ANIMATION_EPSILON: f32 = 1e-5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotationState {
    Idle,
    Rotating {
        clockwise: bool,
        elapsed: f32,
        duration: f32,
    },
}

/// A single rotatable pipe piece.
///
/// Connections change only when a rotation completes, so a segment that is
/// not rotating always reports its canonical openings turned by
/// `rotation_steps` quarter turns.
#[derive(Clone, Debug, PartialEq)]
pub struct PipeSegment {
    shape: PipeShape,
    connections: ConnectionMask,
    rotation_steps: u8,
    rotation_speed: f32,
    state: RotationState,
    coord: Option<GridCoord>,
}

impl PipeSegment {
    pub fn new(shape: PipeShape) -> Self {
        Self {
            shape,
            connections: shape.canonical(),
            rotation_steps: 0,
            rotation_speed: ROTATION_SPEED_DEFAULT,
            state: RotationState::Idle,
            coord: None,
        }
    }

    pub fn with_rotation(shape: PipeShape, steps: i32) -> Self {
        let mut segment = Self::new(shape);
        segment.set_initial_rotation(steps);
        segment
    }

    pub fn shape(&self) -> PipeShape {
        self.shape
    }

    pub fn connections(&self) -> ConnectionMask {
        self.connections
    }

    pub fn has_connection(&self, dir: Direction) -> bool {
        self.connections.has(dir)
    }

    pub fn rotation_steps(&self) -> u8 {
        self.rotation_steps
    }

    pub fn rotation_deg(&self) -> f32 {
        self.rotation_steps as f32 * ROTATION_STEP_DEG
    }

    pub fn coord(&self) -> Option<GridCoord> {
        self.coord
    }

    pub(crate) fn set_coord(&mut self, coord: Option<GridCoord>) {
        self.coord = coord;
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self.state, RotationState::Rotating { .. })
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn set_rotation_speed(&mut self, speed: f32) {
        if speed.is_finite() {
            self.rotation_speed = speed.max(ROTATION_SPEED_MIN);
        }
    }

    /// Seconds one quarter turn takes.
    pub fn rotation_duration(&self) -> f32 {
        1.0 / self.rotation_speed
    }

    /// Step count the segment settles on once the current rotation finishes.
    pub fn pending_rotation_steps(&self) -> u8 {
        match self.state {
            RotationState::Idle => self.rotation_steps,
            RotationState::Rotating { clockwise, .. } => {
                normalize_steps(self.rotation_steps as i32 + step_delta(clockwise))
            }
        }
    }

    /// Starts a quarter turn. Requests made while a turn is in flight are dropped.
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if self.is_rotating() {
            return false;
        }
        self.state = RotationState::Rotating {
            clockwise,
            elapsed: 0.0,
            duration: self.rotation_duration(),
        };
        true
    }

    /// Advances the animation clock. Returns true on the call that completes the turn.
    pub fn advance(&mut self, dt: f32) -> bool {
        let RotationState::Rotating {
            clockwise,
            elapsed,
            duration,
        } = self.state
        else {
            return false;
        };
        let elapsed = elapsed + dt.max(0.0);
        if elapsed + ANIMATION_EPSILON >= duration {
            self.complete_rotation(clockwise);
            true
        } else {
            self.state = RotationState::Rotating {
                clockwise,
                elapsed,
                duration,
            };
            false
        }
    }

    pub fn finish_rotation(&mut self) -> bool {
        match self.state {
            RotationState::Rotating { clockwise, .. } => {
                self.complete_rotation(clockwise);
                true
            }
            RotationState::Idle => false,
        }
    }

    /// Places the segment at `steps` clockwise quarter turns from its canonical
    /// orientation without animating. Any turn in flight is discarded.
    pub fn set_initial_rotation(&mut self, steps: i32) {
        let steps = normalize_steps(steps);
        self.state = RotationState::Idle;
        self.rotation_steps = 0;
        self.connections = self.shape.canonical();
        for _ in 0..steps {
            self.complete_rotation(true);
        }
    }

    /// Rendered angle in degrees, interpolated while a turn is in flight.
    pub fn visual_angle(&self) -> f32 {
        let base = self.rotation_deg();
        match self.state {
            RotationState::Idle => base,
            RotationState::Rotating {
                clockwise,
                elapsed,
                duration,
            } => {
                let t = if duration > 0.0 {
                    (elapsed / duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let sign = if clockwise { 1.0 } else { -1.0 };
                (base + sign * ROTATION_STEP_DEG * t).rem_euclid(360.0)
            }
        }
    }

    fn complete_rotation(&mut self, clockwise: bool) {
        self.connections = if clockwise {
            self.connections.rotated_cw()
        } else {
            self.connections.rotated_ccw()
        };
        self.rotation_steps = normalize_steps(self.rotation_steps as i32 + step_delta(clockwise));
        self.state = RotationState::Idle;
    }
}

fn step_delta(clockwise: bool) -> i32 {
    if clockwise {
        1
    } else {
        3
    }
}
