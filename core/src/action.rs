use crate::generate::GridConfig;
use crate::grid::{GridCoord, SegmentHandle};

/// Commands a host feeds into a [`crate::PipePuzzle`].
#[derive(Clone, Debug)]
pub enum PuzzleAction {
    Activate,
    Deactivate,
    Rotate {
        handle: SegmentHandle,
        clockwise: bool,
    },
    RotateAt {
        coord: GridCoord,
        clockwise: bool,
    },
    Tick {
        dt: f32,
    },
    Check,
    Regenerate {
        config: Box<GridConfig>,
    },
}
