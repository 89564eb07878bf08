pub mod action;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod connectivity;
pub mod direction;
pub mod error;
pub mod generate;
pub mod grid;
pub mod random;
pub mod segment;
pub mod session;
pub mod shape;
pub mod snapshot;

pub use action::PuzzleAction;
pub use catalog::{load_preset, preset_by_slug, PuzzlePreset, DEFAULT_PRESET_SLUG, PUZZLE_PRESETS};
pub use codec::{decode, encode};
pub use config::{load_puzzle, load_puzzle_file, parse_puzzle, PuzzleFile};
pub use connectivity::SolveReport;
pub use direction::{Direction, DIRECTIONS};
pub use error::{ConfigError, ParseNameError, SnapshotError};
pub use generate::{Distribution, GridConfig, ShapeSources};
pub use grid::{EntryExit, GridCoord, PipeGrid, SegmentHandle, SegmentSlot};
pub use segment::{PipeSegment, RotationState};
pub use session::{PipePuzzle, PuzzleEvent, PuzzleSubscriber, PuzzleSubscription};
pub use shape::{ConnectionMask, PipeShape, ALL_SHAPES};
pub use snapshot::{decode_grid, encode_grid, GridSnapshot, GRID_SNAPSHOT_VERSION};
