use rkyv::{Archive, Deserialize, Serialize};

use crate::codec::{decode, encode};
use crate::direction::Direction;
use crate::error::SnapshotError;
use crate::grid::{EntryExit, GridCoord, PipeGrid, MAX_GRID_DIMENSION};
use crate::segment::PipeSegment;
use crate::shape::PipeShape;

pub const GRID_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub shape: u8,
    pub rotation_steps: u8,
    pub rotation_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct EntryExitSnapshot {
    pub entry_side: u8,
    pub exit_side: u8,
    pub entry: Option<CellSnapshot>,
    pub exit: Option<CellSnapshot>,
}

/// Settled state of a grid. Turns still in flight are recorded at their
/// starting orientation.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub version: u32,
    pub width: u32,
    pub height: u32,
    pub spacing: f32,
    pub origin: [f32; 3],
    pub start: (i32, i32),
    pub end: (i32, i32),
    pub cells: Vec<Option<CellSnapshot>>,
    pub entry_exit: Option<EntryExitSnapshot>,
}

impl CellSnapshot {
    pub fn capture(segment: &PipeSegment) -> Self {
        Self {
            shape: segment.shape().code(),
            rotation_steps: segment.rotation_steps(),
            rotation_speed: segment.rotation_speed(),
        }
    }

    pub fn restore(&self) -> Option<PipeSegment> {
        let shape = PipeShape::from_code(self.shape)?;
        let mut segment = PipeSegment::with_rotation(shape, self.rotation_steps as i32);
        segment.set_rotation_speed(self.rotation_speed);
        Some(segment)
    }
}

impl PipeGrid {
    pub fn snapshot(&self) -> GridSnapshot {
        let mut cells = Vec::with_capacity(self.width() * self.height());
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                cells.push(self.segment_at(GridCoord::new(x, y)).map(CellSnapshot::capture));
            }
        }
        let entry_exit = self.entry_exit().map(|sides| EntryExitSnapshot {
            entry_side: sides.entry_side.index() as u8,
            exit_side: sides.exit_side.index() as u8,
            entry: self.entry_segment().map(CellSnapshot::capture),
            exit: self.exit_segment().map(CellSnapshot::capture),
        });
        let start = self.start();
        let end = self.end();
        GridSnapshot {
            version: GRID_SNAPSHOT_VERSION,
            width: self.width() as u32,
            height: self.height() as u32,
            spacing: self.spacing(),
            origin: self.origin(),
            start: (start.x, start.y),
            end: (end.x, end.y),
            cells,
            entry_exit,
        }
    }

    /// Rebuilds a grid from a snapshot. Cells with unknown shape codes stay empty.
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<PipeGrid, SnapshotError> {
        if snapshot.version != GRID_SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                expected: GRID_SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        let in_range = |len: u32| (1..=MAX_GRID_DIMENSION).contains(&(len as usize));
        if !in_range(snapshot.width) || !in_range(snapshot.height) {
            return Err(SnapshotError::Dimensions {
                width: snapshot.width,
                height: snapshot.height,
            });
        }
        let width = snapshot.width as usize;
        let height = snapshot.height as usize;
        let expected = width * height;
        if snapshot.cells.len() != expected {
            return Err(SnapshotError::CellCount {
                expected,
                found: snapshot.cells.len(),
            });
        }

        let mut grid = PipeGrid::new(width, height);
        grid.set_spacing(snapshot.spacing);
        grid.set_origin(snapshot.origin);
        grid.set_start(snapshot.start.into());
        grid.set_end(snapshot.end.into());

        for (index, cell) in snapshot.cells.iter().enumerate() {
            let Some(cell) = cell else {
                continue;
            };
            let coord = GridCoord::new((index % width) as i32, (index / width) as i32);
            match cell.restore() {
                Some(segment) => {
                    grid.place_segment(coord, segment);
                }
                None => log::warn!("unknown shape code {} at {coord}, leaving empty", cell.shape),
            }
        }

        if let Some(saved) = &snapshot.entry_exit {
            if saved.entry_side < 4 && saved.exit_side < 4 {
                let sides = EntryExit {
                    entry_side: Direction::from_index(saved.entry_side as usize),
                    exit_side: Direction::from_index(saved.exit_side as usize),
                };
                let entry = saved.entry.and_then(|cell| cell.restore());
                let exit = saved.exit.and_then(|cell| cell.restore());
                grid.attach_entry_exit(sides, entry, exit);
            } else {
                log::warn!(
                    "invalid entry/exit sides {}/{} in snapshot, gating disabled",
                    saved.entry_side,
                    saved.exit_side
                );
            }
        }

        Ok(grid)
    }
}

/// Binary form of [`PipeGrid::snapshot`].
pub fn encode_grid(grid: &PipeGrid) -> Option<Vec<u8>> {
    encode(&grid.snapshot())
}

pub fn decode_grid(bytes: &[u8]) -> Result<PipeGrid, SnapshotError> {
    let snapshot = decode::<GridSnapshot>(bytes).ok_or(SnapshotError::Decode)?;
    PipeGrid::from_snapshot(&snapshot)
}
