use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::generate::entry_corner_rotation;
use crate::segment::PipeSegment;
use crate::shape::PipeShape;

pub const SPACING_DEFAULT: f32 = 2.0;
/// Largest width or height a grid accepts.
pub const MAX_GRID_DIMENSION: usize = 1024;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring coordinate, or `None` past the edge of the `i32` range.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dx, dy) = dir.offset();
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Corner opposite the origin of a `width` x `height` grid.
    pub fn last_cell(width: usize, height: usize) -> Self {
        Self {
            x: last_index(width),
            y: last_index(height),
        }
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Generation-checked reference to a segment owned by a [`PipeGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentHandle {
    index: u32,
    generation: u32,
}

impl SegmentHandle {
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentSlot {
    Cell(GridCoord),
    Entry,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryExit {
    pub entry_side: Direction,
    pub exit_side: Direction,
}

#[derive(Clone, Debug)]
struct ArenaEntry {
    slot: SegmentSlot,
    segment: PipeSegment,
}

#[derive(Clone, Debug)]
pub struct PipeGrid {
    width: usize,
    height: usize,
    spacing: f32,
    origin: [f32; 3],
    generation: u32,
    segments: Vec<Option<ArenaEntry>>,
    cells: Vec<Option<u32>>,
    start: GridCoord,
    end: GridCoord,
    entry_exit: Option<EntryExit>,
    entry: Option<u32>,
    exit: Option<u32>,
}

impl PipeGrid {
    /// Empty grid; dimensions are clamped to `1..=MAX_GRID_DIMENSION` with a warning.
    pub fn new(width: usize, height: usize) -> Self {
        let (width, height) = checked_dimensions(width, height);
        Self {
            width,
            height,
            spacing: SPACING_DEFAULT,
            origin: [0.0; 3],
            generation: 0,
            segments: Vec::new(),
            cells: vec![None; width * height],
            start: GridCoord::new(0, 0),
            end: GridCoord::last_cell(width, height),
            entry_exit: None,
            entry: None,
            exit: None,
        }
    }

    /// Drops every segment and resizes; handles issued before the call go stale.
    pub(crate) fn reset(&mut self, width: usize, height: usize) {
        let (width, height) = checked_dimensions(width, height);
        self.width = width;
        self.height = height;
        self.generation = self.generation.wrapping_add(1);
        self.segments.clear();
        self.cells = vec![None; width * height];
        self.entry_exit = None;
        self.entry = None;
        self.exit = None;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: f32) {
        if spacing.is_finite() && spacing > 0.0 {
            self.spacing = spacing;
        } else {
            log::warn!("ignoring invalid pipe spacing {spacing}");
        }
    }

    pub fn origin(&self) -> [f32; 3] {
        self.origin
    }

    pub fn set_origin(&mut self, origin: [f32; 3]) {
        self.origin = origin;
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    pub fn cell_index(&self, coord: GridCoord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    pub fn coord_of_index(&self, index: usize) -> Option<GridCoord> {
        if index >= self.cells.len() {
            return None;
        }
        Some(GridCoord::new(
            (index % self.width) as i32,
            (index / self.width) as i32,
        ))
    }

    pub fn neighbor(&self, coord: GridCoord, dir: Direction) -> Option<GridCoord> {
        let next = coord.step(dir)?;
        self.contains(next).then_some(next)
    }

    pub fn start(&self) -> GridCoord {
        self.start
    }

    pub fn end(&self) -> GridCoord {
        self.end
    }

    pub fn set_start(&mut self, coord: GridCoord) {
        if !self.contains(coord) {
            log::warn!(
                "start {coord} is outside the {}x{} grid",
                self.width,
                self.height
            );
        }
        self.start = coord;
    }

    pub fn set_end(&mut self, coord: GridCoord) {
        if !self.contains(coord) {
            log::warn!(
                "end {coord} is outside the {}x{} grid",
                self.width,
                self.height
            );
        }
        self.end = coord;
    }

    /// Puts `segment` into the cell at `coord`, replacing any previous occupant.
    pub fn place_segment(
        &mut self,
        coord: GridCoord,
        mut segment: PipeSegment,
    ) -> Option<SegmentHandle> {
        let Some(cell) = self.cell_index(coord) else {
            log::warn!(
                "cannot place {} pipe at {coord}: outside the {}x{} grid",
                segment.shape(),
                self.width,
                self.height
            );
            return None;
        };
        if let Some(previous) = self.cells[cell].take() {
            self.segments[previous as usize] = None;
        }
        segment.set_coord(Some(coord));
        let index = self.push_segment(SegmentSlot::Cell(coord), segment);
        self.cells[cell] = Some(index);
        Some(self.handle_for(index))
    }

    pub fn clear_cell(&mut self, coord: GridCoord) -> Option<PipeSegment> {
        let cell = self.cell_index(coord)?;
        let index = self.cells[cell].take()?;
        self.segments[index as usize]
            .take()
            .map(|entry| entry.segment)
    }

    pub fn handle_at(&self, coord: GridCoord) -> Option<SegmentHandle> {
        let cell = self.cell_index(coord)?;
        self.cells[cell].map(|index| self.handle_for(index))
    }

    pub fn segment_at(&self, coord: GridCoord) -> Option<&PipeSegment> {
        let cell = self.cell_index(coord)?;
        let index = self.cells[cell]?;
        self.segment_by_index(index)
    }

    pub fn segment(&self, handle: SegmentHandle) -> Option<&PipeSegment> {
        if handle.generation != self.generation {
            return None;
        }
        self.segment_by_index(handle.index)
    }

    pub fn segment_mut(&mut self, handle: SegmentHandle) -> Option<&mut PipeSegment> {
        if handle.generation != self.generation {
            return None;
        }
        self.segments
            .get_mut(handle.index as usize)
            .and_then(|entry| entry.as_mut())
            .map(|entry| &mut entry.segment)
    }

    pub fn slot_of(&self, handle: SegmentHandle) -> Option<SegmentSlot> {
        if handle.generation != self.generation {
            return None;
        }
        self.segments
            .get(handle.index as usize)
            .and_then(|entry| entry.as_ref())
            .map(|entry| entry.slot)
    }

    /// Handles of every live segment, grid cells first in row-major order.
    pub fn handles(&self) -> Vec<SegmentHandle> {
        let mut handles: Vec<SegmentHandle> = self
            .cells
            .iter()
            .flatten()
            .map(|index| self.handle_for(*index))
            .collect();
        handles.extend(self.entry.map(|index| self.handle_for(index)));
        handles.extend(self.exit.map(|index| self.handle_for(index)));
        handles
    }

    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn entry_exit(&self) -> Option<EntryExit> {
        self.entry_exit
    }

    pub fn entry_handle(&self) -> Option<SegmentHandle> {
        self.entry.map(|index| self.handle_for(index))
    }

    pub fn exit_handle(&self) -> Option<SegmentHandle> {
        self.exit.map(|index| self.handle_for(index))
    }

    pub fn entry_segment(&self) -> Option<&PipeSegment> {
        self.entry.and_then(|index| self.segment_by_index(index))
    }

    pub fn exit_segment(&self) -> Option<&PipeSegment> {
        self.exit.and_then(|index| self.segment_by_index(index))
    }

    /// Enables entry/exit gating and spawns the two corner segments.
    pub fn enable_entry_exit(&mut self, entry_side: Direction, exit_side: Direction) {
        let entry = PipeSegment::with_rotation(
            PipeShape::Corner,
            entry_corner_rotation(entry_side) as i32,
        );
        let exit = PipeSegment::with_rotation(
            PipeShape::Corner,
            entry_corner_rotation(exit_side) as i32,
        );
        self.attach_entry_exit(
            EntryExit {
                entry_side,
                exit_side,
            },
            Some(entry),
            Some(exit),
        );
    }

    /// Turns gating on with the given segments; `None` leaves a slot empty.
    pub(crate) fn attach_entry_exit(
        &mut self,
        entry_exit: EntryExit,
        entry: Option<PipeSegment>,
        exit: Option<PipeSegment>,
    ) {
        self.remove_entry_exit();
        self.entry_exit = Some(entry_exit);
        if let Some(mut segment) = entry {
            segment.set_coord(None);
            let index = self.push_segment(SegmentSlot::Entry, segment);
            self.entry = Some(index);
        }
        if let Some(mut segment) = exit {
            segment.set_coord(None);
            let index = self.push_segment(SegmentSlot::Exit, segment);
            self.exit = Some(index);
        }
    }

    pub fn remove_entry_exit(&mut self) {
        for index in [self.entry.take(), self.exit.take()].into_iter().flatten() {
            self.segments[index as usize] = None;
        }
        self.entry_exit = None;
    }

    /// World-space centre of a cell; the grid is centred on `origin`.
    pub fn cell_position(&self, coord: GridCoord) -> [f32; 3] {
        let s = self.spacing;
        [
            self.origin[0] + coord.x as f32 * s - (self.width as f32 - 1.0) * s * 0.5,
            self.origin[1] + coord.y as f32 * s - (self.height as f32 - 1.0) * s * 0.5,
            self.origin[2],
        ]
    }

    pub fn entry_exit_position(&self, side: Direction, coord: GridCoord) -> [f32; 3] {
        let [x, y, z] = self.cell_position(coord);
        let (dx, dy) = side.offset();
        [
            x + dx as f32 * self.spacing,
            y + dy as f32 * self.spacing,
            z,
        ]
    }

    pub fn slot_position(&self, slot: SegmentSlot) -> Option<[f32; 3]> {
        match (slot, self.entry_exit) {
            (SegmentSlot::Cell(coord), _) => Some(self.cell_position(coord)),
            (SegmentSlot::Entry, Some(sides)) => {
                Some(self.entry_exit_position(sides.entry_side, self.start))
            }
            (SegmentSlot::Exit, Some(sides)) => {
                Some(self.entry_exit_position(sides.exit_side, self.end))
            }
            _ => None,
        }
    }

    /// Steps every animation by `dt`; returns the handles whose turn completed.
    pub fn advance(&mut self, dt: f32) -> Vec<SegmentHandle> {
        let generation = self.generation;
        self.segments
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entry)| {
                let entry = entry.as_mut()?;
                entry.segment.advance(dt).then_some(SegmentHandle {
                    index: index as u32,
                    generation,
                })
            })
            .collect()
    }

    pub fn finish_rotations(&mut self) -> usize {
        let mut snapped = 0;
        for entry in self.segments.iter_mut().flatten() {
            if entry.segment.finish_rotation() {
                snapped += 1;
            }
        }
        snapped
    }

    pub fn is_animating(&self) -> bool {
        self.segments
            .iter()
            .flatten()
            .any(|entry| entry.segment.is_rotating())
    }

    fn push_segment(&mut self, slot: SegmentSlot, segment: PipeSegment) -> u32 {
        let index = self.segments.len() as u32;
        self.segments.push(Some(ArenaEntry { slot, segment }));
        index
    }

    fn segment_by_index(&self, index: u32) -> Option<&PipeSegment> {
        self.segments
            .get(index as usize)
            .and_then(|entry| entry.as_ref())
            .map(|entry| &entry.segment)
    }

    fn handle_for(&self, index: u32) -> SegmentHandle {
        SegmentHandle {
            index,
            generation: self.generation,
        }
    }
}

fn checked_dimensions(width: usize, height: usize) -> (usize, usize) {
    let clamped = (
        width.clamp(1, MAX_GRID_DIMENSION),
        height.clamp(1, MAX_GRID_DIMENSION),
    );
    if clamped != (width, height) {
        log::warn!(
            "grid dimensions {width}x{height} clamped to {}x{}",
            clamped.0,
            clamped.1
        );
    }
    clamped
}

fn last_index(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX).saturating_sub(1).max(0)
}
