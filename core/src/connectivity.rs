use crate::direction::{Direction, DIRECTIONS};
use crate::grid::{GridCoord, PipeGrid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolveReport {
    pub solved: bool,
    pub edges_consistent: bool,
    pub reachable: usize,
    pub populated: usize,
}

impl PipeGrid {
    /// Neighbour reached from `coord` through a matching pair of openings.
    pub fn linked_neighbor(&self, coord: GridCoord, dir: Direction) -> Option<GridCoord> {
        let here = self.segment_at(coord)?;
        if !here.has_connection(dir) {
            return None;
        }
        let next = self.neighbor(coord, dir)?;
        let there = self.segment_at(next)?;
        there.has_connection(dir.opposite()).then_some(next)
    }

    /// True when water can flow from the start cell to the end cell, through
    /// the entry and exit pipes when those are enabled.
    pub fn check_solved(&self) -> bool {
        let start = self.start();
        let end = self.end();
        if !self.contains(start) {
            log::warn!("start {start} is out of bounds");
            return false;
        }
        if !self.contains(end) {
            log::warn!("end {end} is out of bounds");
            return false;
        }
        if self.segment_at(start).is_none() {
            log::warn!("start {start} has no pipe");
            return false;
        }
        if self.segment_at(end).is_none() {
            log::warn!("end {end} has no pipe");
            return false;
        }
        if !self.entry_exit_gates_open() {
            return false;
        }
        self.path_exists(start, end)
    }

    /// Flood fill from `from` that stops as soon as `to` is reached.
    pub fn path_exists(&self, from: GridCoord, to: GridCoord) -> bool {
        let Some(first) = self.cell_index(from) else {
            return false;
        };
        if self.segment_at(from).is_none() {
            return false;
        }
        let mut visited = vec![false; self.width() * self.height()];
        let mut stack = vec![from];
        visited[first] = true;

        while let Some(coord) = stack.pop() {
            if coord == to {
                return true;
            }
            for dir in DIRECTIONS {
                let Some(next) = self.linked_neighbor(coord, dir) else {
                    continue;
                };
                let Some(index) = self.cell_index(next) else {
                    continue;
                };
                if !visited[index] {
                    visited[index] = true;
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Every cell connected to `from`, in row-major order.
    pub fn reachable_from(&self, from: GridCoord) -> Vec<GridCoord> {
        let Some(first) = self.cell_index(from) else {
            return Vec::new();
        };
        if self.segment_at(from).is_none() {
            return Vec::new();
        }
        let mut visited = vec![false; self.width() * self.height()];
        let mut stack = vec![from];
        visited[first] = true;

        while let Some(coord) = stack.pop() {
            for dir in DIRECTIONS {
                if let Some(next) = self.linked_neighbor(coord, dir) {
                    if let Some(index) = self.cell_index(next) {
                        if !visited[index] {
                            visited[index] = true;
                            stack.push(next);
                        }
                    }
                }
            }
        }

        visited
            .iter()
            .enumerate()
            .filter(|(_, seen)| **seen)
            .filter_map(|(index, _)| self.coord_of_index(index))
            .collect()
    }

    /// Entry and exit pipes both face the grid and meet an opening on the
    /// start and end cells. Always true when gating is disabled.
    pub fn entry_exit_gates_open(&self) -> bool {
        let Some(sides) = self.entry_exit() else {
            return true;
        };
        let Some(entry) = self.entry_segment() else {
            log::warn!("entry/exit enabled but the entry pipe is missing");
            return false;
        };
        let Some(exit) = self.exit_segment() else {
            log::warn!("entry/exit enabled but the exit pipe is missing");
            return false;
        };

        let toward_grid = sides.entry_side.opposite();
        if !entry.has_connection(toward_grid) {
            return false;
        }
        let start_open = self
            .segment_at(self.start())
            .is_some_and(|segment| segment.has_connection(sides.entry_side));
        if !start_open {
            return false;
        }

        let toward_grid = sides.exit_side.opposite();
        if !exit.has_connection(toward_grid) {
            return false;
        }
        self.segment_at(self.end())
            .is_some_and(|segment| segment.has_connection(sides.exit_side))
    }

    /// Diagnostic only: every shared edge between populated neighbours has
    /// openings on both sides or on neither. Not the solved condition.
    pub fn edges_consistent(&self) -> bool {
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let coord = GridCoord::new(x, y);
                let Some(here) = self.segment_at(coord) else {
                    continue;
                };
                for dir in [Direction::North, Direction::East] {
                    let Some(there) = self
                        .neighbor(coord, dir)
                        .and_then(|next| self.segment_at(next))
                    else {
                        continue;
                    };
                    if here.has_connection(dir) != there.has_connection(dir.opposite()) {
                        return false;
                    }
                }
            }
        }

        let Some(sides) = self.entry_exit() else {
            return true;
        };
        let pairs = [
            (self.entry_segment(), self.start(), sides.entry_side),
            (self.exit_segment(), self.end(), sides.exit_side),
        ];
        pairs.into_iter().all(|(outer, coord, side)| {
            match (outer, self.segment_at(coord)) {
                (Some(outer), Some(cell)) => {
                    outer.has_connection(side.opposite()) == cell.has_connection(side)
                }
                _ => true,
            }
        })
    }

    pub fn diagnose(&self) -> SolveReport {
        SolveReport {
            solved: self.check_solved(),
            edges_consistent: self.edges_consistent(),
            reachable: self.reachable_from(self.start()).len(),
            populated: self.populated_count(),
        }
    }
}
