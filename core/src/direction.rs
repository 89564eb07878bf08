use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseNameError;

pub const DIR_NORTH: usize = 0;
pub const DIR_EAST: usize = 1;
pub const DIR_SOUTH: usize = 2;
pub const DIR_WEST: usize = 3;

/// Compass direction of a pipe opening. North points towards `y + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

pub const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Self {
        match index % 4 {
            DIR_NORTH => Direction::North,
            DIR_EAST => Direction::East,
            DIR_SOUTH => Direction::South,
            _ => Direction::West,
        }
    }

    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    pub const fn clockwise(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub const fn counter_clockwise(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        DIRECTIONS
            .iter()
            .copied()
            .find(|dir| {
                dir.name().eq_ignore_ascii_case(trimmed)
                    || dir.name()[..1].eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ParseNameError::Direction(trimmed.to_string()))
    }
}
