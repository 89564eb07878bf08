use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, DIRECTIONS};
use crate::error::ParseNameError;

/// Openings of a pipe, one flag per [`Direction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConnectionMask([bool; 4]);

impl ConnectionMask {
    pub const EMPTY: ConnectionMask = ConnectionMask([false; 4]);

    pub const fn new(flags: [bool; 4]) -> Self {
        Self(flags)
    }

    pub fn from_directions(dirs: &[Direction]) -> Self {
        let mut flags = [false; 4];
        for dir in dirs {
            flags[dir.index()] = true;
        }
        Self(flags)
    }

    pub const fn has(self, dir: Direction) -> bool {
        self.0[dir.index()]
    }

    pub const fn as_array(self) -> [bool; 4] {
        self.0
    }

    pub fn count(self) -> usize {
        self.0.iter().filter(|open| **open).count()
    }

    pub fn directions(self) -> impl Iterator<Item = Direction> {
        DIRECTIONS.into_iter().filter(move |dir| self.has(*dir))
    }

    /// The bit at West moves into North, North into East, and so on.
    pub fn rotated_cw(self) -> Self {
        let mut flags = self.0;
        flags.rotate_right(1);
        Self(flags)
    }

    pub fn rotated_ccw(self) -> Self {
        let mut flags = self.0;
        flags.rotate_left(1);
        Self(flags)
    }

    /// Applies `steps` clockwise quarter turns; negative values turn counter-clockwise.
    pub fn rotated(self, steps: i32) -> Self {
        let mut flags = self.0;
        flags.rotate_right(normalize_steps(steps) as usize);
        Self(flags)
    }
}

pub fn normalize_steps(steps: i32) -> u8 {
    steps.rem_euclid(4) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum PipeShape {
    Straight = 0,
    Corner = 1,
    #[serde(alias = "tjunction", alias = "t")]
    TJunction = 2,
    Cross = 3,
}

pub const ALL_SHAPES: [PipeShape; 4] = [
    PipeShape::Straight,
    PipeShape::Corner,
    PipeShape::TJunction,
    PipeShape::Cross,
];

impl PipeShape {
    pub const fn canonical(self) -> ConnectionMask {
        match self {
            PipeShape::Straight => ConnectionMask::new([true, false, true, false]),
            PipeShape::Corner => ConnectionMask::new([true, true, false, false]),
            PipeShape::TJunction => ConnectionMask::new([true, true, true, false]),
            PipeShape::Cross => ConnectionMask::new([true, true, true, true]),
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PipeShape::Straight),
            1 => Some(PipeShape::Corner),
            2 => Some(PipeShape::TJunction),
            3 => Some(PipeShape::Cross),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PipeShape::Straight => "straight",
            PipeShape::Corner => "corner",
            PipeShape::TJunction => "t-junction",
            PipeShape::Cross => "cross",
        }
    }
}

impl fmt::Display for PipeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PipeShape {
    type Err = ParseNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().to_ascii_lowercase();
        match trimmed.as_str() {
            "straight" => Ok(PipeShape::Straight),
            "corner" => Ok(PipeShape::Corner),
            "t-junction" | "tjunction" | "t" => Ok(PipeShape::TJunction),
            "cross" => Ok(PipeShape::Cross),
            _ => Err(ParseNameError::Shape(value.trim().to_string())),
        }
    }
}
