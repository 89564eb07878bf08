use std::path::PathBuf;

use crate::grid::MAX_GRID_DIMENSION;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseNameError {
    #[error("unknown direction '{0}' (expected north, east, south or west)")]
    Direction(String),
    #[error("unknown pipe shape '{0}' (expected straight, corner, t-junction or cross)")]
    Shape(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read puzzle file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse puzzle file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("grid sides must be 1 to {max}, got {width}x{height}", max = MAX_GRID_DIMENSION)]
    Dimensions { width: u32, height: u32 },
    #[error("spacing must be positive and finite, got {0}")]
    Spacing(f32),
    #[error("rotation speed must be positive and finite, got {0}")]
    RotationSpeed(f32),
    #[error("unknown puzzle preset '{0}'")]
    UnknownPreset(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot version {found} is not supported (expected {expected})")]
    Version { expected: u32, found: u32 },
    #[error("grid sides must be 1 to {max}, got {width}x{height}", max = MAX_GRID_DIMENSION)]
    Dimensions { width: u32, height: u32 },
    #[error("snapshot has {found} cells, expected {expected}")]
    CellCount { expected: usize, found: usize },
    #[error("snapshot bytes could not be decoded")]
    Decode,
}
