use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::ConfigError;
use crate::generate::{Distribution, GridConfig, ShapeSources};
use crate::grid::{EntryExit, GridCoord, MAX_GRID_DIMENSION, SPACING_DEFAULT};
use crate::random::GENERATION_SEED;
use crate::segment::ROTATION_SPEED_DEFAULT;
use crate::shape::PipeShape;

/// On-disk TOML form of a puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PuzzleFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<[f32; 3]>,
    #[serde(default)]
    pub distribution: Distribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_shape: Option<PipeShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<PipeShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rotations: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<PipeShape>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<[i32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<[i32; 2]>,
    #[serde(default)]
    pub randomize_rotations: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_exit: Option<EntryExitFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryExitFile {
    pub entry: Direction,
    pub exit: Direction,
}

impl PuzzleFile {
    /// Checks the values nothing downstream can recover from. Out-of-range
    /// start/end or short shape tables are accepted and degrade later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !dimension_in_range(self.width) || !dimension_in_range(self.height) {
            return Err(ConfigError::Dimensions {
                width: self.width,
                height: self.height,
            });
        }
        if let Some(spacing) = self.spacing {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(ConfigError::Spacing(spacing));
            }
        }
        if let Some(speed) = self.rotation_speed {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(ConfigError::RotationSpeed(speed));
            }
        }
        Ok(())
    }

    /// Whether generation draws from the seed at all.
    pub fn is_randomized(&self) -> bool {
        self.distribution == Distribution::Random || self.randomize_rotations
    }

    pub fn into_config(self) -> Result<GridConfig, ConfigError> {
        self.validate()?;
        let width = self.width as usize;
        let height = self.height as usize;
        let defaults = GridConfig::new(width, height);
        let cells = width * height;
        if self.distribution == Distribution::Custom && self.shapes.len() < cells {
            log::warn!(
                "custom shape table has {} of {cells} entries",
                self.shapes.len()
            );
        }
        Ok(GridConfig {
            width,
            height,
            spacing: self.spacing.unwrap_or(SPACING_DEFAULT),
            origin: self.origin.unwrap_or([0.0; 3]),
            distribution: self.distribution,
            default_shape: self.default_shape.unwrap_or(PipeShape::Straight),
            custom_shapes: self.shapes,
            rotations: self.rotations,
            sources: self
                .sources
                .as_deref()
                .map(ShapeSources::from_shapes)
                .unwrap_or_default(),
            start: self
                .start
                .map(|[x, y]| GridCoord::new(x, y))
                .unwrap_or(defaults.start),
            end: self
                .end
                .map(|[x, y]| GridCoord::new(x, y))
                .unwrap_or(defaults.end),
            randomize_rotations: self.randomize_rotations,
            seed: self.seed.unwrap_or(GENERATION_SEED),
            rotation_speed: self.rotation_speed.unwrap_or(ROTATION_SPEED_DEFAULT),
            entry_exit: self.entry_exit.map(|sides| EntryExit {
                entry_side: sides.entry,
                exit_side: sides.exit,
            }),
        })
    }

    pub fn from_config(config: &GridConfig) -> Self {
        let sources = config.sources.available();
        Self {
            label: None,
            width: config.width as u32,
            height: config.height as u32,
            spacing: Some(config.spacing),
            origin: Some(config.origin),
            distribution: config.distribution,
            default_shape: Some(config.default_shape),
            shapes: config.custom_shapes.clone(),
            rotations: config.rotations.clone(),
            sources: (sources.len() < 4).then_some(sources),
            start: Some([config.start.x, config.start.y]),
            end: Some([config.end.x, config.end.y]),
            randomize_rotations: config.randomize_rotations,
            seed: Some(config.seed),
            rotation_speed: Some(config.rotation_speed),
            entry_exit: config.entry_exit.map(|sides| EntryExitFile {
                entry: sides.entry_side,
                exit: sides.exit_side,
            }),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn dimension_in_range(len: u32) -> bool {
    (1..=MAX_GRID_DIMENSION).contains(&(len as usize))
}

pub fn parse_puzzle_file(text: &str) -> Result<PuzzleFile, ConfigError> {
    Ok(toml::from_str(text)?)
}

pub fn parse_puzzle(text: &str) -> Result<GridConfig, ConfigError> {
    parse_puzzle_file(text)?.into_config()
}

pub fn load_puzzle_file(path: &Path) -> Result<PuzzleFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_puzzle_file(&text)
}

pub fn load_puzzle(path: &Path) -> Result<GridConfig, ConfigError> {
    load_puzzle_file(path)?.into_config()
}
