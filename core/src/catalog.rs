use crate::config::{parse_puzzle_file, PuzzleFile};
use crate::error::ConfigError;
use crate::generate::GridConfig;

#[derive(Clone, Copy, Debug)]
pub struct PuzzlePreset {
    pub label: &'static str,
    pub slug: &'static str,
    pub source: &'static str,
}

pub const DEFAULT_PRESET_SLUG: &str = "museum-hall";

pub const PUZZLE_PRESETS: &[PuzzlePreset] = &[
    PuzzlePreset {
        label: "Tutorial",
        slug: "tutorial",
        source: include_str!("../puzzles/tutorial.toml"),
    },
    PuzzlePreset {
        label: "Museum Hall",
        slug: DEFAULT_PRESET_SLUG,
        source: include_str!("../puzzles/museum-hall.toml"),
    },
    PuzzlePreset {
        label: "Crossroads",
        slug: "crossroads",
        source: include_str!("../puzzles/crossroads.toml"),
    },
];

impl PuzzlePreset {
    pub fn file(&self) -> Result<PuzzleFile, ConfigError> {
        parse_puzzle_file(self.source)
    }

    pub fn config(&self) -> Result<GridConfig, ConfigError> {
        self.file()?.into_config()
    }
}

pub fn preset_by_slug(slug: &str) -> Option<&'static PuzzlePreset> {
    let trimmed = slug.trim();
    PUZZLE_PRESETS
        .iter()
        .find(|preset| preset.slug.eq_ignore_ascii_case(trimmed))
}

pub fn preset_by_label(label: &str) -> Option<&'static PuzzlePreset> {
    let trimmed = label.trim();
    PUZZLE_PRESETS
        .iter()
        .find(|preset| preset.label.eq_ignore_ascii_case(trimmed))
}

pub fn load_preset(slug: &str) -> Result<GridConfig, ConfigError> {
    preset_by_slug(slug)
        .ok_or_else(|| ConfigError::UnknownPreset(slug.trim().to_string()))?
        .config()
}
