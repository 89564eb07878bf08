use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::grid::{EntryExit, GridCoord, PipeGrid, SPACING_DEFAULT};
use crate::random::{cell_seed, rotation_pick, shape_pick, GENERATION_SEED};
use crate::segment::{PipeSegment, ROTATION_SPEED_DEFAULT};
use crate::shape::{PipeShape, ALL_SHAPES};

pub const GRID_WIDTH_DEFAULT: usize = 3;
pub const GRID_HEIGHT_DEFAULT: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Distribution {
    #[default]
    Random,
    AllSame,
    Custom,
}

/// Shapes that have something to instantiate them from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeSources([bool; 4]);

impl ShapeSources {
    pub const ALL: ShapeSources = ShapeSources([true; 4]);
    pub const NONE: ShapeSources = ShapeSources([false; 4]);

    pub fn from_shapes(shapes: &[PipeShape]) -> Self {
        let mut sources = Self::NONE;
        for shape in shapes {
            sources.insert(*shape);
        }
        sources
    }

    pub fn has(&self, shape: PipeShape) -> bool {
        self.0[shape.code() as usize]
    }

    pub fn insert(&mut self, shape: PipeShape) {
        self.0[shape.code() as usize] = true;
    }

    pub fn remove(&mut self, shape: PipeShape) {
        self.0[shape.code() as usize] = false;
    }

    pub fn available(&self) -> Vec<PipeShape> {
        ALL_SHAPES
            .iter()
            .copied()
            .filter(|shape| self.has(*shape))
            .collect()
    }
}

impl Default for ShapeSources {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub spacing: f32,
    pub origin: [f32; 3],
    pub distribution: Distribution,
    pub default_shape: PipeShape,
    /// Row-major shape table used by [`Distribution::Custom`].
    pub custom_shapes: Vec<PipeShape>,
    /// Row-major initial quarter turns; missing entries fall back to 0 or random.
    pub rotations: Vec<i32>,
    pub sources: ShapeSources,
    pub start: GridCoord,
    pub end: GridCoord,
    pub randomize_rotations: bool,
    pub seed: u32,
    pub rotation_speed: f32,
    pub entry_exit: Option<EntryExit>,
}

impl GridConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            spacing: SPACING_DEFAULT,
            origin: [0.0; 3],
            distribution: Distribution::Random,
            default_shape: PipeShape::Straight,
            custom_shapes: Vec::new(),
            rotations: Vec::new(),
            sources: ShapeSources::ALL,
            start: GridCoord::new(0, 0),
            end: GridCoord::last_cell(width, height),
            randomize_rotations: false,
            seed: GENERATION_SEED,
            rotation_speed: ROTATION_SPEED_DEFAULT,
            entry_exit: None,
        }
    }

    pub fn custom(width: usize, height: usize, shapes: Vec<PipeShape>) -> Self {
        Self {
            distribution: Distribution::Custom,
            custom_shapes: shapes,
            ..Self::new(width, height)
        }
    }

    pub fn all_same(width: usize, height: usize, shape: PipeShape) -> Self {
        Self {
            distribution: Distribution::AllSame,
            default_shape: shape,
            ..Self::new(width, height)
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(GRID_WIDTH_DEFAULT, GRID_HEIGHT_DEFAULT)
    }
}

/// Shape the distribution policy picks for a cell, before source availability is checked.
pub fn choose_shape(config: &GridConfig, x: usize, y: usize) -> PipeShape {
    let index = y.saturating_mul(config.width).saturating_add(x);
    match config.distribution {
        Distribution::Random => {
            let available = config.sources.available();
            if available.is_empty() {
                log::warn!("no pipe shape sources assigned, using {}", PipeShape::Straight);
                return PipeShape::Straight;
            }
            let seed = cell_seed(config.seed, config.width, config.height);
            available[shape_pick(seed, index, available.len())]
        }
        Distribution::AllSame => config.default_shape,
        Distribution::Custom => match config.custom_shapes.get(index) {
            Some(shape) => *shape,
            None => {
                log::warn!(
                    "custom shape table has no entry for ({x}, {y}), using {}",
                    config.default_shape
                );
                config.default_shape
            }
        },
    }
}

pub fn initial_rotation(config: &GridConfig, index: usize) -> i32 {
    if let Some(steps) = config.rotations.get(index) {
        return *steps;
    }
    if config.randomize_rotations {
        let seed = cell_seed(config.seed, config.width, config.height);
        return rotation_pick(seed, index);
    }
    0
}

/// Quarter turns that point a corner at the grid from `side`, with its other
/// opening on the clockwise neighbour of the grid-facing direction.
pub fn entry_corner_rotation(side: Direction) -> u8 {
    let toward_grid = side.opposite();
    let away = toward_grid.clockwise();
    let canonical = PipeShape::Corner.canonical();
    (0..4u8)
        .find(|steps| {
            let mask = canonical.rotated(*steps as i32);
            mask.has(toward_grid) && mask.has(away)
        })
        .unwrap_or(0)
}

impl PipeGrid {
    pub fn generate(config: &GridConfig) -> Self {
        let mut grid = PipeGrid::new(config.width, config.height);
        grid.regenerate(config);
        grid
    }

    /// Replaces every segment according to `config`.
    pub fn regenerate(&mut self, config: &GridConfig) {
        self.reset(config.width, config.height);
        self.set_spacing(config.spacing);
        self.set_origin(config.origin);
        self.set_start(config.start);
        self.set_end(config.end);

        for y in 0..self.height() {
            for x in 0..self.width() {
                let shape = choose_shape(config, x, y);
                if !config.sources.has(shape) {
                    log::warn!("no source assigned for {shape} pipe at ({x}, {y}), skipping");
                    continue;
                }
                let index = y * self.width() + x;
                let mut segment =
                    PipeSegment::with_rotation(shape, initial_rotation(config, index));
                segment.set_rotation_speed(config.rotation_speed);
                self.place_segment(GridCoord::new(x as i32, y as i32), segment);
            }
        }

        if let Some(entry_exit) = config.entry_exit {
            if config.sources.has(PipeShape::Corner) {
                self.enable_entry_exit(entry_exit.entry_side, entry_exit.exit_side);
                for handle in [self.entry_handle(), self.exit_handle()].into_iter().flatten() {
                    if let Some(segment) = self.segment_mut(handle) {
                        segment.set_rotation_speed(config.rotation_speed);
                    }
                }
            } else {
                log::warn!("entry/exit pipes need a corner source, none assigned");
                self.attach_entry_exit(entry_exit, None, None);
            }
        }

        log::debug!(
            "generated {}x{} pipe grid with {} segments",
            self.width(),
            self.height(),
            self.populated_count()
        );
    }
}
