use pipeworks_core::generate::{choose_shape, entry_corner_rotation, initial_rotation};
use pipeworks_core::{
    Direction, GridConfig, GridCoord, PipeGrid, PipeShape, SegmentSlot, ShapeSources,
    DIRECTIONS,
};

fn shapes_of(grid: &PipeGrid) -> Vec<Option<PipeShape>> {
    let mut shapes = Vec::new();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            shapes.push(grid.segment_at(GridCoord::new(x, y)).map(|s| s.shape()));
        }
    }
    shapes
}

#[test]
fn all_same_fills_every_cell() {
    let grid = PipeGrid::generate(&GridConfig::all_same(4, 3, PipeShape::TJunction));
    assert_eq!(grid.populated_count(), 12);
    assert!(shapes_of(&grid)
        .iter()
        .all(|shape| *shape == Some(PipeShape::TJunction)));
}

#[test]
fn random_layout_is_deterministic_for_a_seed() {
    let mut config = GridConfig::new(6, 5);
    config.seed = 4242;
    config.randomize_rotations = true;
    let first = PipeGrid::generate(&config);
    let second = PipeGrid::generate(&config);
    assert_eq!(shapes_of(&first), shapes_of(&second));
    for (a, b) in first.handles().into_iter().zip(second.handles()) {
        assert_eq!(
            first.segment(a).map(|s| s.rotation_steps()),
            second.segment(b).map(|s| s.rotation_steps())
        );
    }
}

#[test]
fn random_layout_only_uses_available_sources() {
    let mut config = GridConfig::new(8, 8);
    config.sources = ShapeSources::from_shapes(&[PipeShape::Corner, PipeShape::Cross]);
    let grid = PipeGrid::generate(&config);
    assert_eq!(grid.populated_count(), 64);
    for shape in shapes_of(&grid).into_iter().flatten() {
        assert!(matches!(shape, PipeShape::Corner | PipeShape::Cross));
    }
}

#[test]
fn random_without_sources_falls_back_to_straight_and_skips() {
    let mut config = GridConfig::new(2, 2);
    config.sources = ShapeSources::NONE;
    assert_eq!(choose_shape(&config, 0, 0), PipeShape::Straight);
    let grid = PipeGrid::generate(&config);
    assert_eq!(grid.populated_count(), 0);
    assert!(!grid.check_solved());
}

#[test]
fn shapes_without_a_source_leave_cells_empty() {
    let mut config = GridConfig::custom(
        2,
        1,
        vec![PipeShape::Straight, PipeShape::Cross],
    );
    config.sources.remove(PipeShape::Cross);
    let grid = PipeGrid::generate(&config);
    assert!(grid.segment_at(GridCoord::new(0, 0)).is_some());
    assert!(grid.segment_at(GridCoord::new(1, 0)).is_none());
}

#[test]
fn custom_table_is_row_major() {
    let config = GridConfig::custom(
        2,
        2,
        vec![
            PipeShape::Straight,
            PipeShape::Corner,
            PipeShape::TJunction,
            PipeShape::Cross,
        ],
    );
    let grid = PipeGrid::generate(&config);
    assert_eq!(
        grid.segment_at(GridCoord::new(1, 0)).map(|s| s.shape()),
        Some(PipeShape::Corner)
    );
    assert_eq!(
        grid.segment_at(GridCoord::new(0, 1)).map(|s| s.shape()),
        Some(PipeShape::TJunction)
    );
}

#[test]
fn short_custom_table_uses_default_shape() {
    let mut config = GridConfig::custom(3, 1, vec![PipeShape::Cross]);
    config.default_shape = PipeShape::Corner;
    let grid = PipeGrid::generate(&config);
    assert_eq!(
        shapes_of(&grid),
        vec![
            Some(PipeShape::Cross),
            Some(PipeShape::Corner),
            Some(PipeShape::Corner)
        ]
    );
}

#[test]
fn rotation_table_wins_over_randomizing() {
    let mut config = GridConfig::all_same(2, 1, PipeShape::Straight);
    config.rotations = vec![3];
    config.randomize_rotations = false;
    assert_eq!(initial_rotation(&config, 0), 3);
    assert_eq!(initial_rotation(&config, 1), 0);
    config.randomize_rotations = true;
    assert_eq!(initial_rotation(&config, 0), 3);
    assert!((0..4).contains(&initial_rotation(&config, 1)));
}

#[test]
fn entry_corner_faces_the_grid_from_every_side() {
    for side in DIRECTIONS {
        let steps = entry_corner_rotation(side) as i32;
        let mask = PipeShape::Corner.canonical().rotated(steps);
        let toward_grid = side.opposite();
        assert!(mask.has(toward_grid), "{side}");
        assert!(mask.has(toward_grid.clockwise()), "{side}");
    }
    assert_eq!(entry_corner_rotation(Direction::West), 1);
    assert_eq!(entry_corner_rotation(Direction::East), 3);
    assert_eq!(entry_corner_rotation(Direction::North), 2);
    assert_eq!(entry_corner_rotation(Direction::South), 0);
}

#[test]
fn entry_exit_sits_one_spacing_outside_the_grid() {
    let mut config = GridConfig::all_same(3, 3, PipeShape::Cross);
    config.spacing = 2.0;
    config.start = GridCoord::new(0, 1);
    config.end = GridCoord::new(2, 1);
    config.entry_exit = Some(pipeworks_core::EntryExit {
        entry_side: Direction::West,
        exit_side: Direction::East,
    });
    let grid = PipeGrid::generate(&config);
    assert_eq!(grid.cell_position(GridCoord::new(0, 1)), [-2.0, 0.0, 0.0]);
    assert_eq!(grid.slot_position(SegmentSlot::Entry), Some([-4.0, 0.0, 0.0]));
    assert_eq!(grid.slot_position(SegmentSlot::Exit), Some([4.0, 0.0, 0.0]));
    let entry = grid.entry_handle().expect("entry handle");
    assert_eq!(grid.slot_of(entry), Some(SegmentSlot::Entry));
    assert!(grid.check_solved());
}

#[test]
fn entry_exit_without_corner_source_stays_unsolved() {
    let mut config = GridConfig::all_same(1, 1, PipeShape::Cross);
    config.sources = ShapeSources::from_shapes(&[PipeShape::Cross]);
    config.entry_exit = Some(pipeworks_core::EntryExit {
        entry_side: Direction::West,
        exit_side: Direction::East,
    });
    let grid = PipeGrid::generate(&config);
    assert!(grid.entry_exit().is_some());
    assert!(grid.entry_segment().is_none());
    assert!(!grid.check_solved());
}

#[test]
fn cells_are_centred_on_the_origin() {
    let mut config = GridConfig::all_same(2, 2, PipeShape::Straight);
    config.spacing = 1.5;
    config.origin = [10.0, -4.0, 1.0];
    let grid = PipeGrid::generate(&config);
    assert_eq!(grid.cell_position(GridCoord::new(0, 0)), [9.25, -4.75, 1.0]);
    assert_eq!(grid.cell_position(GridCoord::new(1, 1)), [10.75, -3.25, 1.0]);
}

#[test]
fn regenerate_invalidates_old_handles() {
    let config = GridConfig::all_same(2, 2, PipeShape::Corner);
    let mut grid = PipeGrid::generate(&config);
    let old = grid.handle_at(GridCoord::new(0, 0)).expect("handle");
    grid.regenerate(&config);
    assert!(grid.segment(old).is_none());
    assert!(grid.segment_mut(old).is_none());
    let fresh = grid.handle_at(GridCoord::new(0, 0)).expect("handle");
    assert_ne!(fresh.generation(), old.generation());
}
