use pipeworks_core::catalog::preset_by_label;
use pipeworks_core::{
    load_preset, preset_by_slug, ConfigError, GridCoord, PipePuzzle, PuzzleEvent,
    DEFAULT_PRESET_SLUG, PUZZLE_PRESETS,
};

#[test]
fn every_preset_parses() {
    for preset in PUZZLE_PRESETS {
        let config = preset
            .config()
            .unwrap_or_else(|err| panic!("{}: {err}", preset.slug));
        assert!(config.width > 0 && config.height > 0, "{}", preset.slug);
    }
    assert!(preset_by_slug(DEFAULT_PRESET_SLUG).is_some());
}

#[test]
fn slug_lookup_is_trimmed_and_case_insensitive() {
    let preset = preset_by_slug("  Museum-Hall ").expect("preset");
    assert_eq!(preset.slug, "museum-hall");
    assert_eq!(preset_by_label("tutorial").map(|p| p.slug), Some("tutorial"));
    assert!(preset_by_slug("atrium").is_none());
    assert!(matches!(
        load_preset("atrium"),
        Err(ConfigError::UnknownPreset(slug)) if slug == "atrium"
    ));
}

#[test]
fn museum_hall_starts_unsolved_and_can_be_solved() {
    let config = load_preset("museum-hall").expect("preset");
    let mut puzzle = PipePuzzle::new(&config);
    assert!(!puzzle.grid().check_solved());
    puzzle.activate();

    let moves = [
        ((0, 1), false),
        ((0, 2), true),
        ((1, 2), true),
        ((2, 2), true),
        ((2, 2), true),
        ((2, 1), false),
    ];
    for ((x, y), clockwise) in moves {
        assert!(puzzle.rotate_at(GridCoord::new(x, y), clockwise), "({x}, {y})");
        for _ in 0..30 {
            puzzle.tick(1.0 / 60.0);
        }
    }

    assert!(puzzle.is_solved());
    let solved = puzzle
        .drain_events()
        .into_iter()
        .filter(|event| *event == PuzzleEvent::Solved)
        .count();
    assert_eq!(solved, 1);
}

#[test]
fn tutorial_is_two_straights() {
    let config = load_preset("tutorial").expect("preset");
    let mut puzzle = PipePuzzle::new(&config);
    assert!(!puzzle.check_now());
    puzzle.activate();
    puzzle.rotate_at(GridCoord::new(0, 0), true);
    puzzle.rotate_at(GridCoord::new(1, 0), true);
    for _ in 0..60 {
        puzzle.tick(1.0 / 60.0);
    }
    assert!(puzzle.is_solved());
}
