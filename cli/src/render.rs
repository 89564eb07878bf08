use pipeworks_core::{ConnectionMask, Direction, GridCoord, PipeGrid, SolveReport};

const EMPTY_CELL: char = '·';

/// Box-drawing glyph for a set of openings; north points up the screen.
pub fn pipe_glyph(mask: ConnectionMask) -> char {
    match mask.as_array() {
        [false, false, false, false] => ' ',
        [true, false, false, false] => '╵',
        [false, true, false, false] => '╶',
        [false, false, true, false] => '╷',
        [false, false, false, true] => '╴',
        [true, false, true, false] => '│',
        [false, true, false, true] => '─',
        [true, true, false, false] => '└',
        [false, true, true, false] => '┌',
        [false, false, true, true] => '┐',
        [true, false, false, true] => '┘',
        [true, true, true, false] => '├',
        [false, true, true, true] => '┬',
        [true, false, true, true] => '┤',
        [true, true, false, true] => '┴',
        [true, true, true, true] => '┼',
    }
}

/// Draws the grid with a one-cell margin that holds the entry and exit pipes.
pub fn render_grid(grid: &PipeGrid) -> String {
    let width = grid.width() + 2;
    let height = grid.height() + 2;
    let mut canvas = vec![vec![' '; width]; height];

    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let glyph = grid
                .segment_at(GridCoord::new(x, y))
                .map(|segment| pipe_glyph(segment.connections()))
                .unwrap_or(EMPTY_CELL);
            if let Some((col, row)) = canvas_slot(grid, GridCoord::new(x, y)) {
                canvas[row][col] = glyph;
            }
        }
    }

    if let Some(sides) = grid.entry_exit() {
        let outer = [
            (grid.entry_segment(), grid.start(), sides.entry_side),
            (grid.exit_segment(), grid.end(), sides.exit_side),
        ];
        for (segment, anchor, side) in outer {
            let Some(segment) = segment else {
                continue;
            };
            draw_outside(&mut canvas, grid, anchor, side, pipe_glyph(segment.connections()));
        }
    }

    canvas
        .iter()
        .map(|row| row.iter().collect::<String>().trim_end().to_string())
        .skip_while(|line| line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

pub fn format_report(grid: &PipeGrid, report: &SolveReport) -> String {
    let mut lines = vec![
        format!("size: {}x{}", grid.width(), grid.height()),
        format!("start: {}  end: {}", grid.start(), grid.end()),
    ];
    if let Some(sides) = grid.entry_exit() {
        lines.push(format!(
            "entry: {}  exit: {}",
            sides.entry_side, sides.exit_side
        ));
    }
    lines.push(format!(
        "pipes: {}  reachable from start: {}",
        report.populated, report.reachable
    ));
    lines.push(format!(
        "edges consistent: {}",
        yes_no(report.edges_consistent)
    ));
    lines.push(format!("solved: {}", yes_no(report.solved)));
    lines.join("\n")
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn canvas_slot(grid: &PipeGrid, coord: GridCoord) -> Option<(usize, usize)> {
    let col = i64::from(coord.x) + 1;
    let row = grid.height() as i64 - i64::from(coord.y);
    let in_canvas = (0..grid.width() as i64 + 2).contains(&col)
        && (0..grid.height() as i64 + 2).contains(&row);
    in_canvas.then_some((col as usize, row as usize))
}

fn draw_outside(
    canvas: &mut [Vec<char>],
    grid: &PipeGrid,
    anchor: GridCoord,
    side: Direction,
    glyph: char,
) {
    if !grid.contains(anchor) {
        log::debug!("{side} pipe anchored off the grid at {anchor}, not drawn");
        return;
    }
    let Some(coord) = anchor.step(side) else {
        return;
    };
    if grid.contains(coord) {
        log::debug!("{side} pipe at {coord} would cover a grid cell, not drawn");
        return;
    }
    if let Some((col, row)) = canvas_slot(grid, coord) {
        canvas[row][col] = glyph;
    }
}
