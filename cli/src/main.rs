mod render;

use std::cell::Cell;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::{Args, Parser, Subcommand};
use pipeworks_core::catalog::{preset_by_slug, DEFAULT_PRESET_SLUG, PUZZLE_PRESETS};
use pipeworks_core::snapshot::{decode_grid, encode_grid};
use pipeworks_core::config::load_puzzle_file;
use pipeworks_core::{ConfigError, GridCoord, PipeGrid, PipePuzzle, PuzzleEvent, PuzzleFile};
use rand::Rng;

/// Upper bound on frames simulated while waiting for a move to settle.
const SETTLE_FRAME_LIMIT: u32 = 100_000;

#[derive(Parser)]
#[command(name = "pipeworks", version, about = "Inspect and play pipe puzzles")]
struct Cli {
    /// Only log errors.
    #[arg(long, short, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in puzzles.
    Presets,
    /// Print a puzzle and its connectivity report.
    Show {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Rotate pipes in a live session and report whether it got solved.
    Play {
        #[command(flatten)]
        source: SourceArgs,
        /// Pipe to turn as `x,y` or `x,y,ccw`; repeat for several moves.
        #[arg(long = "rotate", value_name = "X,Y[,ccw]")]
        rotations: Vec<String>,
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
    /// Write a binary snapshot of the generated grid.
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Built-in puzzle slug.
    #[arg(long, env = "PIPEWORKS_PUZZLE")]
    preset: Option<String>,
    /// Puzzle TOML file; wins over --preset.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Snapshot written by `export`; wins over --file and --preset.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Generation seed, decimal or 0x-prefixed hex.
    #[arg(long)]
    seed: Option<String>,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Presets => {
            for preset in PUZZLE_PRESETS {
                let marker = if preset.slug == DEFAULT_PRESET_SLUG {
                    " (default)"
                } else {
                    ""
                };
                println!("{:<14} {}{marker}", preset.slug, preset.label);
            }
        }
        Commands::Show { source } => {
            let grid = load_grid(&source)?;
            println!("{}", render::render_grid(&grid));
            println!();
            println!("{}", render::format_report(&grid, &grid.diagnose()));
        }
        Commands::Play {
            source,
            rotations,
            fps,
        } => {
            let moves = rotations
                .iter()
                .map(|raw| parse_rotation_arg(raw))
                .collect::<Result<Vec<_>, _>>()?;
            let grid = load_grid(&source)?;
            play(grid, &moves, fps.max(1))?;
        }
        Commands::Export { source, out } => {
            let grid = load_grid(&source)?;
            let bytes = encode_grid(&grid).ok_or("failed to encode grid snapshot")?;
            fs::write(&out, &bytes)?;
            log::info!("wrote {} bytes to {}", bytes.len(), out.display());
        }
    }
    Ok(())
}

fn play(grid: PipeGrid, moves: &[(GridCoord, bool)], fps: u32) -> Result<(), Box<dyn Error>> {
    let mut puzzle = PipePuzzle::from_grid(grid);
    let solved_fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&solved_fired);
    let _subscription = puzzle.subscribe(Rc::new(move |event: &PuzzleEvent| {
        log::debug!("event: {event:?}");
        if *event == PuzzleEvent::Solved {
            flag.set(true);
        }
    }));

    puzzle.activate();
    let dt = 1.0 / fps as f32;
    for (coord, clockwise) in moves {
        if !puzzle.rotate_at(*coord, *clockwise) {
            log::warn!("no pipe to rotate at {coord}");
            continue;
        }
        settle(&mut puzzle, dt)?;
    }
    puzzle.deactivate();

    println!("{}", render::render_grid(puzzle.grid()));
    println!();
    println!("moves: {}", moves.len());
    println!("solved: {}", render::yes_no(puzzle.is_solved()));
    println!("solved event fired: {}", render::yes_no(solved_fired.get()));
    Ok(())
}

fn settle(puzzle: &mut PipePuzzle, dt: f32) -> Result<(), Box<dyn Error>> {
    for _ in 0..SETTLE_FRAME_LIMIT {
        if puzzle.pending_checks() == 0 && !puzzle.grid().is_animating() {
            return Ok(());
        }
        puzzle.tick(dt);
    }
    Err("puzzle did not settle; rotation speed too low?".into())
}

fn load_grid(source: &SourceArgs) -> Result<PipeGrid, Box<dyn Error>> {
    if let Some(path) = &source.snapshot {
        let bytes = fs::read(path)?;
        return Ok(decode_grid(&bytes)?);
    }
    let mut file = load_puzzle_source(source)?;
    match source.seed.as_deref() {
        Some(raw) => file.seed = Some(parse_seed_arg(raw)?),
        None if file.seed.is_none() && file.is_randomized() => {
            let seed = rand::rng().random::<u32>();
            log::info!("using seed {seed:#010x}");
            file.seed = Some(seed);
        }
        None => {}
    }
    let config = file.into_config()?;
    Ok(PipeGrid::generate(&config))
}

fn load_puzzle_source(source: &SourceArgs) -> Result<PuzzleFile, ConfigError> {
    if let Some(path) = &source.file {
        return load_puzzle_file(path);
    }
    let slug = source.preset.as_deref().unwrap_or(DEFAULT_PRESET_SLUG);
    preset_by_slug(slug)
        .ok_or_else(|| ConfigError::UnknownPreset(slug.trim().to_string()))?
        .file()
}

fn parse_seed_arg(raw: &str) -> Result<u32, Box<dyn Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u32>()?
    };
    Ok(value)
}

fn parse_rotation_arg(raw: &str) -> Result<(GridCoord, bool), Box<dyn Error>> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let (x, y, clockwise) = match parts.as_slice() {
        [x, y] => (x, y, true),
        [x, y, dir] => {
            let clockwise = match dir.to_ascii_lowercase().as_str() {
                "cw" => true,
                "ccw" => false,
                other => return Err(format!("unknown rotation direction '{other}'").into()),
            };
            (x, y, clockwise)
        }
        _ => return Err(format!("expected X,Y[,ccw], got '{raw}'").into()),
    };
    Ok((GridCoord::new(x.parse()?, y.parse()?), clockwise))
}
