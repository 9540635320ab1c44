//! Headless Board Runner
//!
//! Loads a level, picks a unit, and prints what the movement and targeting
//! searches report for it.

use clap::Parser;
use serde::Serialize;

use hex_tactics::board::{
    load_level, movable_tiles, nearest_target, nearest_tile_at_distance, Board, Tile,
};
use hex_tactics::core::error::{BoardError, Result};
use hex_tactics::core::types::TileCoord;

/// Headless Board Runner - inspect movement and targeting on a level
#[derive(Parser, Debug)]
#[command(name = "board_runner")]
#[command(about = "Run movement and targeting queries against a level file")]
struct Args {
    /// Level file (TOML, or JSON by extension)
    #[arg(long, default_value = "data/levels/crossing.toml")]
    level: String,

    /// Team of the unit to inspect
    #[arg(long, default_value_t = 0)]
    unit_team: usize,

    /// Index of the unit within its team
    #[arg(long, default_value_t = 0)]
    unit_index: usize,

    /// Team to search for the nearest target in
    #[arg(long, default_value_t = 1)]
    target_team: usize,

    /// Attack range used when looking for a tile to strike from
    #[arg(long, default_value_t = 1)]
    range: u32,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging of the searches
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct QueryReport {
    level: String,
    unit: TileCoord,
    movement: u32,
    movable: Vec<TileCoord>,
    nearest_target: Option<Vec<TileCoord>>,
    furthest_this_turn: Option<TileCoord>,
    strike_tile: Option<TileCoord>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "hex_tactics=debug"
    } else {
        "hex_tactics=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let level = load_level(&args.level)?;
    let board = Board::from_level(&level)?;

    let unit_id = board
        .units(args.unit_team)
        .and_then(|ids| ids.get(args.unit_index).copied())
        .ok_or_else(|| {
            BoardError::InvalidLevel(format!(
                "no unit {} on team {}",
                args.unit_index, args.unit_team
            ))
        })?;
    let unit = board
        .unit(unit_id)
        .ok_or(BoardError::UnitNotRegistered(unit_id))?;
    let position = unit
        .position()
        .ok_or(BoardError::InvalidLevel("selected unit is not on the board".into()))?;

    let movable = movable_tiles(&board, unit)
        .iter()
        .filter(|step| step.endable)
        .map(|step| step.coord())
        .collect::<Vec<_>>();

    let target = nearest_target(&board, unit, args.target_team, Some(unit.team));
    let furthest = target
        .as_ref()
        .and_then(|step| step.furthest_endable().map(|s| s.coord()));
    let strike = target.as_ref().and_then(|step| {
        nearest_tile_at_distance(&board, unit, Some(unit.team), args.range, step.coord())
    });

    let report = QueryReport {
        level: level.name.clone(),
        unit: position,
        movement: unit.current_movement(),
        movable,
        nearest_target: target.as_ref().map(|step| step.path()),
        furthest_this_turn: furthest,
        strike_tile: strike.map(|step| step.coord()),
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_map(&board, &report);
        print_report(&report);
    }

    Ok(())
}

fn print_map(board: &Board, report: &QueryReport) {
    for y in 0..board.height() as i32 {
        let mut line = String::new();
        for x in 0..board.width() as i32 {
            let coord = TileCoord::new(x, y);
            let glyph = if coord == report.unit {
                '@'
            } else if let Some(team) = board.occupant_team(coord) {
                char::from_digit(team as u32 % 10, 10).unwrap_or('?')
            } else if board.tile(coord).is_some_and(Tile::is_impassable) {
                '#'
            } else if report.movable.contains(&coord) {
                '+'
            } else {
                '.'
            };
            line.push(glyph);
            line.push(' ');
        }
        println!("{}", line.trim_end());
    }
    println!();
}

fn print_report(report: &QueryReport) {
    println!("Level: {}", report.level);
    println!("Unit at {} with {} movement", report.unit, report.movement);
    println!("Movable tiles: {}", report.movable.len());

    match &report.nearest_target {
        Some(path) => {
            let steps: Vec<String> = path.iter().map(ToString::to_string).collect();
            println!("Nearest target path: {}", steps.join(" -> "));
        }
        None => println!("Nearest target path: none"),
    }
    match report.furthest_this_turn {
        Some(coord) => println!("Furthest stop this turn: {}", coord),
        None => println!("Furthest stop this turn: none"),
    }
    match report.strike_tile {
        Some(coord) => println!("Strike tile: {}", coord),
        None => println!("Strike tile: none"),
    }
}
