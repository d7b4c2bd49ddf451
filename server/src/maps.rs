//! Built-in map catalog. Maps are pre-built graphs plus table-layout
//! metadata, assembled programmatically; there is no map file format.

use crate::game::GameError;
use shared::map::{GameMap, MapBuilder, MapError};
use shared::sector::{Coordinate, Sector, SectorLegality, SectorType};

/// Map used when a client does not ask for one.
pub const DEFAULT_MAP: &str = "galvani";

/// Names accepted by [`build`].
pub fn catalog() -> &'static [&'static str] {
    &["galvani", "training"]
}

/// Builds a fresh instance of a named map.
pub fn build(name: &str) -> Result<GameMap, GameError> {
    match name {
        "galvani" => Ok(galvani()?),
        "training" => Ok(training()?),
        other => Err(GameError::UnknownMap(other.to_string())),
    }
}

/// Adds four-way grid adjacency over `columns` x `rows`.
fn grid_edges(mut builder: MapBuilder, columns: i32, rows: i32) -> MapBuilder {
    for col in 0..columns {
        for row in 0..rows {
            if col + 1 < columns {
                builder = builder.edge(Coordinate::new(col, row), Coordinate::new(col + 1, row));
            }
            if row + 1 < rows {
                builder = builder.edge(Coordinate::new(col, row), Coordinate::new(col, row + 1));
            }
        }
    }
    builder
}

/// The standard 8x6 board. Rescue hatches sit in opposite corners, a
/// human-only corridor shortcuts the left half, an alien-only run crosses
/// the lower right, and two wrecked sectors are impassable outright.
fn galvani() -> Result<GameMap, MapError> {
    const COLUMNS: i32 = 8;
    const ROWS: i32 = 6;

    let mut builder = MapBuilder::new("galvani", Coordinate::new(0, 0), COLUMNS as u32, ROWS as u32);
    for col in 0..COLUMNS {
        for row in 0..ROWS {
            let (sector_type, legality) = match (col, row) {
                (3, 2) => (SectorType::HumanStart, SectorLegality::All),
                (4, 3) => (SectorType::AlienStart, SectorLegality::All),
                (0, 0) | (7, 5) => (SectorType::OpenRescue, SectorLegality::HumanOnly),
                (7, 0) | (0, 5) => (SectorType::ClosedRescue, SectorLegality::HumanOnly),
                (2, 4) | (5, 1) => (SectorType::Normal, SectorLegality::None),
                (1, 2) | (2, 2) => (SectorType::Normal, SectorLegality::HumanOnly),
                (5, 4) | (6, 4) => (SectorType::Normal, SectorLegality::AlienOnly),
                _ => (SectorType::Normal, SectorLegality::All),
            };
            builder = builder.sector(Sector::new(
                Coordinate::new(col, row),
                sector_type,
                legality,
            ));
        }
    }
    grid_edges(builder, COLUMNS, ROWS).build()
}

/// A tight 3x3 board for quick games and exercising the rules.
fn training() -> Result<GameMap, MapError> {
    const COLUMNS: i32 = 3;
    const ROWS: i32 = 3;

    let mut builder = MapBuilder::new(
        "training",
        Coordinate::new(0, 0),
        COLUMNS as u32,
        ROWS as u32,
    );
    for col in 0..COLUMNS {
        for row in 0..ROWS {
            let (sector_type, legality) = match (col, row) {
                (0, 0) => (SectorType::AlienStart, SectorLegality::All),
                (1, 1) => (SectorType::HumanStart, SectorLegality::All),
                (2, 0) => (SectorType::OpenRescue, SectorLegality::HumanOnly),
                (2, 2) => (SectorType::Normal, SectorLegality::None),
                _ => (SectorType::Normal, SectorLegality::All),
            };
            builder = builder.sector(Sector::new(
                Coordinate::new(col, row),
                sector_type,
                legality,
            ));
        }
    }
    grid_edges(builder, COLUMNS, ROWS).build()
}
