//! Map cells: coordinates, sector types and legality classes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a sector in the map's table layout. Unique per map.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub col: i32,
    pub row: i32,
}

impl Coordinate {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// What a sector is on the board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorType {
    HumanStart,
    AlienStart,
    OpenRescue,
    ClosedRescue,
    Normal,
}

/// Which roles may take a sector as the endpoint or waypoint of a move.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorLegality {
    All,
    HumanOnly,
    AlienOnly,
    None,
}

/// One immutable cell of the map graph. Identity is the coordinate; two
/// sectors with the same coordinate are the same sector.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub coordinate: Coordinate,
    pub sector_type: SectorType,
    pub legality: SectorLegality,
}

impl Sector {
    pub fn new(coordinate: Coordinate, sector_type: SectorType, legality: SectorLegality) -> Self {
        Self {
            coordinate,
            sector_type,
            legality,
        }
    }

    /// True for both open and closed rescue hatches.
    pub fn is_rescue(&self) -> bool {
        matches!(
            self.sector_type,
            SectorType::OpenRescue | SectorType::ClosedRescue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new(3, -2).to_string(), "(3,-2)");
    }

    #[test]
    fn test_coordinate_identity() {
        let a = Coordinate::new(1, 2);
        let b = Coordinate::new(1, 2);
        let c = Coordinate::new(2, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sector_roundtrip() {
        let sector = Sector::new(
            Coordinate::new(4, 7),
            SectorType::OpenRescue,
            SectorLegality::HumanOnly,
        );
        let bytes = bincode::serialize(&sector).unwrap();
        let back: Sector = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, sector);
    }

    #[test]
    fn test_is_rescue() {
        let open = Sector::new(
            Coordinate::new(0, 0),
            SectorType::OpenRescue,
            SectorLegality::HumanOnly,
        );
        let closed = Sector::new(
            Coordinate::new(0, 1),
            SectorType::ClosedRescue,
            SectorLegality::HumanOnly,
        );
        let normal = Sector::new(
            Coordinate::new(0, 2),
            SectorType::Normal,
            SectorLegality::All,
        );
        assert!(open.is_rescue());
        assert!(closed.is_rescue());
        assert!(!normal.is_rescue());
    }
}
