//! The sector graph and the movement-legality engine.
//!
//! A [`GameMap`] is an undirected, unweighted graph of [`Sector`]s with a
//! precomputed neighbor index. It is assembled once through [`MapBuilder`]
//! and never mutated afterwards, so legality queries are pure reads and
//! safe to run from any number of tasks without synchronization.

use crate::sector::{Coordinate, Sector, SectorLegality, SectorType};
use crate::PlayerRole;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Faults that make a map unusable for play. Construction refuses to
/// produce a map when any of these hold.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no {0:?} sector")]
    MissingStart(SectorType),
    #[error("map has more than one {0:?} sector")]
    DuplicateStart(SectorType),
    #[error("two sectors share the coordinate {0}")]
    DuplicateSector(Coordinate),
    #[error("edge endpoint {0} is not a sector of this map")]
    UnknownEdgeEndpoint(Coordinate),
}

/// Assembles a [`GameMap`] from sectors, undirected edges and the table
/// layout metadata the presentation side consumes.
pub struct MapBuilder {
    name: String,
    origin: Coordinate,
    columns: u32,
    rows: u32,
    sectors: Vec<Sector>,
    edges: Vec<(Coordinate, Coordinate)>,
}

impl MapBuilder {
    pub fn new(name: impl Into<String>, origin: Coordinate, columns: u32, rows: u32) -> Self {
        Self {
            name: name.into(),
            origin,
            columns,
            rows,
            sectors: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn sector(mut self, sector: Sector) -> Self {
        self.sectors.push(sector);
        self
    }

    /// Declares an undirected edge; both directions become traversable.
    pub fn edge(mut self, a: Coordinate, b: Coordinate) -> Self {
        self.edges.push((a, b));
        self
    }

    pub fn build(self) -> Result<GameMap, MapError> {
        let mut sectors: HashMap<Coordinate, Sector> = HashMap::with_capacity(self.sectors.len());
        for sector in self.sectors {
            if sectors.insert(sector.coordinate, sector).is_some() {
                return Err(MapError::DuplicateSector(sector.coordinate));
            }
        }

        let mut neighbors: HashMap<Coordinate, Vec<Coordinate>> =
            sectors.keys().map(|&c| (c, Vec::new())).collect();
        for (a, b) in self.edges {
            for endpoint in [a, b] {
                if !sectors.contains_key(&endpoint) {
                    return Err(MapError::UnknownEdgeEndpoint(endpoint));
                }
            }
            for (from, to) in [(a, b), (b, a)] {
                let list = neighbors.entry(from).or_default();
                if !list.contains(&to) {
                    list.push(to);
                }
            }
        }

        let human_start = Self::unique_start(&sectors, SectorType::HumanStart)?;
        let alien_start = Self::unique_start(&sectors, SectorType::AlienStart)?;
        let rescues: Vec<Coordinate> = sectors
            .values()
            .filter(|s| s.is_rescue())
            .map(|s| s.coordinate)
            .collect();

        Ok(GameMap {
            name: self.name,
            origin: self.origin,
            columns: self.columns,
            rows: self.rows,
            sectors,
            neighbors,
            human_start,
            alien_start,
            rescues,
        })
    }

    fn unique_start(
        sectors: &HashMap<Coordinate, Sector>,
        sector_type: SectorType,
    ) -> Result<Sector, MapError> {
        let mut found = sectors.values().filter(|s| s.sector_type == sector_type);
        let first = found.next().ok_or(MapError::MissingStart(sector_type))?;
        if found.next().is_some() {
            return Err(MapError::DuplicateStart(sector_type));
        }
        Ok(*first)
    }
}

/// The game map: all sectors, their adjacency, the cached start sectors
/// and the construction-time rescue list. Immutable after build.
#[derive(Debug, Clone)]
pub struct GameMap {
    name: String,
    origin: Coordinate,
    columns: u32,
    rows: u32,
    sectors: HashMap<Coordinate, Sector>,
    neighbors: HashMap<Coordinate, Vec<Coordinate>>,
    human_start: Sector,
    alien_start: Sector,
    // Rescue sectors found at construction. Sectors never change after
    // build, so this list cannot drift from live state.
    rescues: Vec<Coordinate>,
}

impl GameMap {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Origin of the map's table layout.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Exact coordinate match across the full sector set.
    pub fn sector_at(&self, coordinate: Coordinate) -> Option<&Sector> {
        self.sectors.get(&coordinate)
    }

    /// First sector whose type matches. Only meaningful for unique types;
    /// the start sectors are unique by construction.
    pub fn first_sector_of_type(&self, sector_type: SectorType) -> Option<&Sector> {
        self.sectors.values().find(|s| s.sector_type == sector_type)
    }

    /// The unique human starting sector, cached at construction.
    pub fn human_start(&self) -> Sector {
        self.human_start
    }

    /// The unique alien starting sector, cached at construction.
    pub fn alien_start(&self) -> Sector {
        self.alien_start
    }

    /// Sectors sharing an edge with `coordinate`. Unknown coordinates
    /// have no neighbors.
    pub fn neighbors(&self, coordinate: Coordinate) -> &[Coordinate] {
        self.neighbors
            .get(&coordinate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All sectors, in no particular order. The presentation side feeds
    /// its map surface from this.
    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.values()
    }

    /// True while at least one cached rescue sector is an open hatch.
    pub fn rescue_sectors_exist(&self) -> bool {
        self.rescues.iter().any(|c| {
            self.sectors
                .get(c)
                .map_or(false, |s| s.sector_type == SectorType::OpenRescue)
        })
    }

    /// Decides whether one move is legal.
    ///
    /// Only the endpoint's legality gates whether the move is considered
    /// at all; every intermediate hop is additionally filtered by the
    /// waypoint classes below before it contributes further reach.
    ///
    /// Humans move exactly one hop, or exactly two hops with adrenaline;
    /// `speed` is read only by the alien branch. Aliens reach up to two
    /// hops, three once `speed` exceeds 2, always through `All`-legality
    /// waypoints.
    ///
    /// Never errors: a source outside the graph has no neighbors and the
    /// answer is simply `false`.
    pub fn is_move_legal(
        &self,
        source: Coordinate,
        target: Coordinate,
        speed: u32,
        role: PlayerRole,
        adrenaline: bool,
    ) -> bool {
        let target_sector = match self.sector_at(target) {
            Some(sector) => *sector,
            None => return false,
        };

        match role {
            PlayerRole::Human => {
                if target_sector.legality == SectorLegality::None {
                    return false;
                }
                let depth_one = self.neighbors(source);
                if !adrenaline {
                    return depth_one.contains(&target);
                }
                // Adrenaline reach is the exact two-hop set; the one-hop
                // set is not unioned in.
                let mut depth_two = HashSet::new();
                for &waypoint in depth_one {
                    if self.waypoint_passable(
                        waypoint,
                        &[SectorLegality::All, SectorLegality::HumanOnly],
                    ) {
                        depth_two.extend(self.neighbors(waypoint).iter().copied());
                    }
                }
                depth_two.contains(&target)
            }
            PlayerRole::Alien => {
                if matches!(
                    target_sector.legality,
                    SectorLegality::None | SectorLegality::HumanOnly
                ) {
                    return false;
                }
                let depth_one = self.neighbors(source);
                let mut depth_two = HashSet::new();
                for &waypoint in depth_one {
                    if self.waypoint_passable(waypoint, &[SectorLegality::All]) {
                        depth_two.extend(self.neighbors(waypoint).iter().copied());
                    }
                }
                let mut depth_three = HashSet::new();
                if speed > 2 {
                    for &waypoint in depth_two.iter() {
                        if self.waypoint_passable(waypoint, &[SectorLegality::All]) {
                            depth_three.extend(self.neighbors(waypoint).iter().copied());
                        }
                    }
                }
                depth_one.contains(&target)
                    || depth_two.contains(&target)
                    || depth_three.contains(&target)
            }
        }
    }

    fn waypoint_passable(&self, coordinate: Coordinate, classes: &[SectorLegality]) -> bool {
        self.sector_at(coordinate)
            .map_or(false, |s| classes.contains(&s.legality))
    }
}
