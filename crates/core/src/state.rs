use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::config::{FUEL_CAPACITY, STARTING_HEALTH};
use crate::types::*;

#[derive(Clone, Debug)]
pub struct Planet {
    pub id: PlanetId,
    pub pos: Pos,
    pub resource: Resource,
    pub remaining: u32,
}

#[derive(Clone, Debug)]
pub struct Meteor {
    pub id: MeteorId,
    pub pos: Pos,
    pub damage: u32,
}

#[derive(Clone, Debug)]
pub struct Station {
    pub id: StationId,
    pub pos: Pos,
    pub refuel_amount: u32,
}

#[derive(Clone, Debug)]
pub struct Nebula {
    pub id: NebulaId,
    pub pos: Pos,
    pub sensor_reduction: u32,
}

#[derive(Clone, Debug)]
pub struct RadiationZone {
    pub id: RadiationId,
    pub pos: Pos,
    pub damage: u32,
}

/// Authoritative cell lattice. Flat row-major storage; out-of-bounds reads
/// come back as `Empty` so callers only branch on `in_bounds` where legality
/// matters.
#[derive(Clone)]
pub struct Grid {
    pub size: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![CellKind::Empty; size * size] }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.size
            && (pos.col as usize) < self.size
    }

    pub fn kind_at(&self, pos: Pos) -> CellKind {
        if !self.in_bounds(pos) {
            return CellKind::Empty;
        }
        self.cells[self.index(pos)]
    }

    pub fn set_kind(&mut self, pos: Pos, kind: CellKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.cells[idx] = kind;
    }

    pub fn total_cells(&self) -> usize {
        self.size * self.size
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.row as usize) * self.size + (pos.col as usize)
    }
}

/// Caller-owned probe vitals, synchronized into the planner once per tick
/// and mutated only through the environment's action API.
#[derive(Clone, Debug)]
pub struct ProbeState {
    pub pos: Pos,
    pub fuel: u32,
    pub health: u32,
    pub collected: ResourceTally,
    pub explored: BTreeSet<Pos>,
    pub covered_percentage: f32,
}

impl ProbeState {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            fuel: FUEL_CAPACITY,
            health: STARTING_HEALTH,
            collected: ResourceTally::default(),
            explored: BTreeSet::from([pos]),
            covered_percentage: 0.0,
        }
    }

    pub(crate) fn mark_explored(&mut self, pos: Pos, total_cells: usize) {
        self.explored.insert(pos);
        self.covered_percentage = (self.explored.len() as f32 / total_cells as f32) * 100.0;
    }

    pub(crate) fn take_damage(&mut self, damage: u32) {
        self.health = self.health.saturating_sub(damage);
    }
}

/// Entity containers owned by the environment. The grid mirrors entity
/// positions; both are mutated together through the env APIs only.
pub struct WorldState {
    pub grid: Grid,
    pub planets: SlotMap<PlanetId, Planet>,
    pub meteors: SlotMap<MeteorId, Meteor>,
    pub stations: SlotMap<StationId, Station>,
    pub nebulas: SlotMap<NebulaId, Nebula>,
    pub radiation_zones: SlotMap<RadiationId, RadiationZone>,
    pub end_pos: Pos,
}

impl WorldState {
    pub fn planet_at(&self, pos: Pos) -> Option<&Planet> {
        self.planets.values().find(|planet| planet.pos == pos)
    }

    pub fn station_at(&self, pos: Pos) -> Option<&Station> {
        self.stations.values().find(|station| station.pos == pos)
    }

    pub fn nebula_at(&self, pos: Pos) -> Option<&Nebula> {
        self.nebulas.values().find(|nebula| nebula.pos == pos)
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        self.grid.kind_at(pos) != CellKind::Empty
    }
}
