//! Environment state machine: owns the authoritative world, resolves probe
//! actions, advances hazard dynamics, and evaluates the goal predicates.
//! This file wires focused submodules together and holds the read-side API.

use std::collections::BTreeSet;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::config::MissionConfig;
use crate::state::{Meteor, Nebula, Planet, ProbeState, RadiationZone, Station, WorldState};
use crate::types::*;
use crate::worldgen;

mod actions;
mod hazards;
mod resolve;

pub struct SpaceEnv {
    pub(crate) world: WorldState,
    pub(crate) config: MissionConfig,
    pub(crate) tick: u64,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) log: Vec<EnvEvent>,
    start_pos: Pos,
}

impl SpaceEnv {
    pub fn new(seed: u64, config: MissionConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (world, start_pos) = worldgen::generate_world(&config, &mut rng);
        Self { world, config, tick: 0, rng, log: Vec::new(), start_pos }
    }

    /// Fresh vitals mirror parked at the mission start cell.
    pub fn spawn_probe(&self) -> ProbeState {
        ProbeState::new(self.start_pos)
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn log(&self) -> &[EnvEvent] {
        &self.log
    }

    pub fn end_pos(&self) -> Pos {
        self.world.end_pos
    }

    /// Live danger cells, recomputed from current meteor and radiation
    /// positions. Fed to the planner every tick.
    pub fn danger_positions(&self) -> BTreeSet<Pos> {
        self.world
            .meteors
            .values()
            .map(|meteor| meteor.pos)
            .chain(self.world.radiation_zones.values().map(|zone| zone.pos))
            .collect()
    }

    pub fn station_positions(&self) -> Vec<Pos> {
        self.world.stations.values().map(|station| station.pos).collect()
    }

    /// Termination and goal flags. Mission success is the caller's
    /// conjunction of the end position with both goal flags.
    pub fn goal_report(&self, probe: &ProbeState) -> GoalReport {
        let stranded = probe.fuel == 0 && self.world.station_at(probe.pos).is_none();
        let is_game_over = probe.health == 0 || stranded || probe.pos == self.world.end_pos;
        GoalReport {
            is_game_over,
            is_map_covered: probe.covered_percentage >= self.config.mapping_goal_percentage,
            is_resources_met: probe.collected.meets(&self.config.resource_goals),
        }
    }

    pub fn snapshot_hash(&self, probe: &ProbeState) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.tick);
        hasher.write_i32(probe.pos.row);
        hasher.write_i32(probe.pos.col);
        hasher.write_u32(probe.fuel);
        hasher.write_u32(probe.health);
        for resource in Resource::ALL {
            hasher.write_u32(probe.collected.get(resource));
        }
        for row in 0..self.world.grid.size as i32 {
            for col in 0..self.world.grid.size as i32 {
                hasher.write_u8(self.world.grid.kind_at(Pos { row, col }) as u8);
            }
        }
        hasher.finish()
    }

    /// What a cell holds once the probe marker is lifted off it. Used when
    /// the probe vacates a cell and when hazards drift under the probe.
    pub(crate) fn underlying_kind(&self, pos: Pos) -> CellKind {
        if let Some(planet) = self.world.planet_at(pos) {
            return if planet.remaining > 0 { CellKind::Planet } else { CellKind::Empty };
        }
        if self.world.meteors.values().any(|meteor| meteor.pos == pos) {
            return CellKind::Meteor;
        }
        if self.world.station_at(pos).is_some() {
            return CellKind::Station;
        }
        if self.world.nebula_at(pos).is_some() {
            return CellKind::Nebula;
        }
        if self.world.radiation_zones.values().any(|zone| zone.pos == pos) {
            return CellKind::Radiation;
        }
        if pos == self.world.end_pos {
            return CellKind::End;
        }
        CellKind::Empty
    }

    // Scenario-building mutators. Scripted demos and tests place entities on
    // empty cells; placement on an occupied cell is refused.

    pub fn add_planet(&mut self, pos: Pos, resource: Resource, remaining: u32) -> Option<PlanetId> {
        if self.world.is_occupied(pos) || !self.world.grid.in_bounds(pos) {
            return None;
        }
        let id = self.world.planets.insert_with_key(|id| Planet { id, pos, resource, remaining });
        self.world.grid.set_kind(pos, CellKind::Planet);
        Some(id)
    }

    pub fn add_meteor(&mut self, pos: Pos, damage: u32) -> Option<MeteorId> {
        if self.world.is_occupied(pos) || !self.world.grid.in_bounds(pos) {
            return None;
        }
        let id = self.world.meteors.insert_with_key(|id| Meteor { id, pos, damage });
        self.world.grid.set_kind(pos, CellKind::Meteor);
        Some(id)
    }

    pub fn add_station(&mut self, pos: Pos, refuel_amount: u32) -> Option<StationId> {
        if self.world.is_occupied(pos) || !self.world.grid.in_bounds(pos) {
            return None;
        }
        let id = self.world.stations.insert_with_key(|id| Station { id, pos, refuel_amount });
        self.world.grid.set_kind(pos, CellKind::Station);
        Some(id)
    }

    pub fn add_nebula(&mut self, pos: Pos, sensor_reduction: u32) -> Option<NebulaId> {
        if self.world.is_occupied(pos) || !self.world.grid.in_bounds(pos) {
            return None;
        }
        let id =
            self.world.nebulas.insert_with_key(|id| Nebula { id, pos, sensor_reduction });
        self.world.grid.set_kind(pos, CellKind::Nebula);
        Some(id)
    }

    pub fn add_radiation_zone(&mut self, pos: Pos, damage: u32) -> Option<RadiationId> {
        if self.world.is_occupied(pos) || !self.world.grid.in_bounds(pos) {
            return None;
        }
        let id =
            self.world.radiation_zones.insert_with_key(|id| RadiationZone { id, pos, damage });
        self.world.grid.set_kind(pos, CellKind::Radiation);
        Some(id)
    }
}
