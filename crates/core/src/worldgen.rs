//! Seeded random construction of the mission world.
//! This module exists so environment setup stays separate from per-tick
//! resolution; it runs once and never again during a mission.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use slotmap::SlotMap;

use crate::config::MissionConfig;
use crate::state::{Grid, Meteor, Nebula, Planet, RadiationZone, Station, WorldState};
use crate::types::{CellKind, Pos, Resource};

pub(crate) fn random_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u32() as usize) % len
}

pub(crate) fn random_range(rng: &mut ChaCha8Rng, min_value: u32, max_value: u32) -> u32 {
    debug_assert!(min_value <= max_value);
    min_value + rng.next_u32() % (max_value - min_value + 1)
}

pub(crate) fn chance(rng: &mut ChaCha8Rng, probability: f64) -> bool {
    (rng.next_u64() as f64 / u64::MAX as f64) < probability
}

/// Rejection-sample an unoccupied cell. The grid is large relative to its
/// entity counts, so this terminates quickly in practice.
pub(crate) fn random_empty_position(rng: &mut ChaCha8Rng, grid: &Grid) -> Pos {
    loop {
        let pos = Pos {
            row: random_index(rng, grid.size) as i32,
            col: random_index(rng, grid.size) as i32,
        };
        if grid.kind_at(pos) == CellKind::Empty {
            return pos;
        }
    }
}

/// Build the world for `config`, returning it with the probe start position.
pub fn generate_world(config: &MissionConfig, rng: &mut ChaCha8Rng) -> (WorldState, Pos) {
    let mut grid = Grid::new(config.grid_size);

    let start_pos = config.start.unwrap_or_else(|| random_empty_position(rng, &grid));
    grid.set_kind(start_pos, CellKind::ProbeHere);

    let end_pos = config.end.unwrap_or_else(|| random_empty_position(rng, &grid));
    grid.set_kind(end_pos, CellKind::End);

    let mut planets = SlotMap::with_key();
    for _ in 0..config.num_planets {
        let pos = random_empty_position(rng, &grid);
        let resource = Resource::ALL[random_index(rng, Resource::ALL.len())];
        let remaining = random_range(rng, 5, 20);
        planets.insert_with_key(|id| Planet { id, pos, resource, remaining });
        grid.set_kind(pos, CellKind::Planet);
    }

    let mut meteors = SlotMap::with_key();
    for _ in 0..config.num_meteors {
        let pos = random_empty_position(rng, &grid);
        let damage = random_range(rng, 5, 15);
        meteors.insert_with_key(|id| Meteor { id, pos, damage });
        grid.set_kind(pos, CellKind::Meteor);
    }

    let mut nebulas = SlotMap::with_key();
    for _ in 0..config.num_nebulas {
        let pos = random_empty_position(rng, &grid);
        nebulas.insert_with_key(|id| Nebula {
            id,
            pos,
            sensor_reduction: config.nebula_sensor_reduction,
        });
        grid.set_kind(pos, CellKind::Nebula);
    }

    let mut radiation_zones = SlotMap::with_key();
    for _ in 0..config.num_radiation_zones {
        let pos = random_empty_position(rng, &grid);
        radiation_zones.insert_with_key(|id| RadiationZone {
            id,
            pos,
            damage: config.radiation_damage,
        });
        grid.set_kind(pos, CellKind::Radiation);
    }

    let mut stations = SlotMap::with_key();
    for _ in 0..config.num_stations {
        let pos = random_empty_position(rng, &grid);
        stations.insert_with_key(|id| Station {
            id,
            pos,
            refuel_amount: config.station_refuel_amount,
        });
        grid.set_kind(pos, CellKind::Station);
    }

    let world =
        WorldState { grid, planets, meteors, stations, nebulas, radiation_zones, end_pos };
    (world, start_pos)
}
