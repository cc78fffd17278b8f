//! Per-tick world dynamics: meteor drift and stochastic nebula spawning.

use super::*;
use crate::worldgen::{chance, random_empty_position, random_index};

impl SpaceEnv {
    /// Advance the world one tick after the probe's action has resolved.
    pub fn update_env(&mut self, probe: &mut ProbeState) {
        self.tick += 1;
        self.drift_meteors(probe);
        self.maybe_spawn_nebula();
    }

    fn drift_meteors(&mut self, probe: &mut ProbeState) {
        let ids: Vec<MeteorId> = self.world.meteors.keys().collect();
        for id in ids {
            if !chance(&mut self.rng, self.config.meteor_move_probability) {
                continue;
            }
            let direction = Direction::ALL[random_index(&mut self.rng, Direction::ALL.len())];
            let from = self.world.meteors[id].pos;
            let to = step(from, direction);
            if !self.world.grid.in_bounds(to) {
                continue;
            }
            // A meteor may share only the probe's cell; anything else
            // occupied holds it in place for this tick.
            let open = self.world.grid.kind_at(to) == CellKind::Empty || to == probe.pos;
            if !open {
                continue;
            }

            // Meteors can stack on the probe's cell, so the vacated cell
            // clears only once the last of them has left it.
            let still_occupied =
                self.world.meteors.values().any(|other| other.id != id && other.pos == from);
            if from != probe.pos && !still_occupied {
                self.world.grid.set_kind(from, CellKind::Empty);
            }
            self.world.meteors[id].pos = to;
            if to == probe.pos {
                let damage = self.world.meteors[id].damage;
                probe.take_damage(damage);
                self.log.push(EnvEvent::MeteorStruck { pos: to, damage });
            } else {
                self.world.grid.set_kind(to, CellKind::Meteor);
            }
        }
    }

    fn maybe_spawn_nebula(&mut self) {
        if !chance(&mut self.rng, self.config.nebula_spawn_probability) {
            return;
        }
        let pos = random_empty_position(&mut self.rng, &self.world.grid);
        let sensor_reduction = self.config.nebula_sensor_reduction;
        self.world.nebulas.insert_with_key(|id| Nebula { id, pos, sensor_reduction });
        self.world.grid.set_kind(pos, CellKind::Nebula);
        self.log.push(EnvEvent::NebulaSpawned { pos });
    }
}
