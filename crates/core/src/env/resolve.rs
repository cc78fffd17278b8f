//! Per-action resolution against the world: movement, scanning, resource
//! collection, and docking.

use super::*;
use crate::config::FUEL_CAPACITY;

impl SpaceEnv {
    /// Resolve one action. Illegal actions leave both the world and the
    /// probe untouched and surface as an error.
    pub fn do_action(
        &mut self,
        probe: &mut ProbeState,
        action: Action,
    ) -> Result<Vec<Percept>, EnvError> {
        if !self.legal_actions(probe).contains(&action) {
            return Err(EnvError::IllegalAction { action });
        }
        match action {
            Action::Move(direction) => Ok(self.resolve_move(probe, direction)),
            Action::Scan => Ok(self.resolve_scan(probe)),
            Action::Collect => {
                self.resolve_collect(probe);
                Ok(Vec::new())
            }
            Action::Dock => {
                self.resolve_dock(probe);
                Ok(Vec::new())
            }
        }
    }

    fn resolve_move(&mut self, probe: &mut ProbeState, direction: Direction) -> Vec<Percept> {
        let from = probe.pos;
        let to = step(from, direction);

        let vacated = self.underlying_kind(from);
        self.world.grid.set_kind(from, vacated);
        let entered = self.underlying_kind(to);
        self.world.grid.set_kind(to, CellKind::ProbeHere);

        probe.pos = to;
        probe.fuel -= 1;
        let newly_explored = !probe.explored.contains(&to);
        probe.mark_explored(to, self.world.grid.total_cells());

        let meteor_damage: u32 =
            self.world.meteors.values().filter(|m| m.pos == to).map(|m| m.damage).sum();
        if meteor_damage > 0 {
            probe.take_damage(meteor_damage);
            self.log.push(EnvEvent::MeteorStruck { pos: to, damage: meteor_damage });
        }
        let radiation_damage: u32 =
            self.world.radiation_zones.values().filter(|z| z.pos == to).map(|z| z.damage).sum();
        if radiation_damage > 0 {
            probe.take_damage(radiation_damage);
            self.log.push(EnvEvent::RadiationExposure { pos: to, damage: radiation_damage });
        }

        if newly_explored {
            vec![Percept { pos: to, kind: entered, planet: self.planet_sighting_at(to) }]
        } else {
            Vec::new()
        }
    }

    fn resolve_scan(&mut self, probe: &mut ProbeState) -> Vec<Percept> {
        let radius = self.effective_sensor_range(probe.pos) as i32;
        let size = self.world.grid.size as i32;
        let min_row = (probe.pos.row - radius).max(0);
        let max_row = (probe.pos.row + radius).min(size - 1);
        let min_col = (probe.pos.col - radius).max(0);
        let max_col = (probe.pos.col + radius).min(size - 1);

        let mut percepts = Vec::new();
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let pos = Pos { row, col };
                percepts.push(Percept {
                    pos,
                    kind: self.world.grid.kind_at(pos),
                    planet: self.planet_sighting_at(pos),
                });
                probe.mark_explored(pos, self.world.grid.total_cells());
            }
        }
        percepts
    }

    fn effective_sensor_range(&self, pos: Pos) -> u32 {
        match self.world.nebula_at(pos) {
            Some(nebula) => self.config.sensor_range.saturating_sub(nebula.sensor_reduction).max(1),
            None => self.config.sensor_range,
        }
    }

    fn planet_sighting_at(&self, pos: Pos) -> Option<PlanetSighting> {
        self.world.planet_at(pos).map(|planet| PlanetSighting {
            pos: planet.pos,
            resource: planet.resource,
            remaining: planet.remaining,
        })
    }

    fn resolve_collect(&mut self, probe: &mut ProbeState) {
        // Legality already proved a positive-amount planet is here.
        if let Some(planet) = self.world.planets.values_mut().find(|p| p.pos == probe.pos) {
            let amount = planet.remaining;
            probe.collected.add(planet.resource, amount);
            planet.remaining = 0;
            self.log.push(EnvEvent::Collected { resource: planet.resource, amount });
        }
    }

    fn resolve_dock(&mut self, probe: &mut ProbeState) {
        if let Some(station) = self.world.station_at(probe.pos) {
            probe.fuel = (probe.fuel + station.refuel_amount).min(FUEL_CAPACITY);
            self.log.push(EnvEvent::Docked { fuel_after: probe.fuel });
        }
    }
}
