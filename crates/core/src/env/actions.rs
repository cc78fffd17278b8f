//! Action legality rules.

use super::*;

impl SpaceEnv {
    /// The actions the probe may take right now. Scan never costs fuel and
    /// stays legal for as long as the probe is alive; a probe out of fuel on
    /// a station may still dock.
    pub fn legal_actions(&self, probe: &ProbeState) -> Vec<Action> {
        let mut legal = vec![Action::Scan];
        if probe.health == 0 {
            return legal;
        }
        if probe.fuel == 0 {
            if self.world.station_at(probe.pos).is_some() {
                legal.push(Action::Dock);
            }
            return legal;
        }

        for direction in Direction::ALL {
            if self.world.grid.in_bounds(step(probe.pos, direction)) {
                legal.push(Action::Move(direction));
            }
        }
        if self.world.planet_at(probe.pos).is_some_and(|planet| planet.remaining > 0) {
            legal.push(Action::Collect);
        }
        if self.world.station_at(probe.pos).is_some() {
            legal.push(Action::Dock);
        }
        legal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::tests::empty_mission;

    #[test]
    fn corner_probe_loses_out_of_bounds_moves() {
        let env = empty_mission(6);
        let probe = env.spawn_probe();
        let legal = env.legal_actions(&probe);
        assert!(legal.contains(&Action::Move(Direction::Down)));
        assert!(legal.contains(&Action::Move(Direction::Right)));
        assert!(!legal.contains(&Action::Move(Direction::Up)));
        assert!(!legal.contains(&Action::Move(Direction::Left)));
        assert!(legal.contains(&Action::Scan));
    }

    #[test]
    fn dead_probe_may_only_scan() {
        let env = empty_mission(6);
        let mut probe = env.spawn_probe();
        probe.health = 0;
        assert_eq!(env.legal_actions(&probe), vec![Action::Scan]);
    }

    #[test]
    fn stranded_probe_on_a_station_may_still_dock() {
        let mut env = empty_mission(6);
        let station = Pos { row: 2, col: 2 };
        env.add_station(station, 70).expect("empty cell");

        let mut probe = env.spawn_probe();
        probe.fuel = 0;
        assert_eq!(env.legal_actions(&probe), vec![Action::Scan]);

        probe.pos = station;
        assert_eq!(env.legal_actions(&probe), vec![Action::Scan, Action::Dock]);
    }

    #[test]
    fn collect_requires_a_planet_with_remaining_resource() {
        let mut env = empty_mission(6);
        let cell = Pos { row: 3, col: 3 };
        let id = env.add_planet(cell, Resource::Oxygen, 4).expect("empty cell");

        let mut probe = env.spawn_probe();
        probe.pos = cell;
        assert!(env.legal_actions(&probe).contains(&Action::Collect));

        env.world.planets[id].remaining = 0;
        assert!(!env.legal_actions(&probe).contains(&Action::Collect));
    }
}
