//! Target selection: score candidate destinations, pick the best one whose
//! route is actually affordable, fall back to exploration when nothing is.

use super::pathfinding::{PathQuery, find_path};
use super::*;

/// Endpoint candidates outrank everything once the mission goals hold.
const ENDPOINT_SCORE: f32 = 10.0;
/// How many top frontier cells enter the scored candidate list.
const FRONTIER_CANDIDATES: usize = 5;

impl ProbeAgent {
    pub(crate) fn path_query<'a>(&'a self, snapshot: &'a TickSnapshot) -> PathQuery<'a> {
        PathQuery {
            memory: &self.memory,
            dangers: &snapshot.dangers,
            last_positions: &self.last_positions,
            grid_size: self.grid_size,
            fuel: snapshot.fuel,
            config: &self.config,
        }
    }

    /// Nearest station with a findable route affordable under current fuel.
    pub(crate) fn nearest_reachable_station(&self, snapshot: &TickSnapshot) -> Option<Pos> {
        let mut stations: Vec<Pos> = snapshot.stations.clone();
        stations.sort_by_key(|pos| (manhattan(snapshot.pos, *pos), *pos));
        stations.into_iter().find(|station| {
            find_path(&self.path_query(snapshot), snapshot.pos, *station)
                .is_some_and(|(_, cost)| cost <= snapshot.fuel)
        })
    }

    /// Build, score, and commit a new target. Candidates are tried in score
    /// order; the first with an affordable route wins. Fallbacks keep the
    /// probe moving even when no scored candidate qualifies.
    pub(crate) fn select_new_target(&mut self, snapshot: &TickSnapshot) {
        let candidates = self.scored_candidates(snapshot);
        let margin = self.config.path_fuel_margin;

        for candidate in candidates {
            let Some((path, cost)) =
                find_path(&self.path_query(snapshot), snapshot.pos, candidate.pos)
            else {
                continue;
            };
            if path.is_empty() || cost > snapshot.fuel.saturating_sub(margin) {
                continue;
            }
            self.set_target(candidate.pos, candidate.reason, snapshot.pos);
            return;
        }

        if let Some(pos) = self.fallback_frontier(snapshot) {
            self.set_target(pos, TargetReason::Fallback, snapshot.pos);
            return;
        }
        if let Some(pos) = self.fallback_safe_spot(snapshot) {
            self.set_target(pos, TargetReason::Fallback, snapshot.pos);
            return;
        }
        self.clear_target();
    }

    fn scored_candidates(&self, snapshot: &TickSnapshot) -> Vec<TargetCandidate> {
        let mut candidates = Vec::new();
        let margin = self.config.path_fuel_margin;

        if snapshot.fuel < self.config.low_fuel_threshold
            && let Some(station) = self.nearest_reachable_station(snapshot)
        {
            let dist = manhattan(snapshot.pos, station).max(1);
            candidates.push(TargetCandidate {
                score: (self.config.low_fuel_threshold - snapshot.fuel) as f32 / dist as f32,
                pos: station,
                reason: TargetReason::Refuel,
            });
        }

        for sighting in &self.known_planets {
            let unmet = self.unmet_amount(&snapshot.collected, sighting.resource);
            if sighting.remaining == 0 || unmet == 0 {
                continue;
            }
            let dist = manhattan(snapshot.pos, sighting.pos);
            if snapshot.fuel < dist + margin {
                continue;
            }
            let goal = self.resource_goals.get(sighting.resource).max(1);
            let need_ratio = unmet as f32 / goal as f32;
            candidates.push(TargetCandidate {
                score: need_ratio * self.config.resource_weight / dist.max(1) as f32,
                pos: sighting.pos,
                reason: TargetReason::Resource(sighting.resource),
            });
        }

        if self.mapped_percentage < self.mapping_goal_percentage {
            let explore_ratio = 1.0 - self.mapped_percentage / self.mapping_goal_percentage;
            for cell in self.frontier_cells(snapshot.pos).into_iter().take(FRONTIER_CANDIDATES) {
                if snapshot.fuel < cell.dist + margin {
                    continue;
                }
                candidates.push(TargetCandidate {
                    score: explore_ratio * self.config.exploration_weight / cell.dist.max(1) as f32,
                    pos: cell.pos,
                    reason: TargetReason::Explore,
                });
            }
        }

        if self.goals_satisfied(&snapshot.collected) {
            let dist = manhattan(snapshot.pos, self.end_pos);
            if snapshot.fuel >= dist {
                candidates.push(TargetCandidate {
                    score: ENDPOINT_SCORE,
                    pos: self.end_pos,
                    reason: TargetReason::Endpoint,
                });
            }
        }

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{bare_agent, snapshot_at};
    use super::*;

    fn sense_open_grid(agent: &mut ProbeAgent, size: i32) {
        let percepts: Vec<Percept> = (0..size)
            .flat_map(|row| {
                (0..size).map(move |col| Percept {
                    pos: Pos { row, col },
                    kind: CellKind::Empty,
                    planet: None,
                })
            })
            .collect();
        agent.observe(&percepts);
    }

    fn sense_planet(agent: &mut ProbeAgent, pos: Pos, resource: Resource, remaining: u32) {
        agent.observe(&[Percept {
            pos,
            kind: CellKind::Planet,
            planet: Some(PlanetSighting { pos, resource, remaining }),
        }]);
    }

    #[test]
    fn needed_resource_beats_exploration() {
        let mut agent = bare_agent(8);
        // Half the grid is mapped, so exploration candidates compete with
        // the remembered planet and must lose on score.
        agent.observe(
            &(0..4)
                .flat_map(|row| {
                    (0..8).map(move |col| Percept {
                        pos: Pos { row, col },
                        kind: CellKind::Empty,
                        planet: None,
                    })
                })
                .collect::<Vec<_>>(),
        );
        sense_planet(&mut agent, Pos { row: 3, col: 3 }, Resource::Minerals, 10);

        let snapshot = snapshot_at(Pos { row: 0, col: 0 }, 100);
        agent.select_new_target(&snapshot);
        let (target, reason) = agent.current_target().expect("target chosen");
        assert_eq!(target, Pos { row: 3, col: 3 });
        assert_eq!(reason, TargetReason::Resource(Resource::Minerals));
    }

    #[test]
    fn low_fuel_prefers_the_station_over_a_distant_planet() {
        let mut agent = bare_agent(10);
        sense_open_grid(&mut agent, 10);
        sense_planet(&mut agent, Pos { row: 9, col: 9 }, Resource::Water, 20);
        agent.observe(&[Percept {
            pos: Pos { row: 0, col: 3 },
            kind: CellKind::Station,
            planet: None,
        }]);

        let mut snapshot = snapshot_at(Pos { row: 0, col: 0 }, 12);
        snapshot.stations = vec![Pos { row: 0, col: 3 }];
        agent.select_new_target(&snapshot);
        let (target, reason) = agent.current_target().expect("target chosen");
        assert_eq!(reason, TargetReason::Refuel);
        assert_eq!(target, Pos { row: 0, col: 3 });
    }

    #[test]
    fn satisfied_goals_send_the_probe_to_the_endpoint() {
        let mut agent = bare_agent(6);
        agent.mapping_goal_percentage = 0.0;
        sense_open_grid(&mut agent, 6);

        let mut snapshot = snapshot_at(Pos { row: 0, col: 0 }, 100);
        snapshot.collected = ResourceTally { water: 10, minerals: 15, oxygen: 5 };
        agent.select_new_target(&snapshot);
        let (target, reason) = agent.current_target().expect("target chosen");
        assert_eq!(reason, TargetReason::Endpoint);
        assert_eq!(target, Pos { row: 5, col: 5 });
    }

    #[test]
    fn unaffordable_candidates_fall_through_to_exploration_fallback() {
        let mut agent = bare_agent(12);
        // Only a thin strip is known; the lone planet is too far for the
        // remaining fuel, so the fallback frontier wins.
        agent.observe(
            &(0..2)
                .flat_map(|row| {
                    (0..12).map(move |col| Percept {
                        pos: Pos { row, col },
                        kind: CellKind::Empty,
                        planet: None,
                    })
                })
                .collect::<Vec<_>>(),
        );
        sense_planet(&mut agent, Pos { row: 11, col: 11 }, Resource::Oxygen, 10);

        let snapshot = snapshot_at(Pos { row: 0, col: 0 }, 8);
        agent.select_new_target(&snapshot);
        let (_, reason) = agent.current_target().expect("fallback target");
        assert!(matches!(reason, TargetReason::Explore | TargetReason::Fallback));
    }

    #[test]
    fn exhausted_roster_and_no_frontier_clears_the_target() {
        let mut agent = bare_agent(3);
        sense_open_grid(&mut agent, 3);
        agent.mapping_goal_percentage = 200.0;

        let snapshot = snapshot_at(Pos { row: 1, col: 1 }, 2);
        agent.select_new_target(&snapshot);
        assert!(agent.current_target().is_none());
    }
}
