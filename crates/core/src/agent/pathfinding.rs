//! Fuel-aware weighted A* over the agent's remembered map.
//! Unknown cells are allowed but penalized so a known route wins when one
//! exists; a path whose cost exceeds current fuel is rejected outright.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    g: u32,
    row: i32,
    col: i32,
}

pub(crate) struct PathQuery<'a> {
    pub memory: &'a BTreeMap<Pos, CellKind>,
    pub dangers: &'a BTreeSet<Pos>,
    pub last_positions: &'a VecDeque<Pos>,
    pub grid_size: usize,
    pub fuel: u32,
    pub config: &'a PlannerConfig,
}

impl PathQuery<'_> {
    fn in_bounds(&self, pos: Pos) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.grid_size
            && (pos.col as usize) < self.grid_size
    }

    fn step_cost(&self, pos: Pos) -> u32 {
        let mut cost = match self.memory.get(&pos) {
            Some(CellKind::Nebula) => self.config.nebula_step_cost,
            Some(_) => 1,
            None => 1 + self.config.unknown_penalty,
        };
        let remembered_danger = self.memory.get(&pos).is_some_and(|kind| kind.is_danger());
        if remembered_danger || self.dangers.contains(&pos) {
            cost += self.config.danger_penalty;
        }
        if self.last_positions.contains(&pos) {
            cost += self.config.revisit_penalty;
        }
        cost
    }
}

/// Cheapest known route from `start` to `goal` with its accumulated cost.
/// `None` when the goal is walled off by cost or unaffordable under fuel;
/// that is a normal outcome, not an error.
pub(crate) fn find_path(query: &PathQuery<'_>, start: Pos, goal: Pos) -> Option<(Vec<Pos>, u32)> {
    if !query.in_bounds(start) || !query.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some((Vec::new(), 0));
    }

    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();

    let h = manhattan(start, goal);
    open_set.insert(OpenNode { f: h, g: 0, row: start.row, col: start.col });
    g_score.insert(start, 0u32);

    while let Some(current_node) = open_set.pop_first() {
        let current = Pos { row: current_node.row, col: current_node.col };
        if current == goal {
            let cost = g_score[&current];
            return Some((reconstruct_path(&came_from, start, goal), cost));
        }
        let current_g = g_score[&current];
        if current_g < current_node.g {
            // Stale queue entry superseded by a cheaper route.
            continue;
        }

        for neighbor in neighbors(current) {
            if !query.in_bounds(neighbor) {
                continue;
            }
            let tentative_g = current_g + query.step_cost(neighbor);
            if tentative_g > query.fuel {
                continue;
            }
            if tentative_g < g_score.get(&neighbor).copied().unwrap_or(u32::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g);
                let h = manhattan(neighbor, goal);
                open_set.insert(OpenNode {
                    f: tentative_g + h,
                    g: tentative_g,
                    row: neighbor.row,
                    col: neighbor.col,
                });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        let Some(prev) = came_from.get(&current).copied() else {
            return Vec::new();
        };
        current = prev;
        path.push(current);
    }
    path.reverse();
    path.remove(0);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use proptest::prelude::*;

    struct Fixture {
        memory: BTreeMap<Pos, CellKind>,
        dangers: BTreeSet<Pos>,
        last_positions: VecDeque<Pos>,
        config: PlannerConfig,
    }

    impl Fixture {
        fn open_map(size: i32) -> Self {
            let mut memory = BTreeMap::new();
            for row in 0..size {
                for col in 0..size {
                    memory.insert(Pos { row, col }, CellKind::Empty);
                }
            }
            Self {
                memory,
                dangers: BTreeSet::new(),
                last_positions: VecDeque::new(),
                config: PlannerConfig::default(),
            }
        }

        fn query(&self, grid_size: usize, fuel: u32) -> PathQuery<'_> {
            PathQuery {
                memory: &self.memory,
                dangers: &self.dangers,
                last_positions: &self.last_positions,
                grid_size,
                fuel,
                config: &self.config,
            }
        }
    }

    #[test]
    fn straight_line_over_known_cells_costs_its_length() {
        let fixture = Fixture::open_map(7);
        let (path, cost) = find_path(
            &fixture.query(7, 100),
            Pos { row: 3, col: 1 },
            Pos { row: 3, col: 5 },
        )
        .expect("path");
        assert_eq!(path.len(), 4);
        assert_eq!(cost, 4);
        assert_eq!(path.last().copied(), Some(Pos { row: 3, col: 5 }));
    }

    #[test]
    fn remembered_danger_is_routed_around() {
        let mut fixture = Fixture::open_map(5);
        // A meteor remembered dead ahead; the detour is cheaper than +20.
        fixture.memory.insert(Pos { row: 2, col: 2 }, CellKind::Meteor);
        let (path, cost) = find_path(
            &fixture.query(5, 100),
            Pos { row: 2, col: 0 },
            Pos { row: 2, col: 4 },
        )
        .expect("path");
        assert!(!path.contains(&Pos { row: 2, col: 2 }));
        assert_eq!(cost, 6);
    }

    #[test]
    fn live_danger_positions_penalize_even_unremembered_cells() {
        let mut fixture = Fixture::open_map(5);
        fixture.dangers.insert(Pos { row: 2, col: 2 });
        let (path, _) = find_path(
            &fixture.query(5, 100),
            Pos { row: 2, col: 0 },
            Pos { row: 2, col: 4 },
        )
        .expect("path");
        assert!(!path.contains(&Pos { row: 2, col: 2 }));
    }

    #[test]
    fn unknown_cells_are_penalized_but_not_forbidden() {
        let mut fixture = Fixture::open_map(5);
        // Forget one corridor cell; the route still exists but prefers the
        // fully known detour when the costs tie against the penalty.
        fixture.memory.remove(&Pos { row: 2, col: 2 });
        let (_, cost_with_gap) = find_path(
            &fixture.query(5, 100),
            Pos { row: 2, col: 0 },
            Pos { row: 2, col: 4 },
        )
        .expect("path");
        // Detour through row 1 or 3 is 6 known steps; the straight line
        // would be 4 + 2 penalty = 6. Either way cost is 6.
        assert_eq!(cost_with_gap, 6);
    }

    #[test]
    fn path_exceeding_fuel_is_rejected() {
        let fixture = Fixture::open_map(9);
        let result =
            find_path(&fixture.query(9, 3), Pos { row: 0, col: 0 }, Pos { row: 0, col: 8 });
        assert!(result.is_none());
    }

    #[test]
    fn fully_walled_off_goal_returns_none() {
        let mut fixture = Fixture::open_map(5);
        fixture.config.danger_penalty = 20;
        for neighbor in neighbors(Pos { row: 2, col: 2 }) {
            fixture.memory.insert(neighbor, CellKind::Radiation);
        }
        // With fuel below the danger penalty no step into the ring is
        // affordable, so the center cannot be reached.
        let result =
            find_path(&fixture.query(5, 10), Pos { row: 0, col: 0 }, Pos { row: 2, col: 2 });
        assert!(result.is_none());
    }

    #[test]
    fn start_equals_goal_yields_an_empty_path() {
        let fixture = Fixture::open_map(4);
        let (path, cost) =
            find_path(&fixture.query(4, 10), Pos { row: 1, col: 1 }, Pos { row: 1, col: 1 })
                .expect("trivial path");
        assert!(path.is_empty());
        assert_eq!(cost, 0);
    }

    proptest! {
        #[test]
        fn returned_cost_never_exceeds_fuel_and_grows_along_the_path(
            start_row in 0i32..7,
            start_col in 0i32..7,
            goal_row in 0i32..7,
            goal_col in 0i32..7,
            fuel in 0u32..40,
        ) {
            let fixture = Fixture::open_map(7);
            let query = fixture.query(7, fuel);
            let start = Pos { row: start_row, col: start_col };
            let goal = Pos { row: goal_row, col: goal_col };
            if let Some((path, cost)) = find_path(&query, start, goal) {
                prop_assert!(cost <= fuel);
                let mut prev = start;
                let mut running = 0u32;
                for pos in &path {
                    prop_assert_eq!(manhattan(prev, *pos), 1);
                    // Accumulated cost grows strictly at every step.
                    let next = running + query.step_cost(*pos);
                    prop_assert!(next > running);
                    running = next;
                    prev = *pos;
                }
                prop_assert_eq!(running, cost);
                if start != goal {
                    prop_assert_eq!(path.last().copied(), Some(goal));
                }
            }
        }
    }
}
