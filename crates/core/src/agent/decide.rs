//! Top-level per-tick action choice: collect, scan, dock, or move, with a
//! locally greedy exploration step when the target machinery comes up dry.

use super::pathfinding::find_path;
use super::*;
use crate::config::SCAN_MIN_FUEL;
use crate::worldgen;

impl ProbeAgent {
    /// Pick one action from the legal set. Randomness appears only in the
    /// greedy-move tie-break; everything else is deterministic given memory
    /// and the snapshot.
    pub fn choose_action(&mut self, snapshot: &TickSnapshot, legal: &[Action]) -> Action {
        self.record_position(snapshot.pos);

        if legal.contains(&Action::Collect) {
            return Action::Collect;
        }

        if legal.contains(&Action::Scan)
            && snapshot.fuel > SCAN_MIN_FUEL
            && self.should_scan(snapshot.pos)
        {
            self.last_scan_pos = Some(snapshot.pos);
            return Action::Scan;
        }

        if legal.contains(&Action::Dock) && snapshot.fuel < self.config.dock_below_fuel {
            return Action::Dock;
        }

        if let Some(direction) = self.next_move(snapshot)
            && legal.contains(&Action::Move(direction))
        {
            return Action::Move(direction);
        }

        if let Some(direction) = self.greedy_explore_move(snapshot, legal) {
            return Action::Move(direction);
        }

        // Nothing safe to do but look around.
        Action::Scan
    }

    fn should_scan(&self, pos: Pos) -> bool {
        // Re-scanning the same cell reveals nothing new.
        if self.last_scan_pos == Some(pos) {
            return false;
        }
        if self.memory.len() < SCAN_BOOTSTRAP_CELLS {
            return true;
        }
        if let Some(last_scan) = self.last_scan_pos
            && manhattan(pos, last_scan) > SCAN_SPACING
        {
            return true;
        }
        neighbors(pos).iter().any(|n| self.in_bounds(*n) && !self.memory.contains_key(n))
    }

    /// One movement step from the path/target machinery, or `None` when no
    /// route-derived move exists.
    fn next_move(&mut self, snapshot: &TickSnapshot) -> Option<Direction> {
        // Emergency refueling overrides the current target entirely.
        if snapshot.fuel <= self.config.fuel_reserve
            && let Some(station) = self.nearest_reachable_station(snapshot)
            && let Some((path, _)) = find_path(&self.path_query(snapshot), snapshot.pos, station)
            && let Some(next) = path.first()
        {
            return direction_between(snapshot.pos, *next);
        }

        if let Some((target, _)) = self.current_target
            && target == snapshot.pos
        {
            self.clear_target();
        }
        if self.current_target.is_none() || self.in_loop() {
            self.select_new_target(snapshot);
        }

        let (target, _) = self.current_target?;
        let margin = self.config.path_fuel_margin;
        if let Some((path, cost)) = find_path(&self.path_query(snapshot), snapshot.pos, target)
            && cost <= snapshot.fuel.saturating_sub(margin)
            && let Some(next) = path.first()
        {
            return direction_between(snapshot.pos, *next);
        }

        // Target drifted out of reach; reassess once before giving up.
        self.clear_target();
        self.select_new_target(snapshot);
        let (target, _) = self.current_target?;
        let (path, _) = find_path(&self.path_query(snapshot), snapshot.pos, target)?;
        direction_between(snapshot.pos, *path.first()?)
    }

    /// Most information gain, least revisit, among safe legal moves. Ties
    /// are broken at random so a stuck probe does not ping-pong forever.
    fn greedy_explore_move(&mut self, snapshot: &TickSnapshot, legal: &[Action]) -> Option<Direction> {
        let mut best: Vec<Direction> = Vec::new();
        let mut best_score = i32::MIN;

        for direction in Direction::ALL {
            if !legal.contains(&Action::Move(direction)) {
                continue;
            }
            let dest = step(snapshot.pos, direction);
            if self.is_remembered_danger(dest) || snapshot.dangers.contains(&dest) {
                continue;
            }

            let mut score = 0;
            for neighbor in neighbors(dest) {
                if self.in_bounds(neighbor) && !self.memory.contains_key(&neighbor) {
                    score += 2;
                }
            }
            if !self.memory.contains_key(&dest) {
                score += 5;
            }
            if self.last_positions.contains(&dest) {
                score -= 2;
            }

            if score > best_score {
                best_score = score;
                best = vec![direction];
            } else if score == best_score {
                best.push(direction);
            }
        }

        if best.is_empty() {
            return None;
        }
        let pick = worldgen::random_index(&mut self.rng, best.len());
        Some(best[pick])
    }
}
