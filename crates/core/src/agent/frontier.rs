//! Frontier discovery: unsensed cells bordering remembered territory,
//! ranked by how much new ground they open.

use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrontierCell {
    pub pos: Pos,
    pub dist: u32,
    pub score: i32,
}

impl ProbeAgent {
    /// Frontier cells ranked best-first: most unsensed neighbors, nearest,
    /// with a penalty for cells close to the last scan so scans spread out.
    pub(crate) fn frontier_cells(&self, from: Pos) -> Vec<FrontierCell> {
        let mut seen = BTreeSet::new();
        let mut cells = Vec::new();

        for &remembered in self.memory.keys() {
            for candidate in neighbors(remembered) {
                if !self.in_bounds(candidate)
                    || self.memory.contains_key(&candidate)
                    || !seen.insert(candidate)
                {
                    continue;
                }
                let unsensed_neighbors = neighbors(candidate)
                    .iter()
                    .filter(|n| self.in_bounds(**n) && !self.memory.contains_key(n))
                    .count() as i32;
                let mut score = unsensed_neighbors;
                if let Some(last_scan) = self.last_scan_pos
                    && manhattan(candidate, last_scan) < 4
                {
                    score -= 2;
                }
                cells.push(FrontierCell { pos: candidate, dist: manhattan(from, candidate), score });
            }
        }

        cells.sort_by_key(|cell| (-cell.score, cell.dist, cell.pos));
        cells
    }

    /// Nearest frontier cell whose path is affordable under the fuel margin.
    pub(crate) fn fallback_frontier(&self, snapshot: &TickSnapshot) -> Option<Pos> {
        let margin = self.config.path_fuel_margin;
        let budget = snapshot.fuel.saturating_sub(margin);
        for cell in self.frontier_cells(snapshot.pos) {
            if cell.dist > budget {
                continue;
            }
            let query = self.path_query(snapshot);
            if pathfinding::find_path(&query, snapshot.pos, cell.pos).is_some() {
                return Some(cell.pos);
            }
        }
        None
    }

    /// Last-ditch destination: any remembered safe cell that still has an
    /// unsensed neighbor, nearest first.
    pub(crate) fn fallback_safe_spot(&self, snapshot: &TickSnapshot) -> Option<Pos> {
        let budget = snapshot.fuel.saturating_sub(self.config.path_fuel_margin);
        let mut spots: Vec<(u32, Pos)> = self
            .memory
            .iter()
            .filter(|(pos, kind)| {
                !kind.is_danger() && !snapshot.dangers.contains(pos) && **pos != snapshot.pos
            })
            .map(|(pos, _)| *pos)
            .filter(|pos| {
                neighbors(*pos)
                    .iter()
                    .any(|n| self.in_bounds(*n) && !self.memory.contains_key(n))
            })
            .map(|pos| (manhattan(snapshot.pos, pos), pos))
            .filter(|(dist, _)| *dist <= budget)
            .collect();
        spots.sort();
        spots.first().map(|(_, pos)| *pos)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{bare_agent, snapshot_at};
    use super::*;

    fn sense_block(agent: &mut ProbeAgent, rows: std::ops::Range<i32>, cols: std::ops::Range<i32>) {
        let percepts: Vec<Percept> = rows
            .flat_map(|row| {
                cols.clone().map(move |col| Percept {
                    pos: Pos { row, col },
                    kind: CellKind::Empty,
                    planet: None,
                })
            })
            .collect();
        agent.observe(&percepts);
    }

    #[test]
    fn frontier_prefers_cells_opening_the_most_new_territory() {
        let mut agent = bare_agent(10);
        sense_block(&mut agent, 0..3, 0..3);

        let cells = agent.frontier_cells(Pos { row: 1, col: 1 });
        assert!(!cells.is_empty());
        let best = cells[0];
        // Every frontier cell is unsensed and borders remembered ground.
        for cell in &cells {
            assert!(!agent.memory().contains_key(&cell.pos));
            assert!(neighbors(cell.pos).iter().any(|n| agent.memory().contains_key(n)));
        }
        // The best cell opens at least as much territory as any other.
        assert!(cells.iter().all(|cell| cell.score <= best.score));
    }

    #[test]
    fn frontier_near_last_scan_is_deprioritized() {
        let mut agent = bare_agent(12);
        sense_block(&mut agent, 0..2, 0..12);

        let without_penalty = agent.frontier_cells(Pos { row: 0, col: 0 });
        agent.last_scan_pos = Some(Pos { row: 0, col: 0 });
        let with_penalty = agent.frontier_cells(Pos { row: 0, col: 0 });

        let score_of = |cells: &[FrontierCell], pos: Pos| {
            cells.iter().find(|cell| cell.pos == pos).map(|cell| cell.score)
        };
        let near = Pos { row: 2, col: 0 };
        assert_eq!(
            score_of(&with_penalty, near),
            score_of(&without_penalty, near).map(|score| score - 2)
        );
    }

    #[test]
    fn fully_mapped_grid_has_no_frontier() {
        let mut agent = bare_agent(4);
        sense_block(&mut agent, 0..4, 0..4);
        assert!(agent.frontier_cells(Pos { row: 0, col: 0 }).is_empty());
        assert!(agent.fallback_frontier(&snapshot_at(Pos { row: 0, col: 0 }, 50)).is_none());
    }

    #[test]
    fn fallback_safe_spot_skips_dangers_and_dead_interior() {
        let mut agent = bare_agent(8);
        sense_block(&mut agent, 0..3, 0..3);
        agent.observe(&[Percept {
            pos: Pos { row: 2, col: 2 },
            kind: CellKind::Radiation,
            planet: None,
        }]);

        let spot = agent
            .fallback_safe_spot(&snapshot_at(Pos { row: 0, col: 0 }, 50))
            .expect("edge cells with unsensed neighbors exist");
        assert_ne!(spot, Pos { row: 2, col: 2 });
        assert!(neighbors(spot).iter().any(|n| !agent.memory().contains_key(n)));
    }
}
