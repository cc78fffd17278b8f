//! Agent planner: partial-knowledge memory, fuel-aware path search, and
//! target prioritization. This module owns decision state only; the
//! authoritative world belongs to the environment and reaches the planner
//! as percepts and per-tick snapshots.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::config::PlannerConfig;
use crate::types::*;

mod decide;
mod frontier;
mod pathfinding;
mod planner;

pub(crate) const POSITION_HISTORY_LEN: usize = 10;
/// Below this many remembered cells the planner always wants a scan.
pub(crate) const SCAN_BOOTSTRAP_CELLS: usize = 20;
/// A scan further than this from the last scan position is worth taking.
pub(crate) const SCAN_SPACING: u32 = 3;

/// Live per-tick inputs from the caller: the authoritative vitals mirror
/// plus danger and station positions recomputed this tick.
#[derive(Clone, Debug)]
pub struct TickSnapshot {
    pub pos: Pos,
    pub fuel: u32,
    pub health: u32,
    pub collected: ResourceTally,
    pub dangers: BTreeSet<Pos>,
    pub stations: Vec<Pos>,
}

pub struct ProbeAgent {
    grid_size: usize,
    config: PlannerConfig,
    resource_goals: ResourceTally,
    mapping_goal_percentage: f32,
    end_pos: Pos,
    /// Last observed cell kind per sensed position. Grows, never shrinks.
    memory: BTreeMap<Pos, CellKind>,
    /// Discovered planets with their last-seen amounts; exhausted entries
    /// are pruned on re-observation.
    known_planets: Vec<PlanetSighting>,
    /// Rolling window of recent positions for loop detection and
    /// revisit-weighting only; never a path cost input beyond its penalty.
    last_positions: VecDeque<Pos>,
    current_target: Option<(Pos, TargetReason)>,
    last_scan_pos: Option<Pos>,
    mapped_percentage: f32,
    rng: ChaCha8Rng,
    log: Vec<AgentEvent>,
}

impl ProbeAgent {
    pub fn new(
        seed: u64,
        grid_size: usize,
        end_pos: Pos,
        resource_goals: ResourceTally,
        mapping_goal_percentage: f32,
        config: PlannerConfig,
    ) -> Self {
        Self {
            grid_size,
            config,
            resource_goals,
            mapping_goal_percentage,
            end_pos,
            memory: BTreeMap::new(),
            known_planets: Vec::new(),
            last_positions: VecDeque::new(),
            current_target: None,
            last_scan_pos: None,
            mapped_percentage: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            log: Vec::new(),
        }
    }

    /// Fold sensor percepts into memory and the planet roster, then refresh
    /// the mapped percentage.
    pub fn observe(&mut self, percepts: &[Percept]) {
        for percept in percepts {
            self.memory.insert(percept.pos, percept.kind);
            if let Some(sighting) = percept.planet {
                self.known_planets.retain(|known| known.pos != sighting.pos);
                if sighting.remaining > 0 {
                    self.known_planets.push(sighting);
                }
            }
        }
        let total_cells = (self.grid_size * self.grid_size) as f32;
        self.mapped_percentage = (self.memory.len() as f32 / total_cells) * 100.0;
    }

    pub fn mapped_percentage(&self) -> f32 {
        self.mapped_percentage
    }

    pub fn memory(&self) -> &BTreeMap<Pos, CellKind> {
        &self.memory
    }

    pub fn known_planets(&self) -> &[PlanetSighting] {
        &self.known_planets
    }

    pub fn current_target(&self) -> Option<(Pos, TargetReason)> {
        self.current_target
    }

    pub fn log(&self) -> &[AgentEvent] {
        &self.log
    }

    pub(crate) fn in_bounds(&self, pos: Pos) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.grid_size
            && (pos.col as usize) < self.grid_size
    }

    /// More than half of the recent window revisits the same cells.
    pub(crate) fn in_loop(&self) -> bool {
        if self.last_positions.len() < POSITION_HISTORY_LEN {
            return false;
        }
        let distinct: BTreeSet<Pos> = self.last_positions.iter().copied().collect();
        distinct.len() < self.last_positions.len() / 2
    }

    pub(crate) fn record_position(&mut self, pos: Pos) {
        self.last_positions.push_back(pos);
        while self.last_positions.len() > POSITION_HISTORY_LEN {
            self.last_positions.pop_front();
        }
    }

    /// Unmet amount per resource against the mission goals.
    pub(crate) fn unmet_amount(&self, collected: &ResourceTally, resource: Resource) -> u32 {
        self.resource_goals.get(resource).saturating_sub(collected.get(resource))
    }

    pub(crate) fn goals_satisfied(&self, collected: &ResourceTally) -> bool {
        collected.meets(&self.resource_goals)
            && self.mapped_percentage >= self.mapping_goal_percentage
    }

    pub(crate) fn set_target(&mut self, target: Pos, reason: TargetReason, current_pos: Pos) {
        let changed = self.current_target != Some((target, reason));
        self.current_target = Some((target, reason));
        if changed {
            // Fresh target, fresh loop-detection window.
            self.last_positions.clear();
            self.last_positions.push_back(current_pos);
            self.log.push(AgentEvent::TargetChanged { reason, target });
        }
    }

    pub(crate) fn clear_target(&mut self) {
        self.current_target = None;
    }

    pub(crate) fn is_remembered_danger(&self, pos: Pos) -> bool {
        self.memory.get(&pos).is_some_and(|kind| kind.is_danger())
    }
}
