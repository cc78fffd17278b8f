use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct PlanetId;
    pub struct MeteorId;
    pub struct StationId;
    pub struct NebulaId;
    pub struct RadiationId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

/// Occupant category of a grid cell. Exactly one kind per cell; the agent's
/// notion of "never sensed" lives in its memory, not on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellKind {
    Empty,
    ProbeHere,
    Planet,
    Meteor,
    Station,
    Nebula,
    Radiation,
    End,
}

impl CellKind {
    pub fn is_danger(self) -> bool {
        matches!(self, CellKind::Meteor | CellKind::Radiation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Water,
    Minerals,
    Oxygen,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Water, Resource::Minerals, Resource::Oxygen];
}

/// Collected (or targeted) amounts per resource type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTally {
    pub water: u32,
    pub minerals: u32,
    pub oxygen: u32,
}

impl ResourceTally {
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Water => self.water,
            Resource::Minerals => self.minerals,
            Resource::Oxygen => self.oxygen,
        }
    }

    pub fn add(&mut self, resource: Resource, amount: u32) {
        match resource {
            Resource::Water => self.water += amount,
            Resource::Minerals => self.minerals += amount,
            Resource::Oxygen => self.oxygen += amount,
        }
    }

    /// True when every counter in `self` meets or exceeds the goal counter.
    pub fn meets(&self, goals: &ResourceTally) -> bool {
        Resource::ALL.iter().all(|&resource| self.get(resource) >= goals.get(resource))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    Move(Direction),
    Scan,
    Collect,
    Dock,
}

/// What a planet looked like when last sensed. Carried on scan percepts so
/// the agent can keep its roster current without touching world state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanetSighting {
    pub pos: Pos,
    pub resource: Resource,
    pub remaining: u32,
}

/// One position/cell-kind observation emitted by a scan or a move into a
/// newly explored cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Percept {
    pub pos: Pos,
    pub kind: CellKind,
    pub planet: Option<PlanetSighting>,
}

/// Termination report. Mission success is the caller's conjunction of
/// reaching the end position with both goal flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoalReport {
    pub is_game_over: bool,
    pub is_map_covered: bool,
    pub is_resources_met: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvError {
    IllegalAction { action: Action },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvEvent {
    MeteorStruck { pos: Pos, damage: u32 },
    RadiationExposure { pos: Pos, damage: u32 },
    NebulaSpawned { pos: Pos },
    Collected { resource: Resource, amount: u32 },
    Docked { fuel_after: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentEvent {
    TargetChanged { reason: TargetReason, target: Pos },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetReason {
    Refuel,
    Resource(Resource),
    Explore,
    Endpoint,
    Fallback,
}

/// A scored destination considered during target selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    pub score: f32,
    pub pos: Pos,
    pub reason: TargetReason,
}

pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

pub fn neighbors(p: Pos) -> [Pos; 4] {
    [
        Pos { row: p.row - 1, col: p.col },
        Pos { row: p.row, col: p.col + 1 },
        Pos { row: p.row + 1, col: p.col },
        Pos { row: p.row, col: p.col - 1 },
    ]
}

pub fn step(p: Pos, direction: Direction) -> Pos {
    match direction {
        Direction::Up => Pos { row: p.row - 1, col: p.col },
        Direction::Down => Pos { row: p.row + 1, col: p.col },
        Direction::Left => Pos { row: p.row, col: p.col - 1 },
        Direction::Right => Pos { row: p.row, col: p.col + 1 },
    }
}

/// Direction of a single cardinal step from `from` to `to`, if they are
/// actually adjacent.
pub fn direction_between(from: Pos, to: Pos) -> Option<Direction> {
    match (to.row - from.row, to.col - from.col) {
        (-1, 0) => Some(Direction::Up),
        (1, 0) => Some(Direction::Down),
        (0, -1) => Some(Direction::Left),
        (0, 1) => Some(Direction::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_and_direction_between_are_inverse() {
        let origin = Pos { row: 4, col: 7 };
        for direction in Direction::ALL {
            let next = step(origin, direction);
            assert_eq!(direction_between(origin, next), Some(direction));
            assert_eq!(manhattan(origin, next), 1);
        }
        assert_eq!(direction_between(origin, Pos { row: 6, col: 7 }), None);
        assert_eq!(direction_between(origin, origin), None);
    }

    #[test]
    fn resource_tally_meets_requires_every_counter() {
        let goals = ResourceTally { water: 5, minerals: 3, oxygen: 0 };
        let mut collected = ResourceTally { water: 5, minerals: 2, oxygen: 9 };
        assert!(!collected.meets(&goals));
        collected.add(Resource::Minerals, 1);
        assert!(collected.meets(&goals));
    }
}
