//! Mission and planner tuning knobs with the stock mission as the default.

use serde::{Deserialize, Serialize};

use crate::types::{Pos, ResourceTally};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Side length of the square grid.
    pub grid_size: usize,
    pub num_planets: usize,
    pub num_meteors: usize,
    pub num_stations: usize,
    pub num_nebulas: usize,
    pub num_radiation_zones: usize,
    /// Explored-cell percentage (0-100) that satisfies the mapping goal.
    pub mapping_goal_percentage: f32,
    pub resource_goals: ResourceTally,
    /// Fixed start/end positions; random empty cells when absent.
    pub start: Option<Pos>,
    pub end: Option<Pos>,
    pub station_refuel_amount: u32,
    pub radiation_damage: u32,
    /// Base scan radius before nebula reduction.
    pub sensor_range: u32,
    pub nebula_sensor_reduction: u32,
    /// Chance that any given meteor drifts on a tick. 1.0 matches the
    /// original per-tick random walk; 0.0 freezes hazards for tests.
    pub meteor_move_probability: f64,
    pub nebula_spawn_probability: f64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            num_planets: 4,
            num_meteors: 5,
            num_stations: 2,
            num_nebulas: 2,
            num_radiation_zones: 2,
            mapping_goal_percentage: 70.0,
            resource_goals: ResourceTally { water: 10, minerals: 15, oxygen: 5 },
            start: None,
            end: None,
            station_refuel_amount: 70,
            radiation_damage: 2,
            sensor_range: 3,
            nebula_sensor_reduction: 1,
            meteor_move_probability: 1.0,
            nebula_spawn_probability: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Fuel buffer the planner refuses to spend below without refueling.
    pub fuel_reserve: u32,
    /// Below this, a refuel candidate enters target selection.
    pub low_fuel_threshold: u32,
    /// Dock opportunistically when standing on a station below this.
    pub dock_below_fuel: u32,
    pub resource_weight: f32,
    pub exploration_weight: f32,
    /// Path cost of stepping onto a remembered nebula cell.
    pub nebula_step_cost: u32,
    /// Added cost for remembered meteor/radiation cells or live dangers.
    pub danger_penalty: u32,
    /// Added cost for re-entering one of the last 10 positions.
    pub revisit_penalty: u32,
    /// Added cost for stepping into a never-sensed cell.
    pub unknown_penalty: u32,
    /// Fuel kept in hand when judging whether a target path is affordable.
    pub path_fuel_margin: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fuel_reserve: 20,
            low_fuel_threshold: 30,
            dock_below_fuel: 90,
            resource_weight: 4.0,
            exploration_weight: 3.0,
            nebula_step_cost: 2,
            danger_penalty: 20,
            revisit_penalty: 3,
            unknown_penalty: 2,
            path_fuel_margin: 5,
        }
    }
}

pub const FUEL_CAPACITY: u32 = 100;
pub const STARTING_HEALTH: u32 = 100;
/// Scan is refused below this much fuel so a move toward a station stays
/// affordable.
pub const SCAN_MIN_FUEL: u32 = 10;
