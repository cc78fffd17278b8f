use anyhow::{Context, Result};
use clap::Parser;
use probe_core::config::{MissionConfig, PlannerConfig};
use probe_core::{Action, ProbeAgent, SpaceEnv, TickSnapshot};
use std::fs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for world generation and hazard dynamics
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Seed for the agent's tie-breaking randomness
    #[arg(long, default_value_t = 7)]
    agent_seed: u64,

    /// Stop the mission after this many ticks even if it has not ended
    #[arg(long, default_value_t = 500)]
    max_ticks: u64,

    /// Path to a mission config JSON file; defaults apply when omitted
    #[arg(long)]
    config: Option<String>,

    /// Print every action and event as the mission runs
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: Option<&str>) -> Result<MissionConfig> {
    match path {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path}"))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Failed to deserialize mission config: {path}"))
        }
        None => Ok(MissionConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let mut env = SpaceEnv::new(args.seed, config);
    let mut agent = ProbeAgent::new(
        args.agent_seed,
        env.config().grid_size,
        env.end_pos(),
        env.config().resource_goals,
        env.config().mapping_goal_percentage,
        PlannerConfig::default(),
    );
    let mut probe = env.spawn_probe();

    let mut env_events_seen = 0;
    let mut agent_events_seen = 0;
    let mut final_report = env.goal_report(&probe);

    for tick in 0..args.max_ticks {
        let snapshot = TickSnapshot {
            pos: probe.pos,
            fuel: probe.fuel,
            health: probe.health,
            collected: probe.collected,
            dangers: env.danger_positions(),
            stations: env.station_positions(),
        };
        let legal = env.legal_actions(&probe);
        let action = agent.choose_action(&snapshot, &legal);
        let percepts = env
            .do_action(&mut probe, action)
            .map_err(|e| anyhow::anyhow!("Tick {tick}: {e:?}"))?;
        agent.observe(&percepts);
        env.update_env(&mut probe);

        if args.verbose {
            print_tick(tick, action, &probe);
            for event in &env.log()[env_events_seen..] {
                println!("    env:   {event:?}");
            }
            for event in &agent.log()[agent_events_seen..] {
                println!("    agent: {event:?}");
            }
        }
        env_events_seen = env.log().len();
        agent_events_seen = agent.log().len();

        final_report = env.goal_report(&probe);
        if final_report.is_game_over {
            break;
        }
    }

    println!("Mission over after {} ticks.", env.current_tick());
    println!("Position: ({}, {})  Fuel: {}  Health: {}", probe.pos.row, probe.pos.col, probe.fuel, probe.health);
    println!(
        "Collected: water {} / minerals {} / oxygen {}",
        probe.collected.water, probe.collected.minerals, probe.collected.oxygen
    );
    println!("Coverage: {:.1}%  Mapped (agent): {:.1}%", probe.covered_percentage, agent.mapped_percentage());
    println!("Game over: {}", final_report.is_game_over);
    println!("Map covered: {}", final_report.is_map_covered);
    println!("Resources met: {}", final_report.is_resources_met);
    println!(
        "Mission success: {}",
        final_report.is_game_over
            && final_report.is_map_covered
            && final_report.is_resources_met
            && probe.pos == env.end_pos()
    );
    println!("Snapshot hash: {}", env.snapshot_hash(&probe));

    Ok(())
}

fn print_tick(tick: u64, action: Action, probe: &probe_core::ProbeState) {
    println!(
        "[{tick:>4}] {action:?} -> pos ({}, {}) fuel {} health {}",
        probe.pos.row, probe.pos.col, probe.fuel, probe.health
    );
}
