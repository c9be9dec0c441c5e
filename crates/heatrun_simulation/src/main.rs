//! Headless симуляция Heat Run
//!
//! Гоняет city block сценарий со scripted input'ом игрока и печатает
//! heat / spotted / состояния полиции.

use anyhow::Context;
use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

use heatrun_simulation::{
    create_headless_app, log_info, set_log_level, spawn_scenario, step_simulation, AgentBrain,
    AlertEvent, AlertStatus, LogLevel, PhysicsMode, PoliceUnit, Scenario, ScriptedInput, SimulationConfig,
    SimulationPlugin,
};

/// Headless police pursuit simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed для scripted input
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Сколько fixed тиков (60 в секунду) прогнать
    #[arg(short, long, default_value_t = 1800)]
    ticks: u64,

    /// JSON с переопределением tuning'а
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Печатать статус каждые N тиков
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Минимальный уровень логов (debug/info/warning/error)
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let mut app = create_headless_app(args.seed);
    set_log_level(args.log_level);

    app.insert_resource(config)
        .insert_resource(ScriptedInput::default())
        .add_plugins(SimulationPlugin::headless());

    spawn_scenario(app.world_mut(), PhysicsMode::Headless, &Scenario::city_block())
        .context("spawning city block scenario")?;

    log_info(&format!(
        "Starting Heat Run headless simulation (seed: {}, ticks: {})",
        args.seed, args.ticks
    ));

    let report_every = args.report_every.max(1);
    for tick in 1..=args.ticks {
        step_simulation(&mut app);

        for line in alert_lines(app.world(), tick) {
            println!("{}", line);
        }

        if tick % report_every == 0 {
            println!("{}", status_line(app.world_mut(), tick));
        }
    }

    println!("Simulation complete: {}", status_line(app.world_mut(), args.ticks));
    Ok(())
}

/// Переходы полиции за последний тик
fn alert_lines(world: &World, tick: u64) -> Vec<String> {
    let events = world.resource::<Events<AlertEvent>>();
    let mut cursor = events.get_cursor();

    cursor
        .read(events)
        .map(|event| {
            let what = match event {
                AlertEvent::TargetSpotted { .. } => "spotted the runner",
                AlertEvent::TargetLost { .. } => "lost sight, searching",
                AlertEvent::SearchAbandoned { .. } => "gave up the search",
            };
            format!("Tick {}: unit #{} {}", tick, event.unit(), what)
        })
        .collect()
}

fn status_line(world: &mut World, tick: u64) -> String {
    let alert = *world.resource::<AlertStatus>();

    let mut units: Vec<(u32, String)> = world
        .query::<(&PoliceUnit, &AgentBrain)>()
        .iter(world)
        .map(|(unit, brain)| (unit.id, brain.state.label().to_string()))
        .collect();
    units.sort_by_key(|(id, _)| *id);

    let units = units
        .iter()
        .map(|(id, label)| format!("#{id} {label}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Tick {}: heat {:.1}, spotted {}, police [{}]",
        tick,
        alert.heat(),
        alert.is_spotted(),
        units
    )
}
