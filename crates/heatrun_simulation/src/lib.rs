//! Heat Run Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: игрок убегает, полиция патрулирует,
//! замечает и преследует его по "зрению".
//!
//! Порядок тика (FixedUpdate, 60Hz, строго последовательно):
//! 1. Input: счётчик тика, scripted input (если есть)
//! 2. Player: locomotion игрока + публикация TargetSnapshot
//! 3. Agents: perception → FSM → movement, агрегированный spotted
//! 4. Physics: headless интеграция
//!
//! Rapier step идёт в том же FixedUpdate, но ДО Input: impulse/velocity
//! тика N применяются step'ом тика N+1, а perception тика N видит уже
//! созданные коллайдеры (в том числе на самом первом тике).

use bevy::app::{FixedMain, MainScheduleOrder, PluginsState};
use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use bevy_rapier3d::plugin::{NoUserData, PhysicsSet, RapierPhysicsPlugin, TimestepMode};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod components;
pub mod config;
pub mod error;
pub mod heat;
pub mod input;
pub mod logger;
pub mod movement;
pub mod perception;
pub mod physics;
pub mod scenario;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AgentBrain, AgentTuning, AlertEvent, BehaviorState, PatrolRoute, PoliceUnit};
pub use components::*;
pub use config::{SimulationConfig, FIXED_TIMESTEP};
pub use error::{ConfigError, ScenarioError};
pub use heat::{AlertStatus, HeatConfig, HEAT_MAX, HEAT_MIN};
pub use input::{CameraHeading, InputIntent, ScriptedInput};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use movement::LocomotionConfig;
pub use perception::{can_see, VisionConfig};
pub use physics::{HeadlessWorld, PhysicsMode, StaticBox};
pub use scenario::{spawn_scenario, Scenario, ScenarioEntities};

/// Фазы тика симуляции (FixedUpdate, chained)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Player,
    Agents,
    Physics,
}

/// Номер текущего fixed тика (первый тик = 1)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Resource)]
pub struct SimulationTick(pub u64);

fn advance_tick(mut tick: ResMut<SimulationTick>) {
    tick.0 += 1;
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationPlugin {
    pub mode: PhysicsMode,
}

impl SimulationPlugin {
    pub fn headless() -> Self {
        Self {
            mode: PhysicsMode::Headless,
        }
    }

    pub fn rapier() -> Self {
        Self {
            mode: PhysicsMode::Rapier,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<SimulationConfig>()
            .init_resource::<SimulationTick>()
            .init_resource::<InputIntent>()
            .init_resource::<CameraHeading>()
            .init_resource::<AlertStatus>()
            .init_resource::<TargetSnapshot>()
            .register_type::<SimulationConfig>()
            .register_type::<Facing>()
            .register_type::<TargetSnapshot>()
            .register_type::<AlertStatus>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Input,
                    SimulationSet::Player,
                    SimulationSet::Agents,
                    SimulationSet::Physics,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    advance_tick,
                    input::drive_scripted_input.run_if(resource_exists::<ScriptedInput>),
                )
                    .chain()
                    .in_set(SimulationSet::Input),
            )
            .add_systems(
                FixedUpdate,
                movement::player_locomotion.in_set(SimulationSet::Player),
            )
            .add_plugins(AIPlugin);

        if !app.world().contains_resource::<DeterministicRng>() {
            // Детерминистичный RNG (seed по умолчанию)
            app.insert_resource(DeterministicRng::new(42));
        }

        match self.mode {
            PhysicsMode::Headless => {
                app.init_resource::<HeadlessWorld>().add_systems(
                    FixedUpdate,
                    physics::integrate_headless_bodies.in_set(SimulationSet::Physics),
                );
            }
            PhysicsMode::Rapier => {
                if !app.is_plugin_added::<TransformPlugin>() {
                    app.add_plugins(TransformPlugin);
                }
                // Ровно один step длиной FIXED_TIMESTEP на fixed тик
                // (дефолтный Variable режим берёт dt из generic Time)
                app.insert_resource(TimestepMode::Fixed {
                    dt: FIXED_TIMESTEP,
                    substeps: 1,
                })
                .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
                .configure_sets(
                    FixedUpdate,
                    (
                        PhysicsSet::SyncBackend,
                        PhysicsSet::StepSimulation,
                        PhysicsSet::Writeback,
                    )
                        .before(SimulationSet::Input),
                );
            }
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Marker: startup schedules уже прогнаны `step_simulation`
#[derive(Resource)]
struct StartupSchedulesRan;

/// Создаёт minimal Bevy App для headless симуляции
///
/// Только runtime: SimulationPlugin и сценарий добавляет вызывающий.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Один fixed тик, не зависящий от wall clock
///
/// `app.update()` гоняет FixedMain по реальному времени (0..N раз за кадр).
/// Для тестов и headless прогонов шагаем вручную: ровно один FixedMain.
///
/// Первый вызов ещё и прогоняет PreStartup/Startup/PostStartup (там rapier
/// создаёт свой context). Дальше App не смешивать с `app.update()`:
/// Main прогнал бы startup второй раз.
pub fn step_simulation(app: &mut App) {
    if app.plugins_state() != PluginsState::Cleaned {
        app.finish();
        app.cleanup();
    }

    let world = app.world_mut();

    if !world.contains_resource::<StartupSchedulesRan>() {
        let startup_labels = world
            .get_resource::<MainScheduleOrder>()
            .map(|order| order.startup_labels.clone())
            .unwrap_or_default();
        for label in startup_labels {
            // Schedule может не существовать (нет ни одной startup системы)
            let _ = world.try_run_schedule(label);
        }
        world.insert_resource(StartupSchedulesRan);
    }

    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f64(FIXED_TIMESTEP as f64));

    // Внутри fixed loop generic Time = fixed (как в run_fixed_main_schedule)
    let fixed = world.resource::<Time<Fixed>>().as_generic();
    if let Some(mut time) = world.get_resource_mut::<Time>() {
        *time = fixed;
    }

    world.run_schedule(FixedMain);

    // Double buffer: после шага читаются события ровно этого тика
    if let Some(mut events) = world.get_resource_mut::<Events<AlertEvent>>() {
        events.update();
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
