//! Scenario: геометрия города, spawn игрока и полиции
//!
//! Всё проверяется до спавна (`validate`): пустой маршрут, ссылка на
//! несуществующий маршрут, повторный id агента. Per-tick код уже не
//! проверяет эти вещи.

use bevy::prelude::*;
use std::collections::{BTreeMap, HashSet};

use crate::ai::{PatrolRoute, PoliceUnit};
use crate::components::{Facing, Player};
use crate::error::ScenarioError;
use crate::physics::spawn::{spawn_dynamic_body, spawn_static_box};
use crate::physics::{BodySpec, HeadlessWorld, PhysicsMode, StaticBox};
use crate::SimulationConfig;

/// Spawn одного полицейского
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpawn {
    pub id: u32,
    pub position: Vec3,
    /// Имя маршрута из `Scenario::routes`
    pub route: String,
}

/// Описание сценария
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub geometry: Vec<StaticBox>,
    pub player_spawn: Vec3,
    /// BTreeMap: порядок обхода стабилен между запусками
    pub routes: BTreeMap<String, Vec<Vec3>>,
    pub agents: Vec<AgentSpawn>,
}

/// Что заспавнилось
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioEntities {
    pub player: Entity,
    /// (PoliceUnit id, entity) в порядке описания
    pub agents: Vec<(u32, Entity)>,
}

impl ScenarioEntities {
    pub fn agent(&self, id: u32) -> Option<Entity> {
        self.agents
            .iter()
            .find(|(agent_id, _)| *agent_id == id)
            .map(|(_, entity)| *entity)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::city_block()
    }
}

impl Scenario {
    /// Пустой сценарий: только пол
    pub fn empty() -> Self {
        Self {
            geometry: vec![ground()],
            player_spawn: Vec3::new(0.0, 5.0, 0.0),
            routes: BTreeMap::new(),
            agents: Vec::new(),
        }
    }

    /// Квартал: пол 200×200, два здания по бокам, два препятствия,
    /// два патрульных на общем квадратном маршруте
    pub fn city_block() -> Self {
        let mut routes = BTreeMap::new();
        routes.insert(
            "block".to_string(),
            vec![
                Vec3::new(10.0, 0.0, 10.0),
                Vec3::new(-10.0, 0.0, 10.0),
                Vec3::new(-10.0, 0.0, -10.0),
                Vec3::new(10.0, 0.0, -10.0),
            ],
        );

        Self {
            geometry: vec![
                ground(),
                // Здания
                StaticBox::new(Vec3::new(-25.0, 20.0, 0.0), Vec3::new(10.0, 20.0, 100.0)),
                StaticBox::new(Vec3::new(35.0, 20.0, 0.0), Vec3::new(10.0, 20.0, 100.0)),
                // Препятствия
                StaticBox::new(Vec3::new(0.0, 1.0, 15.0), Vec3::new(1.0, 1.0, 1.0)),
                StaticBox::new(Vec3::new(-5.0, 1.5, -10.0), Vec3::new(2.0, 1.5, 0.5)),
            ],
            player_spawn: Vec3::new(0.0, 5.0, 0.0),
            routes,
            agents: vec![
                AgentSpawn {
                    id: 1,
                    position: Vec3::new(10.0, 5.0, 10.0),
                    route: "block".to_string(),
                },
                AgentSpawn {
                    id: 2,
                    position: Vec3::new(-10.0, 5.0, -10.0),
                    route: "block".to_string(),
                },
            ],
        }
    }

    pub fn with_route(mut self, name: impl Into<String>, waypoints: Vec<Vec3>) -> Self {
        self.routes.insert(name.into(), waypoints);
        self
    }

    pub fn with_agent(mut self, id: u32, position: Vec3, route: impl Into<String>) -> Self {
        self.agents.push(AgentSpawn {
            id,
            position,
            route: route.into(),
        });
        self
    }

    pub fn with_obstacle(mut self, obstacle: StaticBox) -> Self {
        self.geometry.push(obstacle);
        self
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        for (name, waypoints) in &self.routes {
            if waypoints.is_empty() {
                return Err(ScenarioError::EmptyRoute(name.clone()));
            }
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !seen.insert(agent.id) {
                return Err(ScenarioError::DuplicateAgent(agent.id));
            }
            if !self.routes.contains_key(&agent.route) {
                return Err(ScenarioError::UnknownRoute {
                    agent: agent.id,
                    route: agent.route.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Пол: верх на y = 0
fn ground() -> StaticBox {
    StaticBox::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(100.0, 1.0, 100.0))
}

/// Spawn сценария в мир
///
/// Tuning берётся из `SimulationConfig` resource (или дефолтный).
/// Ошибка возвращается ДО любого spawn'а.
pub fn spawn_scenario(
    world: &mut World,
    mode: PhysicsMode,
    scenario: &Scenario,
) -> Result<ScenarioEntities, ScenarioError> {
    let config = world
        .get_resource::<SimulationConfig>()
        .copied()
        .unwrap_or_default();

    config.validate().inspect_err(|err| {
        crate::log_error(&format!("Scenario: rejected tuning: {}", err));
    })?;
    scenario.validate().inspect_err(|err| {
        crate::log_error(&format!("Scenario: rejected layout: {}", err));
    })?;

    if mode == PhysicsMode::Headless && !world.contains_resource::<HeadlessWorld>() {
        world.insert_resource(HeadlessWorld::default());
    }

    for block in &scenario.geometry {
        spawn_static_box(world, mode, *block);
    }

    let player = spawn_dynamic_body(
        world,
        mode,
        scenario.player_spawn,
        &BodySpec::player(config.locomotion.mass),
    );
    world
        .entity_mut(player)
        .insert((Name::new("Player"), Player, config.locomotion));

    // Один Arc на маршрут: агенты делят waypoints
    let routes: BTreeMap<&str, PatrolRoute> = scenario
        .routes
        .iter()
        .map(|(name, waypoints)| (name.as_str(), PatrolRoute::new(waypoints.clone())))
        .collect();

    let mut agents = Vec::with_capacity(scenario.agents.len());
    for spawn in &scenario.agents {
        let route = routes
            .get(spawn.route.as_str())
            .cloned()
            .unwrap_or_default();

        // Сразу смотрим на первый waypoint
        let facing = route
            .waypoint(0)
            .and_then(|waypoint| Facing::toward(waypoint - spawn.position))
            .unwrap_or_default();

        let entity = spawn_dynamic_body(
            world,
            mode,
            spawn.position,
            &BodySpec::police_unit(config.agent.mass),
        );
        world.entity_mut(entity).insert((
            Name::new(format!("Police {}", spawn.id)),
            PoliceUnit { id: spawn.id },
            route,
            facing,
            config.agent,
            config.vision,
        ));

        agents.push((spawn.id, entity));
    }

    crate::log_info(&format!(
        "Scenario: spawned player + {} police units ({:?} physics, {} static blocks)",
        agents.len(),
        mode,
        scenario.geometry.len()
    ));

    Ok(ScenarioEntities { player, agents })
}
