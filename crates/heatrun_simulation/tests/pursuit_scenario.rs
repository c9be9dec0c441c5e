//! Pursuit integration test
//!
//! Полный headless App: player locomotion → perception → FSM → heat,
//! шагаем ровно по одному fixed тику через `step_simulation`.
//!
//! Проверяем:
//! - Patrol → Chase за один тик (цель прямо перед агентом)
//! - дальняя цель не замечается
//! - spotted гаснет только когда последний преследующий теряет цель
//! - Search → Patrol очищает память
//! - sprint греет heat, heat не выходит за [0, 100]

use bevy::prelude::*;
use heatrun_simulation::*;

const AGENT_REST_Y: f32 = 1.0; // box 1×2×1 на полу
const PLAYER_REST_Y: f32 = 1.15; // капсула 0.75 + 0.4 на полу

/// Helper: headless App + сценарий
fn create_pursuit_app(scenario: Scenario) -> (App, ScenarioEntities) {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin::headless());

    let spawned = spawn_scenario(app.world_mut(), PhysicsMode::Headless, &scenario)
        .expect("scenario is valid");

    (app, spawned)
}

/// Сценарий без городской геометрии: только пол и заданные агенты
fn open_ground(player: Vec3) -> Scenario {
    Scenario {
        player_spawn: player,
        ..Scenario::empty()
    }
}

fn brain(app: &App, entity: Entity) -> AgentBrain {
    app.world()
        .get::<AgentBrain>(entity)
        .cloned()
        .expect("agent has brain")
}

fn alert(app: &App) -> AlertStatus {
    *app.world().resource::<AlertStatus>()
}

/// События последнего тика
fn alert_events(app: &App) -> Vec<AlertEvent> {
    let events = app.world().resource::<Events<AlertEvent>>();
    let mut cursor = events.get_cursor();
    cursor.read(events).copied().collect()
}

fn add_wall(app: &mut App, wall: StaticBox) {
    app.world_mut()
        .resource_mut::<HeadlessWorld>()
        .obstacles
        .push(wall);
}

fn set_player_position(app: &mut App, player: Entity, position: Vec3) {
    let mut entity = app.world_mut().entity_mut(player);
    if let Some(mut transform) = entity.get_mut::<Transform>() {
        transform.translation = position;
    }
}

/// Test: цель в 5 units прямо по курсу → Chase за один тик
#[test]
fn test_target_ahead_triggers_chase_in_one_tick() {
    // Маршрут к (10,0,-10): агент при spawn смотрит в −Z
    let scenario = open_ground(Vec3::new(10.0, PLAYER_REST_Y, 5.0))
        .with_route("north", vec![Vec3::new(10.0, 0.0, -10.0)])
        .with_agent(1, Vec3::new(10.0, AGENT_REST_Y, 10.0), "north");
    let (mut app, spawned) = create_pursuit_app(scenario);
    let agent = spawned.agent(1).expect("unit 1");

    step_simulation(&mut app);

    let brain = brain(&app, agent);
    assert_eq!(brain.state, BehaviorState::Chase);
    assert!(brain.last_known_target.is_some());
    assert!(alert(&app).is_spotted());
    assert!(alert(&app).heat() > 0.0);

    let events = alert_events(&app);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], AlertEvent::TargetSpotted { unit: 1, .. }));
    assert_eq!(events[0].agent(), agent);
}

/// Test: цель в 15+ units по курсу → остаёмся в Patrol
#[test]
fn test_distant_target_keeps_patrol() {
    let scenario = open_ground(Vec3::new(10.0, PLAYER_REST_Y, -5.0))
        .with_route("north", vec![Vec3::new(10.0, 0.0, -10.0)])
        .with_agent(1, Vec3::new(10.0, AGENT_REST_Y, 10.0), "north");
    let (mut app, spawned) = create_pursuit_app(scenario);
    let agent = spawned.agent(1).expect("unit 1");

    step_simulation(&mut app);

    assert_eq!(brain(&app, agent).state, BehaviorState::Patrol);
    assert!(!alert(&app).is_spotted());
    assert_eq!(alert(&app).heat(), 0.0);
    assert!(alert_events(&app).is_empty());
}

/// Test: стена между агентом и целью блокирует обнаружение
#[test]
fn test_wall_blocks_detection() {
    let scenario = open_ground(Vec3::new(10.0, PLAYER_REST_Y, 5.0))
        .with_obstacle(StaticBox::new(
            Vec3::new(10.0, 1.5, 7.5),
            Vec3::new(3.0, 1.5, 0.2),
        ))
        .with_route("north", vec![Vec3::new(10.0, 0.0, -10.0)])
        .with_agent(1, Vec3::new(10.0, AGENT_REST_Y, 10.0), "north");
    let (mut app, spawned) = create_pursuit_app(scenario);
    let agent = spawned.agent(1).expect("unit 1");

    step_simulation(&mut app);

    assert_eq!(brain(&app, agent).state, BehaviorState::Patrol);
    assert!(!alert(&app).is_spotted());
}

/// Test: два преследующих, один теряет цель → spotted остаётся true
#[test]
fn test_spotted_tracks_last_chasing_agent() {
    // Игрок в центре, A смотрит на него с +Z, B, с +X
    let scenario = open_ground(Vec3::new(0.0, PLAYER_REST_Y, 0.0))
        .with_route("south", vec![Vec3::new(0.0, 0.0, -10.0)])
        .with_route("west", vec![Vec3::new(-10.0, 0.0, 0.0)])
        .with_agent(1, Vec3::new(0.0, AGENT_REST_Y, 8.0), "south")
        .with_agent(2, Vec3::new(8.0, AGENT_REST_Y, 0.0), "west");
    let (mut app, spawned) = create_pursuit_app(scenario);
    let a = spawned.agent(1).expect("unit 1");
    let b = spawned.agent(2).expect("unit 2");

    step_simulation(&mut app);
    assert_eq!(brain(&app, a).state, BehaviorState::Chase);
    assert_eq!(brain(&app, b).state, BehaviorState::Chase);
    assert!(alert(&app).is_spotted());

    // Стена между A и игроком
    add_wall(
        &mut app,
        StaticBox::new(Vec3::new(0.0, 1.5, 4.0), Vec3::new(3.0, 3.0, 0.2)),
    );
    step_simulation(&mut app);

    assert_eq!(brain(&app, a).state, BehaviorState::Search);
    assert_eq!(brain(&app, b).state, BehaviorState::Chase);
    assert!(alert(&app).is_spotted(), "B still sees the target");
    assert!(alert_events(&app)
        .iter()
        .any(|event| matches!(event, AlertEvent::TargetLost { unit: 1, .. })));

    // Стена между B и игроком
    add_wall(
        &mut app,
        StaticBox::new(Vec3::new(4.0, 1.5, 0.0), Vec3::new(0.2, 3.0, 3.0)),
    );
    step_simulation(&mut app);

    assert_eq!(brain(&app, b).state, BehaviorState::Search);
    assert!(!alert(&app).is_spotted());
}

/// Test: Search доходит до last known position → Patrol, память очищена
#[test]
fn test_search_gives_up_and_forgets() {
    let scenario = open_ground(Vec3::new(0.0, PLAYER_REST_Y, 0.0))
        .with_route("south", vec![Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 10.0)])
        .with_agent(1, Vec3::new(0.0, AGENT_REST_Y, 8.0), "south");
    let (mut app, spawned) = create_pursuit_app(scenario);
    let agent = spawned.agent(1).expect("unit 1");

    step_simulation(&mut app);
    assert_eq!(brain(&app, agent).state, BehaviorState::Chase);

    // Игрок "исчезает" далеко за пределы зрения
    set_player_position(&mut app, spawned.player, Vec3::new(0.0, PLAYER_REST_Y, -80.0));
    step_simulation(&mut app);

    let searching = brain(&app, agent);
    assert_eq!(searching.state, BehaviorState::Search);
    let memory = searching.last_known_target.expect("search keeps memory");
    assert!(memory.z.abs() < 0.5, "memory is where the target was seen: {:?}", memory);

    let mut abandoned = false;
    for _ in 0..300 {
        step_simulation(&mut app);
        if alert_events(&app)
            .iter()
            .any(|event| matches!(event, AlertEvent::SearchAbandoned { unit: 1, .. }))
        {
            abandoned = true;
            break;
        }
    }

    assert!(abandoned, "agent must reach last known position");
    let patrolling = brain(&app, agent);
    assert_eq!(patrolling.state, BehaviorState::Patrol);
    assert!(patrolling.last_known_target.is_none());
    assert!(!alert(&app).is_spotted());
}

/// Test: пока цель не опубликована, никто ничего не видит
///
/// У игрока нет physics handle → snapshot остаётся дефолтным (0,0,0),
/// а эта точка прямо перед агентом и в пределах дальности.
#[test]
fn test_nothing_seen_before_first_publish() {
    let scenario = open_ground(Vec3::new(30.0, PLAYER_REST_Y, 30.0))
        .with_route("north", vec![Vec3::new(0.0, 0.0, -10.0)])
        .with_agent(1, Vec3::new(0.0, AGENT_REST_Y, 10.0), "north");
    let (mut app, spawned) = create_pursuit_app(scenario);
    let agent = spawned.agent(1).expect("unit 1");

    app.world_mut()
        .entity_mut(spawned.player)
        .remove::<bevy_rapier3d::prelude::Velocity>();

    step_simulation(&mut app);

    assert_eq!(app.world().resource::<SimulationTick>().0, 1);
    assert!(!app.world().resource::<TargetSnapshot>().is_published());
    assert_eq!(brain(&app, agent).state, BehaviorState::Patrol);
    assert!(alert_events(&app).is_empty());
    assert!(!alert(&app).is_spotted());
}

/// Test: sprint с движением греет heat на sprint_rate/sec
#[test]
fn test_sprint_raises_heat() {
    let (mut app, spawned) = create_pursuit_app(open_ground(Vec3::new(0.0, PLAYER_REST_Y, 0.0)));

    *app.world_mut().resource_mut::<InputIntent>() = InputIntent {
        forward: true,
        sprint: true,
        ..default()
    };

    for _ in 0..60 {
        step_simulation(&mut app);
    }

    let heat = alert(&app).heat();
    assert!((heat - 1.0).abs() < 1e-3, "heat after 1s sprint = {}", heat);

    // Игрок двигался вперёд (−Z)
    let position = app
        .world()
        .get::<Transform>(spawned.player)
        .map(|t| t.translation)
        .expect("player has transform");
    assert!(position.z < -1.0, "player moved forward: {:?}", position);

    // Snapshot опубликован на последнем тике
    let snapshot = *app.world().resource::<TargetSnapshot>();
    assert_eq!(snapshot.tick, 60);
    assert_eq!(snapshot.body, Some(spawned.player));
}

fn player_vertical_velocity(app: &App, player: Entity) -> f32 {
    app.world()
        .get::<bevy_rapier3d::prelude::Velocity>(player)
        .map(|v| v.linvel.y)
        .expect("player has velocity")
}

/// Test: прыжок с земли, удержанная кнопка не даёт второго impulse
#[test]
fn test_player_jumps_from_ground() {
    let (mut app, spawned) = create_pursuit_app(open_ground(Vec3::new(0.0, PLAYER_REST_Y, 0.0)));
    let config = LocomotionConfig::default();

    app.world_mut().resource_mut::<InputIntent>().jump = true;
    step_simulation(&mut app);

    let y = app
        .world()
        .get::<Transform>(spawned.player)
        .map(|t| t.translation.y)
        .expect("player has transform");
    assert!(y > PLAYER_REST_Y, "player left the ground: y = {}", y);

    let mut vy = player_vertical_velocity(&app, spawned.player);
    let expected = config.jump_force - 9.81 * FIXED_TIMESTEP;
    assert!((vy - expected).abs() < 1e-3, "vy after jump = {}", vy);

    // Jump всё ещё зажат, probe пару тиков достаёт пол: скорость только падает
    for _ in 0..6 {
        step_simulation(&mut app);
        let vy_next = player_vertical_velocity(&app, spawned.player);
        assert!(vy_next < vy, "second impulse mid-air: {} -> {}", vy, vy_next);
        vy = vy_next;
    }
}

/// Test: city block со scripted input'ом, heat в [0, 100] на каждом тике
#[test]
fn test_city_block_keeps_heat_bounded() {
    let (mut app, _) = create_pursuit_app(Scenario::city_block());
    app.insert_resource(ScriptedInput::new(30));

    for _ in 0..1200 {
        step_simulation(&mut app);
        let heat = alert(&app).heat();
        assert!((HEAT_MIN..=HEAT_MAX).contains(&heat), "heat = {}", heat);
    }
}
