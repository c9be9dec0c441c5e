//! FSM AI systems (perception → transition → movement).

use bevy::prelude::*;

use crate::ai::components::{AgentBrain, AgentTuning, BehaviorState, PatrolRoute, PoliceUnit};
use crate::ai::events::AlertEvent;
use crate::ai::systems::move_for_state;
use crate::ai::transition::{next_state, TransitionEffect};
use crate::components::{Facing, TargetSnapshot};
use crate::heat::AlertStatus;
use crate::perception::{can_see, VisionConfig};
use crate::physics::{PhysicsBackend, PhysicsBridge};
use crate::SimulationConfig;

/// Итог одного тика агента
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTick {
    pub previous: BehaviorState,
    pub visible: bool,
    pub position: Vec3,
    pub effect: Option<TransitionEffect>,
}

/// Один тик агента поверх любого PhysicsBackend
///
/// Perception, transition и movement используют один и тот же sensor sample:
/// если переход случился, движение этого тика уже от нового состояния.
/// Пока цель ни разу не опубликована, агент её не видит.
///
/// `None` = у агента нет physics handle (пропускаем тик, состояние не трогаем).
pub fn tick_agent<B: PhysicsBackend>(
    physics: &mut B,
    body: Entity,
    brain: &mut AgentBrain,
    facing: &mut Facing,
    route: &PatrolRoute,
    tuning: &AgentTuning,
    vision: &VisionConfig,
    target: &TargetSnapshot,
) -> Option<AgentTick> {
    let position = physics.body_position(body)?;

    let visible = target.is_published()
        && can_see(&*physics, body, position, facing, target.position, vision);

    let transition = next_state(
        brain.state,
        visible,
        brain.last_known_target,
        target.position,
        position,
        tuning.search_reach,
    );

    let previous = brain.state;
    brain.state = transition.next;
    brain.last_known_target = transition.memory;

    move_for_state(
        physics,
        body,
        position,
        target.position,
        brain,
        facing,
        route,
        tuning,
    );

    Some(AgentTick {
        previous,
        visible,
        position,
        effect: transition.effect,
    })
}

/// Система: поведение всех полицейских агентов
///
/// Каждый агент независим (нет общей "сети оповещения").
/// Агент в Chase греет heat с chase_rate (на каждого преследующего).
pub fn police_behavior(
    mut physics: PhysicsBridge,
    snapshot: Res<TargetSnapshot>,
    config: Res<SimulationConfig>,
    time: Res<Time<Fixed>>,
    mut alert: ResMut<AlertStatus>,
    mut alert_events: EventWriter<AlertEvent>,
    mut agents: Query<(
        Entity,
        &PoliceUnit,
        &mut AgentBrain,
        &mut Facing,
        &PatrolRoute,
        &AgentTuning,
        &VisionConfig,
    )>,
) {
    let delta = time.delta_secs();

    for (entity, unit, mut brain, mut facing, route, tuning, vision) in agents.iter_mut() {
        let Some(tick) = tick_agent(
            &mut physics,
            entity,
            &mut brain,
            &mut facing,
            route,
            tuning,
            vision,
            &snapshot,
        ) else {
            crate::log(&format!(
                "AI: unit {} ({:?}) has no physics body, skipped",
                unit.id, entity
            ));
            continue;
        };

        if let Some(effect) = tick.effect {
            crate::log_info(&format!(
                "AI: unit {} {} → {} at {:?} (target {:?})",
                unit.id, tick.previous, brain.state, tick.position, snapshot.position
            ));

            alert_events.write(match effect {
                TransitionEffect::TargetSpotted => AlertEvent::TargetSpotted {
                    agent: entity,
                    unit: unit.id,
                    target_position: snapshot.position,
                },
                TransitionEffect::TargetLost => AlertEvent::TargetLost {
                    agent: entity,
                    unit: unit.id,
                    last_known: brain.last_known_target,
                },
                TransitionEffect::SearchAbandoned => AlertEvent::SearchAbandoned {
                    agent: entity,
                    unit: unit.id,
                },
            });
        }

        if brain.state == BehaviorState::Chase {
            alert.increase_heat(config.heat.chase_rate * delta);
        }
    }
}

/// Система: spotted = хотя бы один агент сейчас в Chase
///
/// Пересчитывается каждый тик после police_behavior: флаг гаснет ровно
/// тогда, когда последний преследующий теряет цель.
pub fn update_alert_status(agents: Query<&AgentBrain, With<PoliceUnit>>, mut alert: ResMut<AlertStatus>) {
    let spotted = agents
        .iter()
        .any(|brain| brain.state == BehaviorState::Chase);

    if spotted != alert.is_spotted() {
        crate::log_info(&format!(
            "Alert: spotted {} → {} (heat {:.1})",
            alert.is_spotted(),
            spotted,
            alert.heat()
        ));
        alert.set_spotted(spotted);
    }
}
