//! AI movement: BehaviorState → velocity агента.

use bevy::prelude::*;

use crate::ai::components::{planar_distance, AgentBrain, AgentTuning, BehaviorState, PatrolRoute};
use crate::components::Facing;
use crate::movement::{drive_toward, hold_position};
use crate::physics::PhysicsBackend;

/// Движение агента для УЖЕ обновлённого состояния этого тика
///
/// - Patrol: к текущему waypoint'у, по достижении: следующий (wrap)
/// - Chase: к live позиции цели на chase speed
/// - Search: к last known position на search speed
///
/// Пустой маршрут / нет памяти → стоим. `false` = нет physics handle.
pub fn move_for_state<B: PhysicsBackend>(
    physics: &mut B,
    body: Entity,
    position: Vec3,
    target: Vec3,
    brain: &mut AgentBrain,
    facing: &mut Facing,
    route: &PatrolRoute,
    tuning: &AgentTuning,
) -> bool {
    let goal = match brain.state {
        BehaviorState::Patrol => patrol_goal(position, brain, route, tuning.waypoint_reach)
            .map(|waypoint| (waypoint, tuning.patrol_speed)),
        BehaviorState::Chase => Some((target, tuning.chase_speed)),
        BehaviorState::Search => brain
            .last_known_target
            .map(|last_known| (last_known, tuning.search_speed())),
    };

    brain.target_point = goal.map(|(point, _)| point);

    match goal {
        Some((point, speed)) => drive_toward(physics, body, point, speed, facing),
        None => hold_position(physics, body),
    }
}

/// Текущий waypoint патруля, с переходом на следующий если текущий достигнут
fn patrol_goal(
    position: Vec3,
    brain: &mut AgentBrain,
    route: &PatrolRoute,
    reach: f32,
) -> Option<Vec3> {
    let waypoint = route.waypoint(brain.patrol_index)?;

    if planar_distance(position, waypoint) < reach {
        brain.patrol_index = route.next_index(brain.patrol_index);
        return route.waypoint(brain.patrol_index);
    }

    Some(waypoint)
}
