//! Player locomotion system

use bevy::prelude::*;

use crate::components::{Facing, Player, TargetSnapshot};
use crate::heat::AlertStatus;
use crate::input::{CameraHeading, InputIntent};
use crate::movement::{step_locomotion, LocomotionConfig};
use crate::physics::{PhysicsBackend, PhysicsBridge};
use crate::{SimulationConfig, SimulationTick};

/// Система: InputIntent → impulse игрока, затем публикация TargetSnapshot
///
/// Запускается ДО police_behavior: агенты этого тика видят уже
/// опубликованное состояние. Sprint с movement intent'ом греет heat.
pub fn player_locomotion(
    mut physics: PhysicsBridge,
    intent: Res<InputIntent>,
    heading: Res<CameraHeading>,
    config: Res<SimulationConfig>,
    tick: Res<SimulationTick>,
    time: Res<Time<Fixed>>,
    mut alert: ResMut<AlertStatus>,
    mut snapshot: ResMut<TargetSnapshot>,
    mut players: Query<(Entity, &LocomotionConfig, &mut Facing), With<Player>>,
) {
    let delta = time.delta_secs();

    for (entity, locomotion, mut facing) in players.iter_mut() {
        let Some(step) = step_locomotion(
            &mut physics,
            entity,
            &intent,
            heading.yaw,
            &mut facing,
            locomotion,
            delta,
        ) else {
            crate::log(&format!("Locomotion: {:?} has no physics body, skipped", entity));
            continue;
        };

        if step.moving && intent.sprint {
            alert.increase_heat(config.heat.sprint_rate * delta);
        }

        if step.jumped {
            crate::log(&format!("Locomotion: {:?} jumped", entity));
        }

        let (Some(position), Some(velocity)) = (
            physics.body_position(entity),
            physics.body_linear_velocity(entity),
        ) else {
            continue;
        };
        snapshot.publish(entity, position, velocity, tick.0);
    }
}
