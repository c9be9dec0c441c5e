//! Perception: stateless vision sensor
//!
//! Цель видна, если одновременно:
//! 1. ближе `view_distance`
//! 2. внутри конуса `half_angle` вокруг facing
//! 3. occlusion луч от глаз до цели ничего не встретил раньше (distance − margin)
//!
//! Между вызовами ничего не хранится: результат зависит только от
//! позиций/ориентации и raycast'а этого тика.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_6;

use crate::components::Facing;
use crate::physics::PhysicsBackend;

/// Параметры зрения агента
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct VisionConfig {
    pub view_distance: f32,
    /// Половина угла конуса (radians)
    pub half_angle: f32,
    /// Высота глаз над центром тела
    pub eye_height: f32,
    /// Допуск occlusion: hit ближе к цели чем margin не считается препятствием
    pub occlusion_margin: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            view_distance: 15.0,
            half_angle: FRAC_PI_6, // 60° конус
            eye_height: 1.0,
            occlusion_margin: 1.0,
        }
    }
}

/// Видит ли observer цель в этот тик
///
/// `observer` исключается из raycast'а (луч стартует внутри своего тела).
pub fn can_see<B: PhysicsBackend>(
    physics: &B,
    observer: Entity,
    observer_position: Vec3,
    facing: &Facing,
    target_position: Vec3,
    config: &VisionConfig,
) -> bool {
    let to_target = target_position - observer_position;
    let distance = to_target.length();

    if distance >= config.view_distance {
        return false;
    }

    // Совпадающие позиции: направления нет → не видим
    let Some(direction) = to_target.try_normalize() else {
        return false;
    };

    if facing.forward().angle_between(direction) >= config.half_angle {
        return false;
    }

    let eye = observer_position + Vec3::Y * config.eye_height;
    let Some(ray_direction) = (target_position - eye).try_normalize() else {
        // Глаза ровно в точке цели, загораживать нечему
        return true;
    };

    match physics.cast_ray(
        eye,
        ray_direction,
        distance + config.occlusion_margin,
        Some(observer),
    ) {
        None => true,
        Some(hit) => hit.distance >= distance - config.occlusion_margin,
    }
}
