//! Locomotion controller (игрок + агенты)
//!
//! Игрок: discrete intent + yaw камеры → impulse (soft speed cap),
//! drag когда intent'а нет, прыжок только с земли.
//! Агенты: direct-to-target heading → linear velocity (y сохраняем).
//!
//! Всё считается через `PhysicsBackend`, поэтому одинаково работает
//! с rapier, headless и mock backend'ом.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{wrap_angle, yaw_from_direction, Facing};
use crate::input::InputIntent;
use crate::physics::PhysicsBackend;

/// Выше этой вертикальной скорости тело уже в прыжке (m/s)
///
/// Ground probe ещё достаёт до земли пару тиков после отрыва,
/// без этой проверки удержанный jump даёт второй impulse.
pub const JUMP_RISE_EPSILON: f32 = 0.1;

/// Tuning движения игрока
///
/// Диапазоны (проверяются в `SimulationConfig::validate`):
/// walk 1..20, sprint 5..30, acceleration 1..100, drag 0..50,
/// jump 0..50, rotation 0..50.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Speed cap без sprint (m/s)
    pub walk_speed: f32,
    /// Speed cap со sprint (m/s)
    pub sprint_speed: f32,
    /// m/s², умножается на mass × dt → impulse
    pub acceleration: f32,
    /// 1/s, торможение без intent'а
    pub drag: f32,
    /// Вертикальная скорость прыжка (impulse = jump_force × mass)
    pub jump_force: f32,
    /// 1/s, доля оставшегося угла за секунду
    pub rotation_speed: f32,
    /// Направление короче этого = нет intent'а
    pub movement_epsilon: f32,
    /// Длина ground probe луча вниз от основания тела
    pub ground_probe_length: f32,
    /// От центра тела до основания (капсула 0.75 + 0.4)
    pub foot_offset: f32,
    /// Масса тела при spawn (kg)
    pub mass: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            sprint_speed: 9.0, // Медленнее, "тяжелее" персонаж
            acceleration: 15.0,
            drag: 8.0,
            jump_force: 5.0,
            rotation_speed: 8.0,
            movement_epsilon: 0.1,
            ground_probe_length: 0.2,
            foot_offset: 1.15,
            mass: 1.2,
        }
    }
}

/// Результат одного шага player locomotion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionStep {
    /// Суммарный impulse, отправленный в backend (движение/drag + прыжок)
    pub impulse: Vec3,
    /// Был ли movement intent (для sprint heat)
    pub moving: bool,
    pub jumped: bool,
}

/// Мировое направление движения из intent'а
///
/// x = right − left, z = backward − forward (вперёд = −Z), normalize,
/// затем поворот вокруг +Y на `heading_yaw`. Нет intent'а → `Vec3::ZERO`.
pub fn movement_direction(intent: &InputIntent, heading_yaw: f32) -> Vec3 {
    let axis = |positive: bool, negative: bool| (positive as i8 - negative as i8) as f32;

    let local = Vec3::new(
        axis(intent.right, intent.left),
        0.0,
        axis(intent.backward, intent.forward),
    )
    .normalize_or_zero();

    Quat::from_rotation_y(heading_yaw) * local
}

/// Поворот yaw к target по короткой дуге
///
/// Разница оборачивается в [-π, π], шаг = diff × rate × dt (не больше diff).
pub fn rotate_toward(current: f32, target: f32, rate: f32, delta: f32) -> f32 {
    let diff = wrap_angle(target - current);
    let t = (rate * delta).clamp(0.0, 1.0);
    wrap_angle(current + diff * t)
}

/// Стоит ли тело на земле: короткий луч вниз от основания
pub fn is_grounded<B: PhysicsBackend>(
    physics: &B,
    body: Entity,
    position: Vec3,
    config: &LocomotionConfig,
) -> bool {
    let origin = position - Vec3::Y * config.foot_offset;
    physics
        .cast_ray(origin, Vec3::NEG_Y, config.ground_probe_length, Some(body))
        .is_some_and(|hit| hit.distance < config.ground_probe_length)
}

/// Один тик player locomotion
///
/// `None` = у тела нет physics handle (пропускаем тик).
pub fn step_locomotion<B: PhysicsBackend>(
    physics: &mut B,
    body: Entity,
    intent: &InputIntent,
    heading_yaw: f32,
    facing: &mut Facing,
    config: &LocomotionConfig,
    delta: f32,
) -> Option<LocomotionStep> {
    let position = physics.body_position(body)?;
    let velocity = physics.body_linear_velocity(body)?;
    let mass = physics.body_mass(body)?;

    let mut step = LocomotionStep::default();
    let direction = movement_direction(intent, heading_yaw);

    if direction.length() > config.movement_epsilon {
        step.moving = true;

        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        let speed_cap = if intent.sprint {
            config.sprint_speed
        } else {
            config.walk_speed
        };

        // Soft cap: выше cap просто не толкаем
        if horizontal.length() < speed_cap {
            step.impulse += direction * config.acceleration * mass * delta;
        }

        if let Some(target_yaw) = yaw_from_direction(direction) {
            facing.yaw = rotate_toward(facing.yaw, target_yaw, config.rotation_speed, delta);
        }
    } else {
        // factor ≤ 1: скорость убывает к нулю без перескока через ноль
        let factor = (config.drag * delta).clamp(0.0, 1.0);
        step.impulse += Vec3::new(-velocity.x, 0.0, -velocity.z) * factor * mass;
    }

    if intent.jump
        && velocity.y <= JUMP_RISE_EPSILON
        && is_grounded(&*physics, body, position, config)
    {
        step.impulse += Vec3::Y * config.jump_force * mass;
        step.jumped = true;
    }

    if step.impulse != Vec3::ZERO {
        physics.apply_impulse(body, step.impulse);
    }

    Some(step)
}

/// Скорость для движения агента прямо к target (XZ), y сохраняется
pub fn seek_velocity(position: Vec3, current_velocity: Vec3, target: Vec3, speed: f32) -> Vec3 {
    let direction = Vec3::new(target.x - position.x, 0.0, target.z - position.z).normalize_or_zero();
    Vec3::new(
        direction.x * speed,
        current_velocity.y,
        direction.z * speed,
    )
}

/// Агент: двигаться к target со скоростью `speed`, повернуться к нему
///
/// `false` = нет physics handle.
pub fn drive_toward<B: PhysicsBackend>(
    physics: &mut B,
    body: Entity,
    target: Vec3,
    speed: f32,
    facing: &mut Facing,
) -> bool {
    let (Some(position), Some(velocity)) =
        (physics.body_position(body), physics.body_linear_velocity(body))
    else {
        return false;
    };

    if !physics.set_linear_velocity(body, seek_velocity(position, velocity, target, speed)) {
        return false;
    }

    // Стоящий агент не крутится
    if speed > 0.1 {
        if let Some(turned) = Facing::toward(target - position) {
            *facing = turned;
        }
    }

    true
}

/// Агент стоит: гасим горизонтальную скорость, y оставляем гравитации
pub fn hold_position<B: PhysicsBackend>(physics: &mut B, body: Entity) -> bool {
    let Some(velocity) = physics.body_linear_velocity(body) else {
        return false;
    };
    physics.set_linear_velocity(body, Vec3::new(0.0, velocity.y, 0.0))
}
