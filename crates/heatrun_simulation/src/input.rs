//! Input boundary
//!
//! Симуляция не опрашивает устройства. Внешний слой (клиент, тест,
//! scripted driver) раз в тик кладёт сюда snapshot намерений.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::DeterministicRng;

/// Resource: per-tick snapshot boolean намерений игрока
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct InputIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump: bool,
    /// Пока без эффекта в locomotion (держим для полноты snapshot'а)
    pub crouch: bool,
}

/// Resource: yaw камеры (reference heading для player locomotion)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Resource)]
pub struct CameraHeading {
    pub yaw: f32,
}

/// Resource: scripted random-walk input (headless прогоны)
///
/// Каждые `hold_ticks` тиков выбирает новое направление/sprint из
/// `DeterministicRng`: одинаковый seed даёт одинаковую траекторию.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct ScriptedInput {
    pub hold_ticks: u32,
    /// Вероятность sprint при смене направления
    pub sprint_chance: f64,
    /// Вероятность прыжка на любом тике
    pub jump_chance: f64,
    ticks_left: u32,
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new(90)
    }
}

impl ScriptedInput {
    pub fn new(hold_ticks: u32) -> Self {
        Self {
            hold_ticks: hold_ticks.max(1),
            sprint_chance: 0.3,
            jump_chance: 0.01,
            ticks_left: 0,
        }
    }
}

/// Система: scripted input → InputIntent
pub fn drive_scripted_input(
    mut script: ResMut<ScriptedInput>,
    mut rng: ResMut<DeterministicRng>,
    mut intent: ResMut<InputIntent>,
) {
    let rng = &mut rng.rng;

    if script.ticks_left == 0 {
        script.ticks_left = script.hold_ticks;

        // 0..9: 8 направлений + стоять на месте
        let (forward, backward, left, right) = match rng.gen_range(0..9) {
            0 => (true, false, false, false),
            1 => (true, false, true, false),
            2 => (false, false, true, false),
            3 => (false, true, true, false),
            4 => (false, true, false, false),
            5 => (false, true, false, true),
            6 => (false, false, false, true),
            7 => (true, false, false, true),
            _ => (false, false, false, false),
        };

        intent.forward = forward;
        intent.backward = backward;
        intent.left = left;
        intent.right = right;
        intent.sprint = rng.gen_bool(script.sprint_chance);
    }
    script.ticks_left -= 1;

    intent.jump = rng.gen_bool(script.jump_chance);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input_is_seed_deterministic() {
        fn run(seed: u64) -> Vec<InputIntent> {
            let mut world = World::new();
            world.insert_resource(ScriptedInput::new(3));
            world.insert_resource(DeterministicRng::new(seed));
            world.insert_resource(InputIntent::default());

            let mut history = Vec::new();
            for _ in 0..30 {
                world
                    .run_system_cached(drive_scripted_input)
                    .expect("system runs");
                history.push(*world.resource::<InputIntent>());
            }
            history
        }

        assert_eq!(run(7), run(7));
    }
}
