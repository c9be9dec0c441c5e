//! Ошибки setup-фазы (config + scenario)
//!
//! Тик симуляции ошибок не возвращает: сломанный entity просто
//! пропускается на этом тике. Всё, что можно проверить заранее,
//! проверяется здесь, до спавна.

use thiserror::Error;

/// Невалидный tuning (JSON или ручная сборка `SimulationConfig`)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("drag {drag} at timestep {timestep}s gives a damping factor >= 1, velocity would overshoot")]
    UnstableDrag { drag: f32, timestep: f32 },

    #[error("sprint speed {sprint} is below walk speed {walk}")]
    SprintSlowerThanWalk { walk: f32, sprint: f32 },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Невалидный сценарий (маршруты, агенты)
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("patrol route '{0}' has no waypoints")]
    EmptyRoute(String),

    #[error("agent {agent} references unknown patrol route '{route}'")]
    UnknownRoute { agent: u32, route: String },

    #[error("agent id {0} is used more than once")]
    DuplicateAgent(u32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
