//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - body: физическое тело (BodyMass, BodyExtent) + ориентация (Facing)
//! - player: player control marker + TargetSnapshot (shared состояние цели)
//!
//! AI компоненты (BehaviorState, AgentBrain, PatrolRoute) живут в `ai::components`.

pub mod body;
pub mod player;

// Re-exports для удобного импорта
pub use body::*;
pub use player::*;
