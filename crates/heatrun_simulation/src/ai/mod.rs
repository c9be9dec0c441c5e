//! AI decision-making module
//!
//! Police FSM: Patrol / Chase / Search поверх perception.
//! Переходы, чистая функция (`transition::next_state`), ECS системы
//! только собирают входы и применяют результат.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;
pub mod transition;

// Re-export основных типов
pub use components::{AgentBrain, AgentTuning, BehaviorState, PatrolRoute, PoliceUnit};
pub use events::AlertEvent;
pub use systems::{police_behavior, tick_agent, update_alert_status, AgentTick};
pub use transition::{next_state, Transition, TransitionEffect};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения (внутри `SimulationSet::Agents`):
/// 1. police_behavior: perception → transition → movement каждого агента
/// 2. update_alert_status: агрегированный spotted флаг
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AlertEvent>()
            .register_type::<AgentBrain>()
            .register_type::<AgentTuning>()
            .register_type::<PoliceUnit>()
            .add_systems(
                FixedUpdate,
                (police_behavior, update_alert_status)
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(SimulationSet::Agents),
            );
    }
}
