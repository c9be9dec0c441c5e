//! AI Events: переходы FSM для внешнего UI/game-phase слоя
//!
//! Симуляция только пишет их. Читатель (HUD, звук сирен, статистика)
//! живёт снаружи, внутри ядра никто на них не реагирует.

use bevy::prelude::*;

/// Событие перехода агента
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AlertEvent {
    /// Patrol/Search → Chase
    TargetSpotted {
        /// Entity агента
        agent: Entity,
        /// PoliceUnit id
        unit: u32,
        /// Где цель была замечена
        target_position: Vec3,
    },

    /// Chase → Search
    TargetLost {
        agent: Entity,
        unit: u32,
        /// Last known position, к которой пойдёт Search (если есть)
        last_known: Option<Vec3>,
    },

    /// Search → Patrol
    SearchAbandoned { agent: Entity, unit: u32 },
}

impl AlertEvent {
    pub fn agent(&self) -> Entity {
        match *self {
            AlertEvent::TargetSpotted { agent, .. }
            | AlertEvent::TargetLost { agent, .. }
            | AlertEvent::SearchAbandoned { agent, .. } => agent,
        }
    }

    pub fn unit(&self) -> u32 {
        match *self {
            AlertEvent::TargetSpotted { unit, .. }
            | AlertEvent::TargetLost { unit, .. }
            | AlertEvent::SearchAbandoned { unit, .. } => unit,
        }
    }
}
