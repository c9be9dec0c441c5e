//! Чистая функция переходов FSM
//!
//! `(state, visible, memory) → (next state, memory, effect)` без ECS и физики,
//! поэтому каждый переход проверяется напрямую.

use bevy::prelude::*;

use crate::ai::components::{planar_distance, BehaviorState};

/// Побочный эффект перехода (для AlertEvent и логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Patrol/Search → Chase
    TargetSpotted,
    /// Chase → Search
    TargetLost,
    /// Search → Patrol (дошли до last known position или памяти нет)
    SearchAbandoned,
}

/// Результат одного шага FSM
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next: BehaviorState,
    /// Новое значение last known target position
    pub memory: Option<Vec3>,
    pub effect: Option<TransitionEffect>,
}

impl Transition {
    fn stay(state: BehaviorState, memory: Option<Vec3>) -> Self {
        Self {
            next: state,
            memory,
            effect: None,
        }
    }

    fn to(next: BehaviorState, memory: Option<Vec3>, effect: TransitionEffect) -> Self {
        Self {
            next,
            memory,
            effect: Some(effect),
        }
    }

    pub fn changed(&self) -> bool {
        self.effect.is_some()
    }
}

/// Следующее состояние агента
///
/// - `visible`: результат perception этого тика
/// - `memory`: текущая last known target position
/// - `target`: опубликованная позиция цели (читается только если visible)
/// - `agent_position`: для проверки "дошли до memory" в Search
pub fn next_state(
    state: BehaviorState,
    visible: bool,
    memory: Option<Vec3>,
    target: Vec3,
    agent_position: Vec3,
    search_reach: f32,
) -> Transition {
    match state {
        BehaviorState::Patrol => {
            if visible {
                Transition::to(BehaviorState::Chase, Some(target), TransitionEffect::TargetSpotted)
            } else {
                Transition::stay(BehaviorState::Patrol, None)
            }
        }

        BehaviorState::Chase => {
            if visible {
                Transition::stay(BehaviorState::Chase, Some(target))
            } else {
                // Память сохраняем: Search пойдёт к ней
                Transition::to(BehaviorState::Search, memory, TransitionEffect::TargetLost)
            }
        }

        BehaviorState::Search => {
            if visible {
                return Transition::to(
                    BehaviorState::Chase,
                    Some(target),
                    TransitionEffect::TargetSpotted,
                );
            }

            match memory {
                Some(last_known) if planar_distance(agent_position, last_known) > search_reach => {
                    Transition::stay(BehaviorState::Search, Some(last_known))
                }
                // Дошли (или искать нечего) → память очищаем
                _ => Transition::to(BehaviorState::Patrol, None, TransitionEffect::SearchAbandoned),
            }
        }
    }
}
