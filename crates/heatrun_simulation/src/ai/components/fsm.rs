//! FSM AI components (behavior state, memory, patrol route, tuning).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::components::Facing;
use crate::perception::VisionConfig;

/// Состояния поведения агента
///
/// Ровно одно активно в любой момент. Новое состояние (например короткая
/// пауза "что-то заметил" перед Chase) добавляется вариантом здесь и
/// веткой в `next_state`: match'и исчерпывающие, компилятор найдёт все места.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Обход маршрута
    #[default]
    Patrol,
    /// Цель видна, преследуем live позицию
    Chase,
    /// Цель потеряна, идём к last known position
    Search,
}

impl BehaviorState {
    /// Метка для UI/логов
    pub fn label(&self) -> &'static str {
        match self {
            BehaviorState::Patrol => "PATROL",
            BehaviorState::Chase => "CHASE",
            BehaviorState::Search => "SEARCH",
        }
    }
}

impl std::fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Marker + id полицейского агента
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(AgentBrain, Facing, AgentTuning, VisionConfig)]
pub struct PoliceUnit {
    pub id: u32,
}

/// Изменяемое состояние FSM агента
///
/// Инварианты:
/// - `last_known_target` есть только в Chase/Search
/// - `patrol_index` всегда валиден для маршрута (wrap по длине)
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct AgentBrain {
    pub state: BehaviorState,
    pub last_known_target: Option<Vec3>,
    pub patrol_index: usize,
    /// Куда агент двигался на последнем тике (для UI/отладки)
    pub target_point: Option<Vec3>,
}

/// Маршрут патруля (общий для нескольких агентов → Arc)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PatrolRoute {
    waypoints: Arc<[Vec3]>,
}

impl Default for PatrolRoute {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PatrolRoute {
    pub fn new(waypoints: impl Into<Arc<[Vec3]>>) -> Self {
        Self {
            waypoints: waypoints.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Waypoint по индексу (wrap). Пустой маршрут → None.
    pub fn waypoint(&self, index: usize) -> Option<Vec3> {
        if self.waypoints.is_empty() {
            return None;
        }
        Some(self.waypoints[index % self.waypoints.len()])
    }

    pub fn next_index(&self, index: usize) -> usize {
        if self.waypoints.is_empty() {
            return 0;
        }
        (index + 1) % self.waypoints.len()
    }
}

/// Параметры поведения агента
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentTuning {
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Search speed = chase_speed × factor
    pub search_speed_factor: f32,
    /// Радиус "дошёл до waypoint'а" (XZ)
    pub waypoint_reach: f32,
    /// Радиус "дошёл до last known position" (XZ)
    pub search_reach: f32,
    pub mass: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            patrol_speed: 3.0,
            chase_speed: 9.0,
            search_speed_factor: 0.5,
            waypoint_reach: 1.0,
            search_reach: 2.0,
            mass: 1.0,
        }
    }
}

impl AgentTuning {
    pub fn search_speed(&self) -> f32 {
        self.chase_speed * self.search_speed_factor
    }
}

/// Горизонтальное расстояние (y игнорируем: waypoints на земле, центры тел выше)
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
