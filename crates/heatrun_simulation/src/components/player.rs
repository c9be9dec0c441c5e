//! Player control marker + shared snapshot игрока
//!
//! Агенты НЕ держат ссылку на тело игрока. Locomotion раз в тик
//! публикует `TargetSnapshot`, perception читает только его.

use bevy::prelude::*;

use crate::components::Facing;
use crate::movement::LocomotionConfig;

/// Marker component для player-controlled entity
///
/// `player_locomotion` выбирает тело по `With<Player>`. Агенты игрока
/// не запрашивают вовсе, только `TargetSnapshot`.
///
/// В single-player только один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Facing, LocomotionConfig)]
pub struct Player;

/// Resource: последнее опубликованное состояние цели (игрока)
///
/// Пишется ТОЛЬКО player locomotion системой, один раз за тик,
/// до того как агенты начнут свои perception запросы.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Resource)]
pub struct TargetSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Entity тела, опубликовавшего snapshot (perception его не читает)
    pub body: Option<Entity>,
    /// Номер тика последней публикации (0 = ещё не публиковали)
    pub tick: u64,
}

impl TargetSnapshot {
    pub fn is_published(&self) -> bool {
        self.tick > 0
    }

    pub fn publish(&mut self, body: Entity, position: Vec3, velocity: Vec3, tick: u64) {
        self.body = Some(body);
        self.position = position;
        self.velocity = velocity;
        self.tick = tick;
    }
}
