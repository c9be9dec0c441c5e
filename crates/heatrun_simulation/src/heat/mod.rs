//! Heat/Alert aggregator
//!
//! Process-wide давление обнаружения на игрока:
//! - heat ∈ [0, 100], меняется только через increase/decrease (clamp)
//! - spotted = хотя бы один агент сейчас видит цель
//!
//! Внутри симуляции heat только пишется (chase + sprint).
//! Decay и game phase, забота внешнего UI/game-phase слоя.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const HEAT_MIN: f32 = 0.0;
pub const HEAT_MAX: f32 = 100.0;

/// Скорости роста heat (units/sec)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatConfig {
    /// Агент в Chase (на каждого преследующего)
    pub chase_rate: f32,
    /// Игрок бежит (sprint + есть movement intent)
    pub sprint_rate: f32,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            chase_rate: 10.0, // Быстрый рост во время погони
            sprint_rate: 1.0,
        }
    }
}

/// Shared alert state (читается UI слоем)
///
/// Инвариант: HEAT_MIN ≤ heat ≤ HEAT_MAX после любой операции.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Resource)]
pub struct AlertStatus {
    heat: f32,
    spotted: bool,
}

impl AlertStatus {
    pub fn heat(&self) -> f32 {
        self.heat
    }

    pub fn is_spotted(&self) -> bool {
        self.spotted
    }

    /// Увеличить heat, результат всё равно в [0, 100]. NaN amount игнорируется.
    pub fn increase_heat(&mut self, amount: f32) {
        if amount.is_nan() {
            return;
        }
        self.heat = clamp_heat(self.heat + amount);
    }

    pub fn decrease_heat(&mut self, amount: f32) {
        if amount.is_nan() {
            return;
        }
        self.heat = clamp_heat(self.heat - amount);
    }

    pub fn set_spotted(&mut self, spotted: bool) {
        self.spotted = spotted;
    }
}

fn clamp_heat(value: f32) -> f32 {
    value.clamp(HEAT_MIN, HEAT_MAX)
}
