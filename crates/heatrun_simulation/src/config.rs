//! Simulation tuning
//!
//! Все константы движения/зрения/heat, конфигурация, не поведение.
//! Дефолты = reference tuning; JSON может переопределить любое поле.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ai::AgentTuning;
use crate::error::ConfigError;
use crate::heat::HeatConfig;
use crate::movement::LocomotionConfig;
use crate::perception::VisionConfig;

/// Fixed timestep симуляции (60 Hz)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Resource: весь tuning симуляции
///
/// Компоненты (LocomotionConfig, AgentTuning, VisionConfig) получают копии при spawn.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct SimulationConfig {
    pub locomotion: LocomotionConfig,
    pub agent: AgentTuning,
    pub vision: VisionConfig,
    pub heat: HeatConfig,
}

impl SimulationConfig {
    /// JSON → config (отсутствующие поля = дефолты), затем validate
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Проверка документированных диапазонов
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        check_range("locomotion.walk_speed", loco.walk_speed, 1.0, 20.0)?;
        check_range("locomotion.sprint_speed", loco.sprint_speed, 5.0, 30.0)?;
        check_range("locomotion.acceleration", loco.acceleration, 1.0, 100.0)?;
        check_range("locomotion.drag", loco.drag, 0.0, 50.0)?;
        check_range("locomotion.jump_force", loco.jump_force, 0.0, 50.0)?;
        check_range("locomotion.rotation_speed", loco.rotation_speed, 0.0, 50.0)?;
        check_range("locomotion.movement_epsilon", loco.movement_epsilon, 0.0, 1.0)?;
        check_range("locomotion.ground_probe_length", loco.ground_probe_length, 0.01, 2.0)?;
        check_range("locomotion.foot_offset", loco.foot_offset, 0.0, 5.0)?;
        check_positive("locomotion.mass", loco.mass)?;

        if loco.sprint_speed < loco.walk_speed {
            return Err(ConfigError::SprintSlowerThanWalk {
                walk: loco.walk_speed,
                sprint: loco.sprint_speed,
            });
        }

        // drag × dt < 1 → damping не перескакивает через ноль
        if loco.drag * FIXED_TIMESTEP >= 1.0 {
            return Err(ConfigError::UnstableDrag {
                drag: loco.drag,
                timestep: FIXED_TIMESTEP,
            });
        }

        let agent = &self.agent;
        check_range("agent.patrol_speed", agent.patrol_speed, 0.0, 30.0)?;
        check_range("agent.chase_speed", agent.chase_speed, 0.0, 30.0)?;
        check_range("agent.search_speed_factor", agent.search_speed_factor, 0.0, 1.0)?;
        check_range("agent.waypoint_reach", agent.waypoint_reach, 0.1, 10.0)?;
        check_range("agent.search_reach", agent.search_reach, 0.1, 10.0)?;
        check_positive("agent.mass", agent.mass)?;

        let vision = &self.vision;
        check_range("vision.view_distance", vision.view_distance, 0.0, 200.0)?;
        check_range("vision.half_angle", vision.half_angle, 0.0, std::f32::consts::PI)?;
        check_range("vision.eye_height", vision.eye_height, 0.0, 5.0)?;
        check_range("vision.occlusion_margin", vision.occlusion_margin, 0.0, 5.0)?;

        check_range("heat.chase_rate", self.heat.chase_rate, 0.0, 100.0)?;
        check_range("heat.sprint_rate", self.heat.sprint_rate, 0.0, 100.0)?;

        Ok(())
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    // NaN тоже не проходит: сравнения с NaN ложны
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_range(field, value, f32::MIN_POSITIVE, 1000.0)
}
