//! Компоненты физического тела и ориентации

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Масса тела (kg). Источник истины для impulse расчётов в обоих backend'ах.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct BodyMass(pub f32);

impl Default for BodyMass {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Расстояние от центра тела до его нижней точки
///
/// Нужно headless backend'у для ground clamp (rapier знает форму сам).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct BodyExtent {
    pub half_height: f32,
}

/// Направление взгляда в горизонтальной плоскости
///
/// yaw = 0 смотрит в +Z, forward = (sin yaw, 0, cos yaw).
/// Инвариант: yaw ∈ [-π, π].
///
/// Отдельно от Transform.rotation: тело с locked rotations не вращаем,
/// поворачивается только "визуал" и конус зрения.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub yaw: f32,
}

impl Facing {
    pub fn from_yaw(yaw: f32) -> Self {
        Self {
            yaw: wrap_angle(yaw),
        }
    }

    /// Facing вдоль direction (XZ). Нулевой вектор → None.
    pub fn toward(direction: Vec3) -> Option<Self> {
        yaw_from_direction(direction).map(Self::from_yaw)
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }
}

/// yaw = atan2(x, z); для вектора без горизонтальной составляющей, None
pub fn yaw_from_direction(direction: Vec3) -> Option<f32> {
    let flat = Vec2::new(direction.x, direction.z);
    if flat.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(direction.x.atan2(direction.z))
}

/// Привести угол в [-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid может вернуть ровно TAU из-за округления
    wrapped.clamp(-PI, PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_forward_matches_yaw() {
        assert!(Facing::from_yaw(0.0).forward().abs_diff_eq(Vec3::Z, 1e-6));
        assert!(Facing::from_yaw(FRAC_PI_2).forward().abs_diff_eq(Vec3::X, 1e-6));
        assert!(Facing::from_yaw(PI).forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_toward_roundtrips_direction() {
        let facing = Facing::toward(Vec3::new(0.0, 0.0, -5.0)).expect("non-zero direction");
        assert!(facing.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));

        assert!(Facing::toward(Vec3::Y).is_none());
        assert!(Facing::toward(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) - (-FRAC_PI_2)).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - FRAC_PI_2).abs() < 1e-5);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-6);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
    }
}
