//! Создание физических тел
//!
//! Один и тот же набор ECS компонентов в обоих режимах, плюс
//! rapier-специфичные (RigidBody, Collider, ...) только в `PhysicsMode::Rapier`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    Collider, ColliderMassProperties, ExternalImpulse, Friction, LockedAxes, Restitution,
    RigidBody, Velocity,
};
use serde::{Deserialize, Serialize};

use crate::components::{BodyExtent, BodyMass};
use crate::physics::{HeadlessWorld, StaticBox};

/// Кто считает физику
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhysicsMode {
    /// Rapier (RapierPhysicsPlugin в fixed schedule)
    Rapier,
    /// HeadlessWorld + integrate_headless_bodies
    #[default]
    Headless,
}

/// Форма коллайдера
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Вертикальная капсула: half_height цилиндра + radius
    Capsule { half_height: f32, radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl BodyShape {
    /// Расстояние от центра до нижней точки
    pub fn base_offset(&self) -> f32 {
        match *self {
            BodyShape::Capsule {
                half_height,
                radius,
            } => half_height + radius,
            BodyShape::Cuboid { half_extents } => half_extents.y,
        }
    }

    fn collider(&self) -> Collider {
        match *self {
            BodyShape::Capsule {
                half_height,
                radius,
            } => Collider::capsule_y(half_height, radius),
            BodyShape::Cuboid { half_extents } => {
                Collider::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
        }
    }
}

/// Параметры динамического тела
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub shape: BodyShape,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Персонажи не кувыркаются
    pub lock_rotations: bool,
}

impl BodySpec {
    /// Игрок: капсула 0.75 + 0.4, тяжелее полиции
    pub fn player(mass: f32) -> Self {
        Self {
            shape: BodyShape::Capsule {
                half_height: 0.75,
                radius: 0.4,
            },
            mass,
            friction: 1.0,
            restitution: 0.0,
            lock_rotations: true,
        }
    }

    /// Патрульный: box 1×2×1
    pub fn police_unit(mass: f32) -> Self {
        Self {
            shape: BodyShape::Cuboid {
                half_extents: Vec3::new(0.5, 1.0, 0.5),
            },
            mass,
            friction: 0.5,
            restitution: 0.0,
            lock_rotations: true,
        }
    }
}

/// Spawn динамического тела, возвращает entity для дальнейших insert'ов
pub fn spawn_dynamic_body(
    world: &mut World,
    mode: PhysicsMode,
    position: Vec3,
    spec: &BodySpec,
) -> Entity {
    let mut entity = world.spawn((
        Transform::from_translation(position),
        Velocity::default(),
        ExternalImpulse::default(),
        BodyMass(spec.mass),
        BodyExtent {
            half_height: spec.shape.base_offset(),
        },
    ));

    if mode == PhysicsMode::Rapier {
        entity.insert((
            RigidBody::Dynamic,
            spec.shape.collider(),
            ColliderMassProperties::Mass(spec.mass),
            Friction::coefficient(spec.friction),
            Restitution::coefficient(spec.restitution),
        ));
        if spec.lock_rotations {
            entity.insert(LockedAxes::ROTATION_LOCKED);
        }
    }

    entity.id()
}

/// Spawn статической геометрии
///
/// Rapier: fixed rigid body + cuboid. Headless: box добавляется в `HeadlessWorld`.
pub fn spawn_static_box(world: &mut World, mode: PhysicsMode, block: StaticBox) {
    match mode {
        PhysicsMode::Rapier => {
            world.spawn((
                Transform::from_translation(block.center),
                RigidBody::Fixed,
                Collider::cuboid(block.half_extents.x, block.half_extents.y, block.half_extents.z),
                Friction::coefficient(1.0),
                Restitution::coefficient(0.0),
            ));
        }
        PhysicsMode::Headless => {
            world
                .get_resource_or_insert_with(HeadlessWorld::default)
                .obstacles
                .push(block);
        }
    }
}
