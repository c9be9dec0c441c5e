//! In-memory PhysicsBackend для unit тестов
//!
//! Тела, HashMap, raycast отвечает заранее заданными "стенами"
//! (или ничем). Позиции не интегрируются: тест сам двигает тела.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::physics::{PhysicsBackend, RayHit, StaticBox};

#[derive(Debug, Clone, Default)]
pub struct MockBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub impulses: Vec<Vec3>,
}

#[derive(Debug, Default)]
pub struct MockPhysics {
    pub bodies: HashMap<Entity, MockBody>,
    pub walls: Vec<StaticBox>,
    /// Высота пола для raycast (None = пола нет)
    pub ground: Option<f32>,
}

impl MockPhysics {
    pub fn with_body(mut self, entity: Entity, position: Vec3, mass: f32) -> Self {
        self.bodies.insert(
            entity,
            MockBody {
                position,
                mass,
                ..default()
            },
        );
        self
    }

    pub fn body(&self, entity: Entity) -> &MockBody {
        &self.bodies[&entity]
    }

    pub fn body_mut(&mut self, entity: Entity) -> &mut MockBody {
        self.bodies.get_mut(&entity).expect("mock body exists")
    }

    pub fn total_impulse(&self, entity: Entity) -> Vec3 {
        self.body(entity).impulses.iter().copied().sum()
    }
}

impl PhysicsBackend for MockPhysics {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        _exclude: Option<Entity>,
    ) -> Option<RayHit> {
        let mut best = self
            .walls
            .iter()
            .filter_map(|wall| wall.ray_distance(origin, direction, max_distance))
            .reduce(f32::min);

        if let Some(ground) = self.ground {
            if direction.y < 0.0 && origin.y >= ground {
                let t = (origin.y - ground) / -direction.y;
                if t <= max_distance {
                    best = Some(best.map_or(t, |b| b.min(t)));
                }
            }
        }

        best.map(|distance| RayHit { distance })
    }

    fn body_position(&self, body: Entity) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn body_linear_velocity(&self, body: Entity) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn body_mass(&self, body: Entity) -> Option<f32> {
        self.bodies.get(&body).map(|b| b.mass)
    }

    fn apply_impulse(&mut self, body: Entity, impulse: Vec3) -> bool {
        let Some(b) = self.bodies.get_mut(&body) else {
            return false;
        };
        b.impulses.push(impulse);
        if b.mass > 0.0 {
            b.velocity += impulse / b.mass;
        }
        true
    }

    fn set_linear_velocity(&mut self, body: Entity, velocity: Vec3) -> bool {
        let Some(b) = self.bodies.get_mut(&body) else {
            return false;
        };
        b.velocity = velocity;
        true
    }
}
