//! ECS → PhysicsBackend мост
//!
//! Тела в обоих режимах живут в одних и тех же компонентах:
//! `Transform` (позиция), rapier `Velocity`, rapier `ExternalImpulse`,
//! наш `BodyMass`. Rapier сам интегрирует их в production, в headless
//! это делает `integrate_headless_bodies`.
//!
//! Raycast: rapier context если он есть, иначе `HeadlessWorld`.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalImpulse, QueryFilter, ReadRapierContext, Velocity};

use crate::components::BodyMass;
use crate::physics::{HeadlessWorld, PhysicsBackend, RayHit};

#[derive(SystemParam)]
pub struct PhysicsBridge<'w, 's> {
    rapier: ReadRapierContext<'w, 's>,
    headless: Option<Res<'w, HeadlessWorld>>,
    bodies: Query<
        'w,
        's,
        (
            &'static Transform,
            &'static mut Velocity,
            &'static mut ExternalImpulse,
            &'static BodyMass,
        ),
    >,
}

impl PhysicsBackend for PhysicsBridge<'_, '_> {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<Entity>,
    ) -> Option<RayHit> {
        if let Ok(context) = self.rapier.single() {
            let filter = match exclude {
                Some(body) => QueryFilter::default().exclude_rigid_body(body),
                None => QueryFilter::default(),
            };

            return context
                .cast_ray(origin, direction, max_distance, true, filter)
                .map(|(_, distance)| RayHit { distance });
        }

        // Headless: статическая геометрия, тела в raycast не участвуют
        self.headless
            .as_ref()
            .and_then(|world| world.cast_ray(origin, direction, max_distance))
    }

    fn body_position(&self, body: Entity) -> Option<Vec3> {
        self.bodies
            .get(body)
            .ok()
            .map(|(transform, ..)| transform.translation)
    }

    fn body_linear_velocity(&self, body: Entity) -> Option<Vec3> {
        self.bodies.get(body).ok().map(|(_, velocity, ..)| velocity.linvel)
    }

    fn body_mass(&self, body: Entity) -> Option<f32> {
        self.bodies.get(body).ok().map(|(.., mass)| mass.0)
    }

    fn apply_impulse(&mut self, body: Entity, impulse: Vec3) -> bool {
        let Ok((_, _, mut external, _)) = self.bodies.get_mut(body) else {
            return false;
        };
        external.impulse += impulse;
        true
    }

    fn set_linear_velocity(&mut self, body: Entity, velocity: Vec3) -> bool {
        let Ok((_, mut current, ..)) = self.bodies.get_mut(body) else {
            return false;
        };
        current.linvel = velocity;
        true
    }
}
