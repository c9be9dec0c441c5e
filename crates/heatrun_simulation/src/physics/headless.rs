//! Headless physics backend (без Rapier)
//!
//! Для тестов и headless binary: статическая геометрия (AABB) + ground
//! plane, тела, это те же ECS компоненты, что и у rapier
//! (`Transform`, `Velocity`, `ExternalImpulse`, `BodyMass`).
//!
//! Ограничения (stand-in, не настоящая физика):
//! - нет lateral коллизий (тела проходят сквозь стены)
//! - нет трения о землю (торможение делает locomotion drag)
//! - поддержка снизу: ground plane или крыша box'а в пределах STEP_HEIGHT

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalImpulse, Velocity};

use crate::components::{BodyExtent, BodyMass};
use crate::physics::RayHit;

/// На сколько тело может "забраться" на крышу box'а за один тик
const STEP_HEIGHT: f32 = 0.25;

/// Статический box (здания, препятствия, ground slab)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct StaticBox {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl StaticBox {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    fn contains_xz(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.z >= min.z && point.z <= max.z
    }

    /// Slab test. Луч, стартующий внутри box'а, попадает сразу (solid).
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let mut t_enter = 0.0_f32;
        let mut t_exit = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];

            if d.abs() < f32::EPSILON {
                // Параллельно плоскостям slab'а: либо всегда внутри, либо мимо
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }
}

/// Resource: геометрия headless мира
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct HeadlessWorld {
    /// Бесконечная плоскость пола (None = летим вниз бесконечно)
    pub ground_height: Option<f32>,
    /// m/s²
    pub gravity: f32,
    pub obstacles: Vec<StaticBox>,
}

impl Default for HeadlessWorld {
    fn default() -> Self {
        Self {
            ground_height: Some(0.0),
            gravity: -9.81,
            obstacles: Vec::new(),
        }
    }
}

impl HeadlessWorld {
    pub fn with_obstacle(mut self, obstacle: StaticBox) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<f32> = None;

        for obstacle in &self.obstacles {
            if let Some(t) = obstacle.ray_distance(origin, direction, max_distance) {
                best = Some(best.map_or(t, |b| b.min(t)));
            }
        }

        if let Some(ground) = self.ground_height {
            // Плоскость считается solid только сверху
            if direction.y < -f32::EPSILON && origin.y >= ground {
                let t = (origin.y - ground) / -direction.y;
                if t <= max_distance {
                    best = Some(best.map_or(t, |b| b.min(t)));
                }
            }
        }

        best.map(|distance| RayHit { distance })
    }

    /// Высота опоры под точкой `base` (нижняя точка тела)
    pub fn support_height(&self, base: Vec3) -> Option<f32> {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.contains_xz(base) && obstacle.top() <= base.y + STEP_HEIGHT)
            .map(StaticBox::top)
            .chain(self.ground_height)
            .reduce(f32::max)
    }
}

/// Система: интеграция тел в headless режиме
///
/// Порядок внутри тела: impulse → gravity → position += v·dt → ground clamp.
/// Запускается ПОСЛЕ player/AI систем (они пишут impulse/velocity этого тика).
pub fn integrate_headless_bodies(
    world: Res<HeadlessWorld>,
    time: Res<Time<Fixed>>,
    mut bodies: Query<(
        &mut Transform,
        &mut Velocity,
        &mut ExternalImpulse,
        &BodyMass,
        &BodyExtent,
    )>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut velocity, mut impulse, mass, extent) in bodies.iter_mut() {
        if mass.0 > 0.0 {
            velocity.linvel += impulse.impulse / mass.0;
        }
        impulse.impulse = Vec3::ZERO;

        velocity.linvel.y += world.gravity * delta;
        transform.translation += velocity.linvel * delta;

        let base = transform.translation - Vec3::Y * extent.half_height;
        if let Some(support) = world.support_height(base) {
            if base.y < support {
                transform.translation.y = support + extent.half_height;
                velocity.linvel.y = velocity.linvel.y.max(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_box_in_front() {
        let wall = StaticBox::new(Vec3::new(0.0, 1.0, 5.0), Vec3::new(2.0, 1.0, 0.5));
        let t = wall.ray_distance(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 20.0);
        assert_eq!(t, Some(4.5));
    }

    #[test]
    fn test_ray_misses_box_beside() {
        let wall = StaticBox::new(Vec3::new(5.0, 1.0, 5.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(wall.ray_distance(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 20.0).is_none());
    }

    #[test]
    fn test_ray_stops_at_max_distance() {
        let wall = StaticBox::new(Vec3::new(0.0, 1.0, 10.0), Vec3::splat(1.0));
        assert!(wall.ray_distance(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 5.0).is_none());
    }

    #[test]
    fn test_ground_plane_ray() {
        let world = HeadlessWorld::default();
        let hit = world.cast_ray(Vec3::new(0.0, 0.1, 0.0), Vec3::NEG_Y, 0.2);
        let hit = hit.expect("ground must be detected");
        assert!((hit.distance - 0.1).abs() < 1e-5);

        // Вверх, пусто
        assert!(world.cast_ray(Vec3::new(0.0, 0.1, 0.0), Vec3::Y, 10.0).is_none());
    }

    #[test]
    fn test_support_height_prefers_box_roof() {
        let world = HeadlessWorld::default()
            .with_obstacle(StaticBox::new(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(1.0)));

        // Стоим на крыше (top = 2.0)
        assert_eq!(world.support_height(Vec3::new(0.0, 1.9, 0.0)), Some(2.0));
        // Под крышей (слишком низко, чтобы забраться), пол
        assert_eq!(world.support_height(Vec3::new(0.0, 0.5, 0.0)), Some(0.0));
        // Сбоку, пол
        assert_eq!(world.support_height(Vec3::new(5.0, 1.9, 0.0)), Some(0.0));
    }
}
