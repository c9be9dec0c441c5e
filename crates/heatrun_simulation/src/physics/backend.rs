//! Контракт physics backend'а
//!
//! Симуляция не знает, кто считает физику: rapier (production) или
//! `HeadlessWorld` (тесты, headless binary). Всё, что нужно ядру:
//! raycast + чтение/запись состояния тел.
//!
//! Missing handle (тело ещё не создано / уже удалено), НЕ ошибка:
//! чтения возвращают `None`, записи возвращают `false`, entity
//! пропускается на этом тике.

use bevy::prelude::*;

/// Результат raycast'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Time of impact вдоль normalized direction (= дистанция)
    pub distance: f32,
}

pub trait PhysicsBackend {
    /// Первый hit вдоль луча в пределах `max_distance`.
    ///
    /// `direction` должен быть normalized. `exclude`: тело, которое
    /// луч игнорирует (обычно сам наблюдатель).
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<Entity>,
    ) -> Option<RayHit>;

    fn body_position(&self, body: Entity) -> Option<Vec3>;

    fn body_linear_velocity(&self, body: Entity) -> Option<Vec3>;

    fn body_mass(&self, body: Entity) -> Option<f32>;

    /// Импульс (N·s) копится до следующего physics step.
    fn apply_impulse(&mut self, body: Entity, impulse: Vec3) -> bool;

    fn set_linear_velocity(&mut self, body: Entity, velocity: Vec3) -> bool;
}
