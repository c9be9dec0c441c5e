//! Physics module
//!
//! Ядро общается с физикой только через `PhysicsBackend`:
//! - `PhysicsBridge`: SystemParam поверх ECS тел (rapier или headless)
//! - `HeadlessWorld`: AABB геометрия + интеграция без Rapier
//! - `spawn`: создание тел (mass, friction, restitution, locked rotations)

pub mod backend;
pub mod bridge;
pub mod headless;
pub mod spawn;

#[cfg(test)]
pub(crate) mod mock;

// Re-export основных типов
pub use backend::{PhysicsBackend, RayHit};
pub use bridge::PhysicsBridge;
pub use headless::{integrate_headless_bodies, HeadlessWorld, StaticBox};
pub use spawn::{BodySpec, PhysicsMode};
