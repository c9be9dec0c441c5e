//! Movement domain: locomotion игрока и агентов
//!
//! Содержит:
//! - LocomotionConfig (tuning игрока)
//! - step_locomotion (intent → impulse, drag, прыжок)
//! - drive_toward / hold_position (velocity агентов)
//! - player_locomotion (FixedUpdate система)

pub mod locomotion;
pub mod systems;


// Re-export all
pub use locomotion::*;
pub use systems::*;
