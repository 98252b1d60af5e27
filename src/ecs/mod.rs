//! Entity Component System (ECS) implementation
//!
//! Entities own their components, systems select entities by predicate,
//! and the world runs the systems of one loop phase at a time.

pub mod command;
pub mod component;
pub mod entity;
pub mod error;
pub mod system;
pub mod world;

pub use command::CommandQueue;
pub use component::{Component, ComponentStore};
pub use entity::{Entity, EntityId};
pub use error::EcsError;
pub use system::{LoopPhase, System};
pub use world::{FrameClock, PhaseReport, SystemRunReport, World};
