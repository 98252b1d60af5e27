pub mod components;
pub mod ecs;
pub mod engine;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod systems;

pub use ecs::{Component, EcsError, Entity, EntityId, LoopPhase, System, World};
pub use engine::{Engine, EngineBuilder, EngineSettings, FrameSummary};
pub use scenario::{Scenario, ScenarioLoader};
