//! System trait and loop phases

use std::any::Any;
use std::fmt;

use anyhow::Result;
use serde::Serialize;

use super::{Entity, EntityId, World};

/// Stage of the frame a system runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LoopPhase {
    Update,
    Render,
    Custom(&'static str),
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopPhase::Update => write!(f, "update"),
            LoopPhase::Render => write!(f, "render"),
            LoopPhase::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Per-frame logic selecting entities by predicate.
///
/// The world captures [`System::loop_phase`] once when the system is
/// registered. Each `process_all` call for that phase first collects every
/// live entity for which [`System::matches`] holds, then hands those ids to
/// [`System::process`].
pub trait System {
    fn name(&self) -> &str;

    fn loop_phase(&self) -> LoopPhase;

    /// Selection predicate. Must not fail or mutate anything, so use the
    /// `try_get_component`/`contains_component` accessors.
    fn matches(&self, entity: &Entity) -> bool;

    /// Work on the matched entities. `entities` is a snapshot taken before
    /// the call and may be empty; entities removed since may no longer be
    /// live in `world`.
    fn process(&mut self, entities: &[EntityId], world: &mut World) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
