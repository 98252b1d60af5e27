use std::any::Any;

use anyhow::Result;

use crate::{
    components::Expires,
    ecs::{Entity, EntityId, LoopPhase, System, World},
};

/// Counts down every [`Expires`] component by the frame delta.
pub struct LifetimeSystem;

impl LifetimeSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LifetimeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for LifetimeSystem {
    fn name(&self) -> &str {
        "lifetime"
    }

    fn loop_phase(&self) -> LoopPhase {
        LoopPhase::Update
    }

    fn matches(&self, entity: &Entity) -> bool {
        entity.contains_component::<Expires>()
    }

    fn process(&mut self, entities: &[EntityId], world: &mut World) -> Result<()> {
        let dt = world.clock().delta_seconds;
        for id in entities {
            world.get_component_mut::<Expires>(*id)?.remaining -= dt;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
