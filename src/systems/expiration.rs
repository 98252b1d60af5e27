use std::any::Any;

use anyhow::Result;
use log::debug;

use crate::{
    components::Expires,
    ecs::{Entity, EntityId, LoopPhase, System, World},
};

/// Removes entities whose [`Expires`] lifetime has run out.
pub struct ExpirationSystem {
    expired_total: u64,
}

impl ExpirationSystem {
    pub fn new() -> Self {
        Self { expired_total: 0 }
    }

    /// Number of entities removed since the system was created.
    pub fn expired_total(&self) -> u64 {
        self.expired_total
    }
}

impl Default for ExpirationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ExpirationSystem {
    fn name(&self) -> &str {
        "expiration"
    }

    fn loop_phase(&self) -> LoopPhase {
        LoopPhase::Update
    }

    fn matches(&self, entity: &Entity) -> bool {
        entity
            .try_get_component::<Expires>()
            .map_or(false, Expires::is_expired)
    }

    fn process(&mut self, entities: &[EntityId], world: &mut World) -> Result<()> {
        for id in entities {
            world.remove_entity(*id)?;
            self.expired_total += 1;
        }
        if !entities.is_empty() {
            debug!("expired {} entities", entities.len());
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
