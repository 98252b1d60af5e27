use std::any::Any;

use anyhow::Result;
use log::trace;
use serde::Serialize;

use crate::{
    components::{Spawner, Transform},
    ecs::{Entity, EntityId, LoopPhase, System, World},
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DrawItem {
    pub position: [f32; 2],
    pub rotation: f32,
    pub scale: f32,
}

/// Render-phase batcher: rebuilds the list of things to draw every frame.
///
/// The batch is flushed even when nothing matched, so a frame with no
/// drawable entities clears what the previous frame left behind.
pub struct DrawListSystem {
    batch: Vec<DrawItem>,
    flushes: u64,
}

impl DrawListSystem {
    pub fn new() -> Self {
        Self {
            batch: Vec::new(),
            flushes: 0,
        }
    }

    /// Draw items of the most recent render pass, in entity order.
    pub fn last_batch(&self) -> &[DrawItem] {
        &self.batch
    }

    pub fn flushes(&self) -> u64 {
        self.flushes
    }
}

impl Default for DrawListSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DrawListSystem {
    fn name(&self) -> &str {
        "draw_list"
    }

    fn loop_phase(&self) -> LoopPhase {
        LoopPhase::Render
    }

    fn matches(&self, entity: &Entity) -> bool {
        entity.contains_component::<Transform>() && !entity.contains_component::<Spawner>()
    }

    fn process(&mut self, entities: &[EntityId], world: &mut World) -> Result<()> {
        self.batch.clear();
        for id in entities {
            let transform = world.get_component::<Transform>(*id)?;
            self.batch.push(DrawItem {
                position: transform.position,
                rotation: transform.rotation,
                scale: transform.scale,
            });
        }
        self.flushes += 1;
        trace!("flushed draw batch of {} items", self.batch.len());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
