use std::any::Any;
use std::f32::consts::TAU;

use anyhow::{Context, Result};
use log::trace;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::{
    components::{Expires, Range, Spawner, Transform, Velocity},
    ecs::{Entity, EntityId, LoopPhase, System, World},
};

/// Emits short-lived moving entities from every [`Spawner`].
///
/// New entities are added to the world immediately, so systems registered
/// after this one see them in the same pass.
pub struct SpawnerSystem {
    rng: ChaCha8Rng,
    spawned_total: u64,
}

impl SpawnerSystem {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            spawned_total: 0,
        }
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    fn sample(&mut self, range: Range) -> f32 {
        if range.max > range.min {
            self.rng.gen_range(range.min..=range.max)
        } else {
            range.min
        }
    }

    fn emit(&mut self, origin: &Transform, spawner: &Spawner) -> Result<Entity> {
        let heading = self.rng.gen_range(0.0..TAU);
        let speed = self.sample(spawner.speed);
        let lifetime = self.sample(spawner.lifetime);
        let velocity = Velocity::new(heading.cos() * speed, heading.sin() * speed);

        let entity = Entity::new()
            .with_component(Transform {
                position: origin.position,
                rotation: heading,
                scale: origin.scale,
            })?
            .with_component(velocity)?
            .with_component(Expires::after(lifetime))?;
        Ok(entity)
    }
}

impl System for SpawnerSystem {
    fn name(&self) -> &str {
        "spawner"
    }

    fn loop_phase(&self) -> LoopPhase {
        LoopPhase::Update
    }

    fn matches(&self, entity: &Entity) -> bool {
        entity.contains_component::<Spawner>() && entity.contains_component::<Transform>()
    }

    fn process(&mut self, entities: &[EntityId], world: &mut World) -> Result<()> {
        let dt = world.clock().delta_seconds;
        for id in entities {
            let source = world.entity_mut(*id)?;
            let bursts = source.get_component_mut::<Spawner>()?.tick(dt);
            if bursts == 0 {
                continue;
            }
            let spawner = source.get_component::<Spawner>()?.clone();
            let origin = *source.get_component::<Transform>()?;

            let count = bursts.checked_mul(spawner.burst).with_context(|| {
                format!("spawner {id} requested more than {} entities in one frame", u32::MAX)
            })?;
            for _ in 0..count {
                let entity = self.emit(&origin, &spawner)?;
                world.add_entity(entity)?;
            }
            self.spawned_total += u64::from(count);
            trace!("spawner {id} emitted {count} entities");
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
