use std::any::Any;

use anyhow::Result;

use crate::{
    components::{Transform, Velocity},
    ecs::{Entity, EntityId, LoopPhase, System, World},
};

/// Integrates [`Velocity`] into [`Transform`].
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn loop_phase(&self) -> LoopPhase {
        LoopPhase::Update
    }

    fn matches(&self, entity: &Entity) -> bool {
        entity.contains_component::<Transform>() && entity.contains_component::<Velocity>()
    }

    fn process(&mut self, entities: &[EntityId], world: &mut World) -> Result<()> {
        let dt = world.clock().delta_seconds;
        for id in entities {
            let entity = world.entity_mut(*id)?;
            let velocity = *entity.get_component::<Velocity>()?;
            let transform = entity.get_component_mut::<Transform>()?;
            transform.position[0] += velocity.linear[0] * dt;
            transform.position[1] += velocity.linear[1] * dt;
            transform.rotation += velocity.angular * dt;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_by_velocity() {
        let mut world = World::new();
        let moving = world
            .add_entity(
                Entity::new()
                    .with_component(Transform::at(1.0, 1.0))
                    .unwrap()
                    .with_component(Velocity {
                        linear: [2.0, -4.0],
                        angular: 1.0,
                    })
                    .unwrap(),
            )
            .unwrap();
        let still = world
            .add_entity(Entity::new().with_component(Transform::at(5.0, 5.0)).unwrap())
            .unwrap();
        world.add_system(MovementSystem::new());

        world.advance_clock(0.5);
        world.process_all(LoopPhase::Update).unwrap();

        let transform = world.get_component::<Transform>(moving).unwrap();
        assert_eq!(transform.position, [2.0, -1.0]);
        assert_eq!(transform.rotation, 0.5);
        assert_eq!(world.get_component::<Transform>(still).unwrap().position, [5.0, 5.0]);
    }
}
