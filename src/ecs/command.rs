//! Deferred world mutations

use std::collections::VecDeque;
use std::fmt;

use super::{Component, EcsError, Entity, EntityId};

type EditFn = Box<dyn FnOnce(&mut Entity) -> Result<(), EcsError> + Send>;

/// A mutation waiting for the next flush point of the world.
pub enum Command {
    AddEntity(Entity),
    RemoveEntity(EntityId),
    Edit { entity: EntityId, label: &'static str, edit: EditFn },
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddEntity(entity) => f.debug_tuple("AddEntity").field(&entity.id()).finish(),
            Command::RemoveEntity(id) => f.debug_tuple("RemoveEntity").field(id).finish(),
            Command::Edit { entity, label, .. } => f
                .debug_struct("Edit")
                .field("entity", entity)
                .field("label", label)
                .finish(),
        }
    }
}

/// FIFO of deferred mutations owned by the [`World`](super::World).
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.pending.push_back(Command::AddEntity(entity));
        id
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        self.pending.push_back(Command::RemoveEntity(id));
    }

    pub fn insert<T: Component>(&mut self, entity: EntityId, component: T) {
        self.pending.push_back(Command::Edit {
            entity,
            label: "insert",
            edit: Box::new(move |target: &mut Entity| target.add_component(component).map(|_| ())),
        });
    }

    pub fn remove<T: Component>(&mut self, entity: EntityId) {
        self.pending.push_back(Command::Edit {
            entity,
            label: "remove",
            edit: Box::new(|target: &mut Entity| target.remove_component::<T>().map(|_| ())),
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub(crate) fn drain(&mut self) -> Vec<Command> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;
    impl Component for Marker {}

    #[test]
    fn test_commands_keep_fifo_order() {
        let mut queue = CommandQueue::new();
        let entity = Entity::new();
        let id = queue.add_entity(entity);
        queue.insert(id, Marker);
        queue.remove_entity(id);

        let commands = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], Command::AddEntity(ref e) if e.id() == id));
        assert!(matches!(commands[1], Command::Edit { label: "insert", .. }));
        assert!(matches!(commands[2], Command::RemoveEntity(removed) if removed == id));
    }
}
