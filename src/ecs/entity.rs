//! Entity identity and the component façade around it

use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

use super::{Component, ComponentStore, EcsError};

/// Process-unique entity identifier backed by a random 128-bit UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_raw(raw: u128) -> Self {
        Self(Uuid::from_u128(raw))
    }

    pub fn raw(self) -> u128 {
        self.0.as_u128()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identity plus the components attached to it.
///
/// Entities are created on their own and only become visible to systems
/// once handed to [`World::add_entity`](super::World::add_entity).
/// Two entities compare equal when their ids match, whatever their
/// components hold.
pub struct Entity {
    id: EntityId,
    tag: Option<String>,
    components: ComponentStore,
}

impl Entity {
    pub fn new() -> Self {
        Self::with_id(EntityId::new())
    }

    pub fn with_id(id: EntityId) -> Self {
        Self {
            id,
            tag: None,
            components: ComponentStore::new(),
        }
    }

    pub fn with_tag(tag: impl Into<String>) -> Self {
        let mut entity = Self::new();
        entity.tag = Some(tag.into());
        entity
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    /// Builder-style variant of [`Entity::add_component`] for setup code.
    pub fn with_component<T: Component>(mut self, component: T) -> Result<Self, EcsError> {
        self.components.add(component)?;
        Ok(self)
    }

    pub fn add_component<T: Component>(&mut self, component: T) -> Result<&mut T, EcsError> {
        self.components.add(component)
    }

    pub fn add_default_component<T: Component + Default>(&mut self) -> Result<&mut T, EcsError> {
        self.components.add_default::<T>()
    }

    pub fn get_component<T: Component>(&self) -> Result<&T, EcsError> {
        self.components.get::<T>()
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Result<&mut T, EcsError> {
        self.components.get_mut::<T>()
    }

    pub fn try_get_component<T: Component>(&self) -> Option<&T> {
        self.components.try_get::<T>()
    }

    pub fn try_get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.try_get_mut::<T>()
    }

    pub fn contains_component<T: Component>(&self) -> bool {
        self.components.contains::<T>()
    }

    pub fn remove_component<T: Component>(&mut self) -> Result<T, EcsError> {
        self.components.remove::<T>()
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("components", &self.components.type_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Transform {
        x: f32,
        y: f32,
    }
    impl Component for Transform {}

    #[test]
    fn test_entity_ids_are_unique() {
        let ids: HashSet<EntityId> = (0..1_000).map(|_| Entity::new().id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_id_is_stable() {
        let mut entity = Entity::new();
        let id = entity.id();
        entity.add_component(Transform { x: 0.0, y: 0.0 }).unwrap();
        entity.set_tag(Some("player".into()));
        assert_eq!(entity.id(), id);
    }

    #[test]
    fn test_equality_uses_id_only() {
        let id = EntityId::from_raw(42);
        let mut a = Entity::with_id(id);
        let b = Entity::with_id(id);
        a.add_component(Transform { x: 1.0, y: 1.0 }).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, Entity::new());
        assert_eq!(id.raw(), 42);
    }

    #[test]
    fn test_component_round_trip() {
        let mut entity = Entity::with_tag("crate");
        let value = Transform { x: 3.0, y: -1.0 };

        entity.add_component(value.clone()).unwrap();
        assert!(entity.contains_component::<Transform>());
        assert_eq!(entity.get_component::<Transform>().unwrap(), &value);

        entity.remove_component::<Transform>().unwrap();
        assert!(!entity.contains_component::<Transform>());
        assert!(entity.try_get_component::<Transform>().is_none());
        assert_eq!(entity.tag(), Some("crate"));
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut entity = Entity::new()
            .with_component(Transform { x: 1.0, y: 2.0 })
            .unwrap();

        let err = entity
            .add_component(Transform { x: 9.0, y: 9.0 })
            .unwrap_err();

        assert!(matches!(err, EcsError::DuplicateComponent { .. }));
        assert_eq!(
            entity.get_component::<Transform>().unwrap(),
            &Transform { x: 1.0, y: 2.0 }
        );
    }
}
