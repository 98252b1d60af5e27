//! Per-entity component storage keyed by component type

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use super::EcsError;

/// Trait for components
pub trait Component: Any + Send + Sync {}

/// Type-indexed storage holding at most one component per concrete type.
///
/// Every [`Entity`](super::Entity) owns exactly one store.
pub struct ComponentStore {
    components: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    names: HashMap<TypeId, &'static str>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Store `component`, failing if a `T` is already present.
    ///
    /// Returns a mutable reference to the stored instance.
    pub fn add<T: Component>(&mut self, component: T) -> Result<&mut T, EcsError> {
        let type_id = TypeId::of::<T>();
        if self.components.contains_key(&type_id) {
            return Err(EcsError::duplicate_component::<T>());
        }
        self.components.insert(type_id, Box::new(component));
        self.names.insert(type_id, type_name::<T>());
        self.get_mut::<T>()
    }

    /// Store `T::default()`, failing if a `T` is already present.
    pub fn add_default<T: Component + Default>(&mut self) -> Result<&mut T, EcsError> {
        self.add(T::default())
    }

    pub fn get<T: Component>(&self) -> Result<&T, EcsError> {
        self.try_get::<T>()
            .ok_or_else(EcsError::component_not_found::<T>)
    }

    pub fn get_mut<T: Component>(&mut self) -> Result<&mut T, EcsError> {
        self.try_get_mut::<T>()
            .ok_or_else(EcsError::component_not_found::<T>)
    }

    /// Non-failing lookup, meant for predicates.
    pub fn try_get<T: Component>(&self) -> Option<&T> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn try_get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// Detach and return the `T` instance.
    ///
    /// References previously handed out by this store cannot outlive this
    /// call, the borrow checker ends them before it.
    pub fn remove<T: Component>(&mut self) -> Result<T, EcsError> {
        let type_id = TypeId::of::<T>();
        let boxed = self
            .components
            .remove(&type_id)
            .ok_or_else(EcsError::component_not_found::<T>)?;
        self.names.remove(&type_id);
        boxed
            .downcast::<T>()
            .map(|component| *component)
            .map_err(|_| EcsError::component_not_found::<T>())
    }

    pub fn contains<T: Component>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of the attached component types, sorted for stable output.
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.names.values().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}
