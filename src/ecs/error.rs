//! Contract violations raised by the ECS core

use thiserror::Error;

use super::EntityId;

/// Errors returned by entity, component and world operations.
///
/// All of them describe a caller breaking the ECS contract, so they are
/// propagated unchanged instead of being retried or ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("entity {0} is already live in this world")]
    DuplicateEntity(EntityId),
    #[error("entity {0} is not live in this world")]
    EntityNotFound(EntityId),
    #[error("component `{component}` is already attached")]
    DuplicateComponent { component: &'static str },
    #[error("component `{component}` is not attached")]
    ComponentNotFound { component: &'static str },
}

impl EcsError {
    pub(crate) fn duplicate_component<T: ?Sized>() -> Self {
        EcsError::DuplicateComponent {
            component: std::any::type_name::<T>(),
        }
    }

    pub(crate) fn component_not_found<T: ?Sized>() -> Self {
        EcsError::ComponentNotFound {
            component: std::any::type_name::<T>(),
        }
    }
}
