//! Domain Layer - Core Entity Trait
//!
//! Every server-backed entity carries an optional identifier: optimistic
//! placeholders exist locally before the backend has assigned one.

/// Core trait for server-backed entities
pub trait Entity: Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Display;

    /// Returns the server-assigned identifier, if any
    fn id(&self) -> Option<Self::Id>;

    /// Whether the backend has confirmed this entity yet
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

/// Find the position of the entity with the given id
pub fn position_by_id<T: Entity>(entities: &[T], id: T::Id) -> Option<usize> {
    entities.iter().position(|e| e.id() == Some(id))
}
