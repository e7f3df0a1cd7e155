//! # Resource Model
//!
//! Static configuration model for talis inbound provisioning: which external
//! resources exist, how each one binds entity types to external object
//! classes, and how individual attributes correspond.
//!
//! The tree is `Resource` → `Provision` → `Mapping` → `MappingItem`. It is
//! authored by administrative operations outside this crate and consumed
//! read-only by the correlation engine; a loaded snapshot is safe to share
//! across synchronization workers without locking.
//!
//! External connector records are represented by [`ExternalObject`], an
//! attribute-name to value-sequence bag.

pub mod ids;
pub mod object;
pub mod resource;
pub mod types;

pub use ids::{ConnectorId, EntityKey, ResourceKey};
pub use object::{AttributeValue, ExternalObject};
pub use resource::{Mapping, MappingItem, ModelError, Provision, Resource};
pub use types::{EntityType, MappingItemKind, MappingPurpose};

/// Prelude module for convenient imports.
///
/// ```
/// use talis_model::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ids::{ConnectorId, EntityKey, ResourceKey};
    pub use crate::object::{AttributeValue, ExternalObject};
    pub use crate::resource::{Mapping, MappingItem, ModelError, Provision, Resource};
    pub use crate::types::{EntityType, MappingItemKind, MappingPurpose};
}
