//! External resource configuration: Resource, Provision, Mapping and
//! MappingItem.
//!
//! These records are authored through administrative operations elsewhere and
//! are strictly read-only inputs to the correlation engine. Nothing in this
//! crate mutates them after load, so a snapshot can be shared across sync
//! workers without locking.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::ids::{ConnectorId, ResourceKey};
use crate::types::{EntityType, MappingItemKind, MappingPurpose};

/// Error raised while assembling a resource model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A resource may carry at most one provision per entity type.
    #[error("resource '{resource}' already has a provision for entity type {entity_type}")]
    DuplicateProvision {
        resource: ResourceKey,
        entity_type: EntityType,
    },
}

/// An external resource: one connected identity source or target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique key of this resource.
    pub key: ResourceKey,

    /// The connector configuration this resource is served by.
    pub connector: ConnectorId,

    /// Provisions owned by this resource, at most one per entity type.
    provisions: Vec<Provision>,
}

impl Resource {
    /// Create a resource with no provisions.
    pub fn new(key: impl Into<ResourceKey>, connector: ConnectorId) -> Self {
        Self {
            key: key.into(),
            connector,
            provisions: Vec::new(),
        }
    }

    /// Add a provision, enforcing at most one per entity type.
    pub fn add_provision(
        &mut self,
        entity_type: EntityType,
        object_class: impl Into<String>,
        mapping: Mapping,
    ) -> Result<(), ModelError> {
        if self.provision(entity_type).is_some() {
            return Err(ModelError::DuplicateProvision {
                resource: self.key.clone(),
                entity_type,
            });
        }
        self.provisions.push(Provision {
            resource: self.key.clone(),
            entity_type,
            object_class: object_class.into(),
            mapping,
        });
        Ok(())
    }

    /// Builder-style variant of [`add_provision`](Self::add_provision).
    pub fn with_provision(
        mut self,
        entity_type: EntityType,
        object_class: impl Into<String>,
        mapping: Mapping,
    ) -> Result<Self, ModelError> {
        self.add_provision(entity_type, object_class, mapping)?;
        Ok(self)
    }

    /// Get the provision for an entity type, if configured.
    #[must_use]
    pub fn provision(&self, entity_type: EntityType) -> Option<&Provision> {
        self.provisions.iter().find(|p| p.entity_type == entity_type)
    }

    /// Iterate over all provisions.
    pub fn provisions(&self) -> impl Iterator<Item = &Provision> {
        self.provisions.iter()
    }
}

/// Binding of one internal entity type to one external object class,
/// carrying its own mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provision {
    /// Key of the owning resource, carried for error context.
    pub resource: ResourceKey,

    /// The internal entity type this provision binds.
    pub entity_type: EntityType,

    /// The external object class (e.g. `"inetOrgPerson"`, `"__ACCOUNT__"`).
    pub object_class: String,

    /// The attribute mapping for this binding.
    pub mapping: Mapping,
}

/// Ordered set of mapping items for one provision.
///
/// Exactly one item must be flagged as the connector-object-key item; that
/// invariant is checked by the engine's `MappingIndex`, not at construction,
/// so that partially-edited configuration can still be represented.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mapping {
    /// Optional expression producing the connector object link (e.g. an LDAP
    /// DN template). Evaluated by an external collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_object_link: Option<String>,

    /// The mapping items, in declared order.
    pub items: Vec<MappingItem>,
}

impl Mapping {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping item, preserving declared order.
    #[must_use]
    pub fn with_item(mut self, item: MappingItem) -> Self {
        self.items.push(item);
        self
    }

    /// Set the connector object link expression.
    pub fn with_connector_object_link(mut self, link: impl Into<String>) -> Self {
        self.connector_object_link = Some(link.into());
        self
    }

    /// Iterate over items in declared order.
    pub fn items(&self) -> impl Iterator<Item = &MappingItem> {
        self.items.iter()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the mapping has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One field-level correspondence between an internal schema and an external
/// attribute, scoped by purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingItem {
    /// Item id.
    pub id: Uuid,

    /// Internal schema or field identifier (e.g. `"email"`, `"username"`).
    pub internal_name: String,

    /// External attribute name (e.g. `"mail"`, `"sAMAccountName"`).
    pub external_name: String,

    /// Kind of internal field addressed.
    pub kind: MappingItemKind,

    /// Direction(s) this item applies to.
    pub purpose: MappingPurpose,

    /// Whether the internal field holds multiple values.
    #[serde(default)]
    pub multivalue: bool,

    /// Boolean expression deciding whether a value is mandatory, evaluated
    /// by an external collaborator. Defaults to `"false"`.
    #[serde(default = "default_mandatory_condition")]
    pub mandatory_condition: String,

    /// Whether this item is the connector-object-key item: the external
    /// unique identifier for the object class.
    #[serde(default)]
    pub connector_object_key: bool,
}

fn default_mandatory_condition() -> String {
    "false".to_string()
}

impl MappingItem {
    /// Create a plain-schema item applying to both directions.
    pub fn new(internal_name: impl Into<String>, external_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            internal_name: internal_name.into(),
            external_name: external_name.into(),
            kind: MappingItemKind::PlainSchema,
            purpose: MappingPurpose::Both,
            multivalue: false,
            mandatory_condition: default_mandatory_condition(),
            connector_object_key: false,
        }
    }

    /// Set the item kind.
    #[must_use]
    pub fn with_kind(mut self, kind: MappingItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the purpose.
    #[must_use]
    pub fn with_purpose(mut self, purpose: MappingPurpose) -> Self {
        self.purpose = purpose;
        self
    }

    /// Mark the internal field as multivalued.
    #[must_use]
    pub fn multivalued(mut self, multivalue: bool) -> Self {
        self.multivalue = multivalue;
        self
    }

    /// Set the mandatory condition expression.
    pub fn with_mandatory_condition(mut self, condition: impl Into<String>) -> Self {
        self.mandatory_condition = condition.into();
        self
    }

    /// Flag this item as the connector-object-key item.
    #[must_use]
    pub fn as_connector_object_key(mut self) -> Self {
        self.connector_object_key = true;
        self
    }
}
