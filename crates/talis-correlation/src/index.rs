//! Purpose-scoped views over a provision's mapping.
//!
//! `MappingIndex` is a borrowed, stateless view: it retains nothing and
//! recomputes from the immutable configuration snapshot on every call, so it
//! is trivially safe under concurrent reads.

use talis_model::{MappingItem, MappingPurpose, Provision};

use crate::error::{CorrelationError, CorrelationResult};

/// Read-only index over one provision's mapping items.
#[derive(Debug, Clone, Copy)]
pub struct MappingIndex<'a> {
    provision: &'a Provision,
}

impl<'a> MappingIndex<'a> {
    /// Create an index over a provision.
    #[must_use]
    pub fn new(provision: &'a Provision) -> Self {
        Self { provision }
    }

    /// The provision under the index.
    #[must_use]
    pub fn provision(&self) -> &'a Provision {
        self.provision
    }

    /// Items whose purpose equals the requested purpose or `Both`, in
    /// declared order. Order carries no semantic weight but is reproducible.
    pub fn items_for_purpose(
        &self,
        purpose: MappingPurpose,
    ) -> impl Iterator<Item = &'a MappingItem> {
        self.provision
            .mapping
            .items()
            .filter(move |item| item.purpose == purpose || item.purpose == MappingPurpose::Both)
    }

    /// The first synchronization-scoped item mapping the given internal
    /// schema name, if any.
    #[must_use]
    pub fn sync_item_for_schema(&self, schema: &str) -> Option<&'a MappingItem> {
        self.provision
            .mapping
            .items()
            .find(|item| item.purpose.includes_synchronization() && item.internal_name == schema)
    }

    /// Check the structural invariant: exactly one item flagged as the
    /// connector-object-key item.
    pub fn validate(&self) -> CorrelationResult<()> {
        self.connector_key_item().map(|_| ())
    }

    /// The single connector-object-key item.
    pub fn connector_key_item(&self) -> CorrelationResult<&'a MappingItem> {
        let mut keys = self
            .provision
            .mapping
            .items()
            .filter(|item| item.connector_object_key);

        match (keys.next(), keys.next()) {
            (Some(item), None) => Ok(item),
            (None, _) => Err(CorrelationError::configuration(
                &self.provision.resource,
                self.provision.entity_type,
                "mapping declares no connector object key item, expected exactly one",
            )),
            (Some(_), Some(_)) => Err(CorrelationError::configuration(
                &self.provision.resource,
                self.provision.entity_type,
                "mapping declares more than one connector object key item, expected exactly one",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talis_model::{
        ConnectorId, EntityType, Mapping, MappingItemKind, Resource,
    };

    fn provision_with(mapping: Mapping) -> Provision {
        let resource = Resource::new("ldap-hq", ConnectorId::new())
            .with_provision(EntityType::User, "inetOrgPerson", mapping)
            .unwrap();
        resource.provision(EntityType::User).unwrap().clone()
    }

    fn valid_mapping() -> Mapping {
        Mapping::new()
            .with_item(
                MappingItem::new("username", "uid")
                    .with_kind(MappingItemKind::Username)
                    .as_connector_object_key(),
            )
            .with_item(
                MappingItem::new("email", "mail").with_purpose(MappingPurpose::Synchronization),
            )
            .with_item(
                MappingItem::new("displayName", "cn").with_purpose(MappingPurpose::Propagation),
            )
            .with_item(MappingItem::new("status", "accountStatus").with_purpose(MappingPurpose::None))
    }

    #[test]
    fn test_items_for_purpose_includes_both() {
        let provision = provision_with(valid_mapping());
        let index = MappingIndex::new(&provision);

        let sync: Vec<&str> = index
            .items_for_purpose(MappingPurpose::Synchronization)
            .map(|i| i.internal_name.as_str())
            .collect();
        assert_eq!(sync, vec!["username", "email"]);

        let prop: Vec<&str> = index
            .items_for_purpose(MappingPurpose::Propagation)
            .map(|i| i.internal_name.as_str())
            .collect();
        assert_eq!(prop, vec!["username", "displayName"]);
    }

    #[test]
    fn test_items_for_purpose_preserves_declared_order() {
        let mapping = Mapping::new()
            .with_item(MappingItem::new("c", "ext-c").as_connector_object_key())
            .with_item(MappingItem::new("a", "ext-a"))
            .with_item(MappingItem::new("b", "ext-b"));
        let provision = provision_with(mapping);
        let index = MappingIndex::new(&provision);

        let order: Vec<&str> = index
            .items_for_purpose(MappingPurpose::Synchronization)
            .map(|i| i.internal_name.as_str())
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_none_purpose_items_never_selected() {
        let provision = provision_with(valid_mapping());
        let index = MappingIndex::new(&provision);

        for purpose in [MappingPurpose::Synchronization, MappingPurpose::Propagation] {
            assert!(index
                .items_for_purpose(purpose)
                .all(|i| i.internal_name != "status"));
        }
    }

    #[test]
    fn test_connector_key_item() {
        let provision = provision_with(valid_mapping());
        let index = MappingIndex::new(&provision);

        assert!(index.validate().is_ok());
        let key = index.connector_key_item().unwrap();
        assert_eq!(key.internal_name, "username");
    }

    #[test]
    fn test_missing_connector_key_fails() {
        let provision = provision_with(Mapping::new().with_item(MappingItem::new("email", "mail")));
        let index = MappingIndex::new(&provision);

        let err = index.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("no connector object key"));
    }

    #[test]
    fn test_duplicate_connector_key_fails() {
        let mapping = Mapping::new()
            .with_item(MappingItem::new("username", "uid").as_connector_object_key())
            .with_item(MappingItem::new("email", "mail").as_connector_object_key());
        let provision = provision_with(mapping);
        let index = MappingIndex::new(&provision);

        let err = index.connector_key_item().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn test_sync_item_for_schema() {
        let provision = provision_with(valid_mapping());
        let index = MappingIndex::new(&provision);

        assert_eq!(index.sync_item_for_schema("email").unwrap().external_name, "mail");
        // propagation-only items are invisible to synchronization
        assert!(index.sync_item_for_schema("displayName").is_none());
        assert!(index.sync_item_for_schema("unknown").is_none());
    }
}
