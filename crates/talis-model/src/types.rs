//! Enumerations shared across the mapping model.

use serde::{Deserialize, Serialize};

/// Kind of internal entity a provision binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A person identity.
    User,
    /// A group of identities.
    Group,
    /// Any other configured entity type (printer, service account, ...).
    AnyObject,
}

impl EntityType {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "user",
            EntityType::Group => "group",
            EntityType::AnyObject => "any_object",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(EntityType::User),
            "group" => Ok(EntityType::Group),
            "any_object" => Ok(EntityType::AnyObject),
            _ => Err(format!("Unknown entity type: {s}")),
        }
    }
}

/// Purpose a mapping item serves.
///
/// Filtering by purpose decides which items participate in inbound
/// synchronization versus outbound propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingPurpose {
    /// Inbound only: external system to internal entities.
    Synchronization,
    /// Outbound only: internal entities to the external system.
    Propagation,
    /// Both directions.
    Both,
    /// Configured but inactive in either direction.
    None,
}

impl MappingPurpose {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingPurpose::Synchronization => "synchronization",
            MappingPurpose::Propagation => "propagation",
            MappingPurpose::Both => "both",
            MappingPurpose::None => "none",
        }
    }

    /// Check if this purpose applies to inbound synchronization.
    #[must_use]
    pub fn includes_synchronization(&self) -> bool {
        matches!(self, MappingPurpose::Synchronization | MappingPurpose::Both)
    }

    /// Check if this purpose applies to outbound propagation.
    #[must_use]
    pub fn includes_propagation(&self) -> bool {
        matches!(self, MappingPurpose::Propagation | MappingPurpose::Both)
    }
}

impl std::fmt::Display for MappingPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MappingPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "synchronization" => Ok(MappingPurpose::Synchronization),
            "propagation" => Ok(MappingPurpose::Propagation),
            "both" => Ok(MappingPurpose::Both),
            "none" => Ok(MappingPurpose::None),
            _ => Err(format!("Unknown mapping purpose: {s}")),
        }
    }
}

/// Kind of internal field a mapping item corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingItemKind {
    /// The entity's own key.
    EntityKey,
    /// The username of a user entity.
    Username,
    /// The name of a group or any-object entity.
    Name,
    /// A plain schema attribute stored as-is.
    PlainSchema,
    /// A schema attribute derived from other attributes.
    DerivedSchema,
    /// A schema attribute resolved live from another source.
    VirtualSchema,
    /// The entity's password.
    Password,
}

impl MappingItemKind {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingItemKind::EntityKey => "entity_key",
            MappingItemKind::Username => "username",
            MappingItemKind::Name => "name",
            MappingItemKind::PlainSchema => "plain_schema",
            MappingItemKind::DerivedSchema => "derived_schema",
            MappingItemKind::VirtualSchema => "virtual_schema",
            MappingItemKind::Password => "password",
        }
    }

    /// Check if this kind addresses an entity-level field rather than a
    /// schema attribute.
    #[must_use]
    pub fn is_entity_field(&self) -> bool {
        matches!(
            self,
            MappingItemKind::EntityKey
                | MappingItemKind::Username
                | MappingItemKind::Name
                | MappingItemKind::Password
        )
    }
}

impl std::fmt::Display for MappingItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MappingItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entity_key" => Ok(MappingItemKind::EntityKey),
            "username" => Ok(MappingItemKind::Username),
            "name" => Ok(MappingItemKind::Name),
            "plain_schema" => Ok(MappingItemKind::PlainSchema),
            "derived_schema" => Ok(MappingItemKind::DerivedSchema),
            "virtual_schema" => Ok(MappingItemKind::VirtualSchema),
            "password" => Ok(MappingItemKind::Password),
            _ => Err(format!("Unknown mapping item kind: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_roundtrip() {
        for ty in [EntityType::User, EntityType::Group, EntityType::AnyObject] {
            let parsed: EntityType = ty.as_str().parse().unwrap();
            assert_eq!(ty, parsed);
        }
    }

    #[test]
    fn test_purpose_includes() {
        assert!(MappingPurpose::Synchronization.includes_synchronization());
        assert!(!MappingPurpose::Synchronization.includes_propagation());
        assert!(MappingPurpose::Propagation.includes_propagation());
        assert!(!MappingPurpose::Propagation.includes_synchronization());
        assert!(MappingPurpose::Both.includes_synchronization());
        assert!(MappingPurpose::Both.includes_propagation());
        assert!(!MappingPurpose::None.includes_synchronization());
        assert!(!MappingPurpose::None.includes_propagation());
    }

    #[test]
    fn test_purpose_roundtrip() {
        for purpose in [
            MappingPurpose::Synchronization,
            MappingPurpose::Propagation,
            MappingPurpose::Both,
            MappingPurpose::None,
        ] {
            let parsed: MappingPurpose = purpose.as_str().parse().unwrap();
            assert_eq!(purpose, parsed);
        }
    }

    #[test]
    fn test_purpose_invalid() {
        let result: Result<MappingPurpose, _> = "sideways".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_item_kind_entity_field() {
        assert!(MappingItemKind::EntityKey.is_entity_field());
        assert!(MappingItemKind::Username.is_entity_field());
        assert!(!MappingItemKind::PlainSchema.is_entity_field());
        assert!(!MappingItemKind::DerivedSchema.is_entity_field());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&MappingPurpose::Synchronization).unwrap();
        assert_eq!(json, "\"synchronization\"");
        let json = serde_json::to_string(&MappingItemKind::PlainSchema).unwrap();
        assert_eq!(json, "\"plain_schema\"");
    }
}
