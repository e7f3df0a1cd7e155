//! # Correlation Engine
//!
//! Attribute mapping and identity correlation for inbound provisioning.
//!
//! For every object an external connector surfaces, this crate answers two
//! questions: which of the object's attributes correspond to which internal
//! fields, filtered by the purpose a mapping item serves; and which internal
//! entities (if any) the object corresponds to, expressed as a structured
//! query predicate handed to an external entity-search collaborator.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐   items_for_purpose    ┌──────────────┐
//! │ MappingIndex   │───────────────────────►│ ValueCodec   │
//! │ (over mapping) │                        │              │
//! └───────┬────────┘                        └──────────────┘
//!         │ sync items
//!         ▼
//! ┌────────────────┐   Predicate            ┌──────────────┐
//! │ CorrelationRule│───────────────────────►│ EntityFinder │──► entity keys
//! │ (per provision)│                        │ (external)   │
//! └────────────────┘                        └──────────────┘
//! ```
//!
//! Everything here is pure, in-memory and CPU-bound: no I/O, no blocking, no
//! internal locking. Configuration snapshots are read-only; rules are
//! immutable and safe to reuse across concurrent workers. Failures surface
//! immediately to the caller; retry policy belongs to the layer that owns
//! I/O.
//!
//! ## Example
//!
//! ```
//! use talis_model::prelude::*;
//! use talis_correlation::prelude::*;
//!
//! let mapping = Mapping::new()
//!     .with_item(
//!         MappingItem::new("username", "uid")
//!             .with_kind(MappingItemKind::Username)
//!             .as_connector_object_key(),
//!     )
//!     .with_item(MappingItem::new("email", "mail"));
//!
//! let resource = Resource::new("ldap-hq", ConnectorId::new())
//!     .with_provision(EntityType::User, "inetOrgPerson", mapping)
//!     .unwrap();
//! let provision = resource.provision(EntityType::User).unwrap();
//!
//! let rule = AttributeCorrelationRule::new(["username"], provision).unwrap();
//! let object = ExternalObject::new().with("uid", ["jdoe"]);
//!
//! let predicate = rule.predicate(&object).unwrap().unwrap();
//! assert_eq!(predicate, Predicate::entity_eq("username", "jdoe"));
//! ```

pub mod codec;
pub mod error;
pub mod finder;
pub mod index;
pub mod predicate;
pub mod rule;

pub use codec::{ConditionEvaluator, InternalValue, LiteralConditionEvaluator, ValueCodec};
pub use error::{CorrelationError, CorrelationResult};
pub use finder::{
    CorrelationOutcome, Correlator, EntityFinder, EntityRecord, InMemoryEntityFinder,
};
pub use index::MappingIndex;
pub use predicate::{Comparison, Condition, Predicate};
pub use rule::{
    build_rule, is_entity_field, AttributeCorrelationRule, CorrelationRule, CorrelationRuleSpec,
};

/// Prelude module for convenient imports.
///
/// ```
/// use talis_correlation::prelude::*;
/// ```
pub mod prelude {
    pub use crate::codec::{
        ConditionEvaluator, InternalValue, LiteralConditionEvaluator, ValueCodec,
    };
    pub use crate::error::{CorrelationError, CorrelationResult};
    pub use crate::finder::{
        CorrelationOutcome, Correlator, EntityFinder, EntityRecord, InMemoryEntityFinder,
    };
    pub use crate::index::MappingIndex;
    pub use crate::predicate::{Comparison, Condition, Predicate};
    pub use crate::rule::{
        build_rule, AttributeCorrelationRule, CorrelationRule, CorrelationRuleSpec,
    };
}
