//! Correlation rules: locating internal entities for an external object.
//!
//! A rule is a stateless, immutable function object built once per
//! provision and reused for every object of a synchronization run. The
//! concrete strategy is selected from configuration at construction time
//! through [`CorrelationRuleSpec`] and [`build_rule`]; callers only ever see
//! the [`CorrelationRule`] capability.

use serde::{Deserialize, Serialize};
use tracing::debug;

use talis_model::{
    AttributeValue, EntityType, ExternalObject, Provision, ResourceKey,
};

use crate::error::{object_label, CorrelationError, CorrelationResult};
use crate::index::MappingIndex;
use crate::predicate::{Condition, Predicate};

/// Identity field names that route to entity-level conditions instead of
/// the schema attribute space. Users correlate on key/username, groups on
/// key/name; the union is compared case-insensitively.
const ENTITY_FIELDS: [&str; 3] = ["key", "username", "name"];

/// Check whether a schema name addresses an entity identity field.
#[must_use]
pub fn is_entity_field(schema: &str) -> bool {
    ENTITY_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(schema))
}

/// Capability of turning an external object into a search predicate.
///
/// `Ok(None)` is the explicit "no correlation configured" sentinel; it is
/// not a predicate that matches nothing, and callers must branch on it.
pub trait CorrelationRule: Send + Sync {
    /// Build the predicate locating the internal entities corresponding to
    /// the given external object.
    fn predicate(&self, object: &ExternalObject) -> CorrelationResult<Option<Predicate>>;

    /// The entity type this rule correlates.
    fn entity_type(&self) -> EntityType;
}

/// One correlation schema resolved to its external attribute name.
#[derive(Debug, Clone)]
struct SchemaBinding {
    schema: String,
    external_name: String,
}

/// Attribute-based correlation: compare a configured, ordered list of
/// internal schemas against the external object's attributes.
#[derive(Debug, Clone)]
pub struct AttributeCorrelationRule {
    resource: ResourceKey,
    entity_type: EntityType,
    bindings: Vec<SchemaBinding>,
}

impl AttributeCorrelationRule {
    /// Build a rule for the given schemas over a provision's mapping.
    ///
    /// Each schema is resolved to its external attribute name once, here,
    /// through the provision's synchronization-scoped mapping items. A
    /// schema without such an item is a configuration error: silently
    /// skipping it would make correlation unsound.
    pub fn new<I, S>(schemas: I, provision: &Provision) -> CorrelationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = MappingIndex::new(provision);
        let mut bindings = Vec::new();

        for schema in schemas {
            let schema = schema.into();
            let item = index.sync_item_for_schema(&schema).ok_or_else(|| {
                CorrelationError::configuration(
                    &provision.resource,
                    provision.entity_type,
                    format!("correlation schema '{schema}' is not mapped for synchronization"),
                )
            })?;
            bindings.push(SchemaBinding {
                schema,
                external_name: item.external_name.clone(),
            });
        }

        debug!(
            resource = %provision.resource,
            entity_type = %provision.entity_type,
            schemas = bindings.len(),
            "attribute correlation rule built"
        );

        Ok(Self {
            resource: provision.resource.clone(),
            entity_type: provision.entity_type,
            bindings,
        })
    }

    /// The configured correlation schema names, in declared order.
    pub fn schemas(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.schema.as_str())
    }

    fn leaf_for(&self, binding: &SchemaBinding, values: &[AttributeValue]) -> Predicate {
        let condition = if values.is_empty() || (values.len() == 1 && values[0].is_null()) {
            Condition::is_null(&binding.schema)
        } else if values.len() == 1 {
            Condition::equals(&binding.schema, values[0].to_string())
        } else {
            // multi-value comparison is a literal, order-sensitive match
            // against the sequence rendering
            Condition::equals(&binding.schema, AttributeValue::sequence_expression(values))
        };

        if is_entity_field(&binding.schema) {
            Predicate::Entity(condition)
        } else {
            Predicate::Attribute(condition)
        }
    }
}

impl CorrelationRule for AttributeCorrelationRule {
    fn predicate(&self, object: &ExternalObject) -> CorrelationResult<Option<Predicate>> {
        if self.bindings.is_empty() {
            return Ok(None);
        }

        let mut predicate: Option<Predicate> = None;
        for binding in &self.bindings {
            let values = object.get(&binding.external_name).ok_or_else(|| {
                CorrelationError::MissingAttribute {
                    resource: self.resource.clone(),
                    entity_type: self.entity_type,
                    schema: binding.schema.clone(),
                    external_attribute: binding.external_name.clone(),
                    object: object_label(object),
                }
            })?;

            let leaf = self.leaf_for(binding, values);
            predicate = Some(match predicate {
                Some(acc) => acc.and(leaf),
                None => leaf,
            });
        }

        debug!(
            resource = %self.resource,
            entity_type = %self.entity_type,
            object = %object_label(object),
            predicate = %predicate.as_ref().map(ToString::to_string).unwrap_or_default(),
            "correlation predicate assembled"
        );

        Ok(predicate)
    }

    fn entity_type(&self) -> EntityType {
        self.entity_type
    }
}

/// Configured correlation strategy for one provision.
///
/// New strategies are added as variants here and resolved by
/// [`build_rule`]; call sites stay on the [`CorrelationRule`] trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum CorrelationRuleSpec {
    /// Correlate on the listed internal schema names, in order.
    PlainAttributes {
        /// Internal schema names to correlate on.
        schemas: Vec<String>,
    },
}

/// Resolve a rule spec into a concrete rule for a provision.
pub fn build_rule(
    spec: &CorrelationRuleSpec,
    provision: &Provision,
) -> CorrelationResult<Box<dyn CorrelationRule>> {
    match spec {
        CorrelationRuleSpec::PlainAttributes { schemas } => Ok(Box::new(
            AttributeCorrelationRule::new(schemas.iter().cloned(), provision)?,
        )),
    }
}
