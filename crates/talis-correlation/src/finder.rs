//! Entity search contract and correlation driver glue.
//!
//! The real entity finder is an external collaborator (a search service over
//! the entity store). [`InMemoryEntityFinder`] is a reference implementation
//! over plain records: it gives the predicate AST executable semantics and
//! backs the integration tests.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use talis_model::{AttributeValue, EntityKey, EntityType, ExternalObject};

use crate::error::{object_label, CorrelationResult};
use crate::predicate::{Comparison, Condition, Predicate};
use crate::rule::CorrelationRule;

/// Search collaborator locating internal entities by predicate.
pub trait EntityFinder {
    /// Find the keys of all entities of the given type matching the
    /// predicate.
    fn find(
        &self,
        entity_type: EntityType,
        predicate: &Predicate,
    ) -> CorrelationResult<BTreeSet<EntityKey>>;
}

/// An internal entity held by the in-memory finder.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    /// Entity key.
    pub key: EntityKey,
    /// Entity type.
    pub entity_type: EntityType,
    /// Identity fields: `key`, `username`, `name`. Field names are matched
    /// case-insensitively, mirroring entity-level condition routing.
    identity: HashMap<String, String>,
    /// Schema attribute space.
    attributes: HashMap<String, Vec<AttributeValue>>,
}

impl EntityRecord {
    /// Create a record; the `key` identity field is populated from the key.
    pub fn new(entity_type: EntityType, key: impl Into<EntityKey>) -> Self {
        let key = key.into();
        let mut identity = HashMap::new();
        identity.insert("key".to_string(), key.to_string());
        Self {
            key,
            entity_type,
            identity,
            attributes: HashMap::new(),
        }
    }

    /// Set the username identity field.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.identity.insert("username".to_string(), username.into());
        self
    }

    /// Set the name identity field.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.identity.insert("name".to_string(), name.into());
        self
    }

    /// Set a schema attribute's value sequence.
    pub fn with_attr<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    fn identity_field(&self, schema: &str) -> Option<&str> {
        self.identity
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(schema))
            .map(|(_, value)| value.as_str())
    }

    fn matches(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Entity(cond) => self.matches_entity(cond),
            Predicate::Attribute(cond) => self.matches_attribute(cond),
            Predicate::And(left, right) => self.matches(left) && self.matches(right),
        }
    }

    fn matches_entity(&self, cond: &Condition) -> bool {
        let value = self.identity_field(&cond.schema);
        match cond.comparison {
            Comparison::Equals => value == cond.expression.as_deref(),
            Comparison::IsNull => value.is_none(),
        }
    }

    fn matches_attribute(&self, cond: &Condition) -> bool {
        let values = self.attributes.get(&cond.schema);
        let present = values.is_some_and(|v| !v.is_empty() && !(v.len() == 1 && v[0].is_null()));
        match cond.comparison {
            Comparison::IsNull => !present,
            Comparison::Equals => {
                let Some(values) = values.filter(|_| present) else {
                    return false;
                };
                // attribute equality uses the same textual rendering the
                // rule uses when building the predicate
                let rendered = if values.len() == 1 {
                    values[0].to_string()
                } else {
                    AttributeValue::sequence_expression(values)
                };
                cond.expression.as_deref() == Some(rendered.as_str())
            }
        }
    }
}

/// Predicate-evaluating finder over in-memory records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityFinder {
    records: Vec<EntityRecord>,
}

impl InMemoryEntityFinder {
    /// Create an empty finder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record using builder pattern.
    #[must_use]
    pub fn with_record(mut self, record: EntityRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Add a record.
    pub fn add(&mut self, record: EntityRecord) {
        self.records.push(record);
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the finder holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EntityFinder for InMemoryEntityFinder {
    fn find(
        &self,
        entity_type: EntityType,
        predicate: &Predicate,
    ) -> CorrelationResult<BTreeSet<EntityKey>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.entity_type == entity_type && r.matches(predicate))
            .map(|r| r.key.clone())
            .collect())
    }
}

/// Outcome of correlating one external object.
///
/// The sync driver decides what each outcome means (create, update, flag
/// for review); this layer only classifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationOutcome {
    /// No correlation is configured for this provision.
    NoCorrelation,
    /// The predicate matched no internal entity.
    Unmatched,
    /// Exactly one internal entity matched.
    Matched(EntityKey),
    /// More than one internal entity matched, in key order.
    Ambiguous(Vec<EntityKey>),
}

/// Pairs a correlation rule with an entity finder.
pub struct Correlator<'a> {
    rule: &'a dyn CorrelationRule,
    finder: &'a dyn EntityFinder,
}

impl<'a> Correlator<'a> {
    /// Create a correlator.
    pub fn new(rule: &'a dyn CorrelationRule, finder: &'a dyn EntityFinder) -> Self {
        Self { rule, finder }
    }

    /// Correlate one external object and classify the result.
    pub fn correlate(&self, object: &ExternalObject) -> CorrelationResult<CorrelationOutcome> {
        let Some(predicate) = self.rule.predicate(object)? else {
            return Ok(CorrelationOutcome::NoCorrelation);
        };

        let keys = self.finder.find(self.rule.entity_type(), &predicate)?;
        let mut keys = keys.into_iter();
        let outcome = match (keys.next(), keys.next()) {
            (None, _) => CorrelationOutcome::Unmatched,
            (Some(key), None) => CorrelationOutcome::Matched(key),
            (Some(first), Some(second)) => {
                let mut all = vec![first, second];
                all.extend(keys);
                CorrelationOutcome::Ambiguous(all)
            }
        };

        debug!(
            object = %object_label(object),
            entity_type = %self.rule.entity_type(),
            outcome = ?outcome,
            "external object correlated"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder() -> InMemoryEntityFinder {
        InMemoryEntityFinder::new()
            .with_record(
                EntityRecord::new(EntityType::User, "u-1")
                    .with_username("jdoe")
                    .with_attr("email", ["jdoe@example.com"]),
            )
            .with_record(
                EntityRecord::new(EntityType::User, "u-2")
                    .with_username("asmith")
                    .with_attr("email", ["asmith@example.com"])
                    .with_attr("status", ["active", "pending"]),
            )
            .with_record(EntityRecord::new(EntityType::Group, "g-1").with_name("admins"))
    }

    #[test]
    fn test_entity_equals_scoped_by_type() {
        let finder = finder();
        let predicate = Predicate::entity_eq("username", "jdoe");

        let users = finder.find(EntityType::User, &predicate).unwrap();
        assert_eq!(users, BTreeSet::from([EntityKey::new("u-1")]));

        // same predicate against groups matches nothing
        assert!(finder.find(EntityType::Group, &predicate).unwrap().is_empty());
    }

    #[test]
    fn test_entity_name_field_case_insensitive_routing() {
        let finder = finder();
        let predicate = Predicate::entity_eq("Name", "admins");
        let groups = finder.find(EntityType::Group, &predicate).unwrap();
        assert_eq!(groups, BTreeSet::from([EntityKey::new("g-1")]));
    }

    #[test]
    fn test_attribute_is_null_matches_absent_attribute() {
        let finder = finder();
        let predicate = Predicate::attr_is_null("phone");
        let users = finder.find(EntityType::User, &predicate).unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_is_null_matches_null_only_sequence() {
        let finder = InMemoryEntityFinder::new().with_record(
            EntityRecord::new(EntityType::User, "u-9").with_attr("phone", [AttributeValue::Null]),
        );
        let users = finder
            .find(EntityType::User, &Predicate::attr_is_null("phone"))
            .unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_multi_value_equals_is_literal() {
        let finder = finder();

        let hit = finder
            .find(EntityType::User, &Predicate::attr_eq("status", "[active, pending]"))
            .unwrap();
        assert_eq!(hit, BTreeSet::from([EntityKey::new("u-2")]));

        // order-sensitive: reversed rendering does not match
        let miss = finder
            .find(EntityType::User, &Predicate::attr_eq("status", "[pending, active]"))
            .unwrap();
        assert!(miss.is_empty());
    }

    #[test]
    fn test_and_conjunction() {
        let finder = finder();
        let predicate = Predicate::entity_eq("username", "jdoe")
            .and(Predicate::attr_eq("email", "jdoe@example.com"));
        assert_eq!(finder.find(EntityType::User, &predicate).unwrap().len(), 1);

        let contradictory = Predicate::entity_eq("username", "jdoe")
            .and(Predicate::attr_eq("email", "asmith@example.com"));
        assert!(finder
            .find(EntityType::User, &contradictory)
            .unwrap()
            .is_empty());
    }
}
