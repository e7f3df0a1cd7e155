//! Query predicate AST handed to the entity finder.
//!
//! A predicate is built fresh for each correlation call, is immutable, and
//! compares structurally: two calls over the same rule and object yield
//! equal trees. Leaves come in two flavors carrying the same condition
//! shape; entity leaves address identity fields (key, username, name) while
//! attribute leaves address the schema attribute space. Only the routing on
//! the consuming side differs.

use serde::{Deserialize, Serialize};

/// Comparison operator of a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Attribute equals the expression.
    Equals,
    /// Attribute has no value.
    IsNull,
}

/// A leaf condition over one internal schema or identity field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    /// Internal schema or identity field name.
    pub schema: String,

    /// Comparison operator.
    pub comparison: Comparison,

    /// Textual comparison expression; `None` for [`Comparison::IsNull`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl Condition {
    /// Create an equals condition.
    pub fn equals(schema: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            comparison: Comparison::Equals,
            expression: Some(expression.into()),
        }
    }

    /// Create an is-null condition.
    pub fn is_null(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            comparison: Comparison::IsNull,
            expression: None,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.comparison {
            Comparison::Equals => write!(
                f,
                "{}=={}",
                self.schema,
                self.expression.as_deref().unwrap_or("")
            ),
            Comparison::IsNull => write!(f, "{} is null", self.schema),
        }
    }
}

/// A composable query tree consumed by the entity finder collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    /// Condition over an entity identity field (key, username, name).
    Entity(Condition),

    /// Condition over a schema attribute.
    Attribute(Condition),

    /// Conjunction of two predicates.
    And(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// Entity-level equals leaf.
    pub fn entity_eq(schema: impl Into<String>, expression: impl Into<String>) -> Self {
        Predicate::Entity(Condition::equals(schema, expression))
    }

    /// Entity-level is-null leaf.
    pub fn entity_is_null(schema: impl Into<String>) -> Self {
        Predicate::Entity(Condition::is_null(schema))
    }

    /// Attribute-level equals leaf.
    pub fn attr_eq(schema: impl Into<String>, expression: impl Into<String>) -> Self {
        Predicate::Attribute(Condition::equals(schema, expression))
    }

    /// Attribute-level is-null leaf.
    pub fn attr_is_null(schema: impl Into<String>) -> Self {
        Predicate::Attribute(Condition::is_null(schema))
    }

    /// Combine this predicate with another using AND.
    #[must_use]
    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// Iterate over all leaf conditions, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &Condition> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out.into_iter()
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Predicate::Entity(cond) | Predicate::Attribute(cond) => out.push(cond),
            Predicate::And(left, right) => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Entity(cond) | Predicate::Attribute(cond) => write!(f, "{cond}"),
            Predicate::And(left, right) => write!(f, "({left} AND {right})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        let a = Predicate::entity_eq("username", "jdoe").and(Predicate::attr_is_null("email"));
        let b = Predicate::entity_eq("username", "jdoe").and(Predicate::attr_is_null("email"));
        assert_eq!(a, b);

        // leaf flavor participates in equality
        assert_ne!(
            Predicate::entity_eq("username", "jdoe"),
            Predicate::attr_eq("username", "jdoe")
        );
    }

    #[test]
    fn test_leaves_left_to_right() {
        let predicate = Predicate::entity_eq("key", "42")
            .and(Predicate::attr_eq("status", "active"))
            .and(Predicate::attr_is_null("phone"));

        let schemas: Vec<&str> = predicate.leaves().map(|c| c.schema.as_str()).collect();
        assert_eq!(schemas, vec!["key", "status", "phone"]);
    }

    #[test]
    fn test_display() {
        let predicate = Predicate::entity_eq("username", "jdoe").and(Predicate::attr_is_null("email"));
        assert_eq!(predicate.to_string(), "(username==jdoe AND email is null)");
    }

    #[test]
    fn test_serde_tagged() {
        let predicate = Predicate::attr_eq("email", "jdoe@example.com");
        let json = serde_json::to_string(&predicate).unwrap();
        assert!(json.contains("\"type\":\"attribute\""));
        assert!(json.contains("\"comparison\":\"equals\""));

        let parsed: Predicate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, predicate);
    }

    #[test]
    fn test_is_null_has_no_expression() {
        let condition = Condition::is_null("email");
        assert_eq!(condition.comparison, Comparison::IsNull);
        assert!(condition.expression.is_none());

        let json = serde_json::to_string(&condition).unwrap();
        assert!(!json.contains("expression"));
    }
}
