//! Correlation error types.
//!
//! Three kinds matter to callers: configuration errors are fatal to rule
//! construction and never retried; missing-attribute and mandatory-violation
//! errors are per-object and leave the rest of the synchronization batch to
//! the driver. This layer performs no recovery, defaulting or retries.

use thiserror::Error;

use talis_model::{EntityType, ExternalObject, ResourceKey};

/// Diagnostic label for an external object: its connector uid when known.
pub(crate) fn object_label(object: &ExternalObject) -> String {
    object
        .uid
        .clone()
        .unwrap_or_else(|| "<unidentified>".to_string())
}

/// Error raised by the mapping index, the value codec or a correlation rule.
#[derive(Debug, Error)]
pub enum CorrelationError {
    /// A structural invariant of the configuration is violated.
    #[error("invalid configuration for resource '{resource}' ({entity_type}): {message}")]
    Configuration {
        resource: ResourceKey,
        entity_type: EntityType,
        message: String,
    },

    /// A configured correlation schema has no corresponding attribute in a
    /// given external object.
    #[error(
        "external object {object} has no attribute '{external_attribute}' \
         required to correlate on schema '{schema}'"
    )]
    MissingAttribute {
        resource: ResourceKey,
        entity_type: EntityType,
        schema: String,
        external_attribute: String,
        object: String,
    },

    /// A mandatory mapping item resolved to no value.
    #[error(
        "mandatory attribute '{internal_name}' (external '{external_attribute}') \
         has no value on object {object}"
    )]
    MandatoryViolation {
        internal_name: String,
        external_attribute: String,
        object: String,
    },

    /// The external condition evaluator collaborator failed.
    #[error("condition '{expression}' could not be evaluated: {message}")]
    Condition { expression: String, message: String },

    /// The entity finder collaborator failed.
    #[error("entity search failed: {message}")]
    Finder { message: String },
}

impl CorrelationError {
    /// Create a configuration error.
    pub fn configuration(
        resource: &ResourceKey,
        entity_type: EntityType,
        message: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            resource: resource.clone(),
            entity_type,
            message: message.into(),
        }
    }

    /// Create a condition evaluation error.
    pub fn condition(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Condition {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Create an entity finder error.
    pub fn finder(message: impl Into<String>) -> Self {
        Self::Finder {
            message: message.into(),
        }
    }

    /// Check if this error is fatal to rule construction rather than scoped
    /// to a single external object.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, CorrelationError::Configuration { .. })
    }

    /// Check if this error is scoped to a single external object; the
    /// driver may skip that object and continue the run.
    #[must_use]
    pub fn is_per_object(&self) -> bool {
        matches!(
            self,
            CorrelationError::MissingAttribute { .. }
                | CorrelationError::MandatoryViolation { .. }
        )
    }
}

/// Result type for correlation operations.
pub type CorrelationResult<T> = Result<T, CorrelationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CorrelationError::configuration(
            &ResourceKey::new("ldap-hq"),
            EntityType::User,
            "no connector object key item",
        );
        assert!(err.to_string().contains("ldap-hq"));
        assert!(err.to_string().contains("no connector object key item"));
    }

    #[test]
    fn test_classification() {
        let config = CorrelationError::configuration(
            &ResourceKey::new("ldap-hq"),
            EntityType::User,
            "bad",
        );
        assert!(config.is_configuration());
        assert!(!config.is_per_object());

        let missing = CorrelationError::MissingAttribute {
            resource: ResourceKey::new("ldap-hq"),
            entity_type: EntityType::User,
            schema: "email".to_string(),
            external_attribute: "mail".to_string(),
            object: "jdoe".to_string(),
        };
        assert!(missing.is_per_object());
        assert!(!missing.is_configuration());

        let violation = CorrelationError::MandatoryViolation {
            internal_name: "email".to_string(),
            external_attribute: "mail".to_string(),
            object: "jdoe".to_string(),
        };
        assert!(violation.is_per_object());

        let condition = CorrelationError::condition("bad syntax(", "parse error");
        assert!(!condition.is_per_object());
        assert!(!condition.is_configuration());
    }
}
