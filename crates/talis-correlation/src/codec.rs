//! Conversion between external value sequences and internal values.

use tracing::warn;

use talis_model::{AttributeValue, ExternalObject, MappingItem};

use crate::error::{object_label, CorrelationError, CorrelationResult};

/// An internal semantic value resolved from an external attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum InternalValue {
    /// A single value.
    Single(AttributeValue),
    /// The full value sequence of a multivalued field.
    Multi(Vec<AttributeValue>),
}

impl InternalValue {
    /// Textual form used in predicate expressions.
    #[must_use]
    pub fn expression(&self) -> String {
        match self {
            InternalValue::Single(value) => value.to_string(),
            InternalValue::Multi(values) => AttributeValue::sequence_expression(values),
        }
    }
}

/// Evaluator for a mapping item's mandatory-condition expression.
///
/// Condition expressions are opaque to this crate; an external collaborator
/// owns their syntax and evaluation. Closures `Fn(&str) -> bool` implement
/// the trait directly, which keeps tests light.
pub trait ConditionEvaluator {
    /// Evaluate a boolean condition expression.
    fn evaluate(&self, expression: &str) -> CorrelationResult<bool>;
}

impl<F> ConditionEvaluator for F
where
    F: Fn(&str) -> bool,
{
    fn evaluate(&self, expression: &str) -> CorrelationResult<bool> {
        Ok(self(expression))
    }
}

/// Evaluator accepting only the literal expressions `"true"` and `"false"`.
///
/// Matches the configuration default; anything else requires a real
/// expression engine on the caller's side.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralConditionEvaluator;

impl ConditionEvaluator for LiteralConditionEvaluator {
    fn evaluate(&self, expression: &str) -> CorrelationResult<bool> {
        match expression.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(CorrelationError::condition(
                other,
                "only literal true/false conditions are supported without an expression engine",
            )),
        }
    }
}

/// Stateless codec between external value sequences and internal values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCodec;

impl ValueCodec {
    /// Resolve an external attribute's value sequence into an internal
    /// value, honoring the item's multivalue declaration.
    ///
    /// Single-valued items take the first element; an empty sequence or a
    /// leading null placeholder resolves to `None`. Multivalued items yield
    /// the full sequence; an empty sequence resolves to `None`. No type
    /// coercion happens beyond the declared kind.
    #[must_use]
    pub fn external_to_internal(
        item: &MappingItem,
        values: &[AttributeValue],
    ) -> Option<InternalValue> {
        if item.multivalue {
            if values.is_empty() {
                None
            } else {
                Some(InternalValue::Multi(values.to_vec()))
            }
        } else {
            match values.first() {
                None | Some(AttributeValue::Null) => None,
                Some(value) => Some(InternalValue::Single(value.clone())),
            }
        }
    }

    /// Enforce the item's mandatory condition against a resolved value.
    ///
    /// An absent value combined with a condition evaluating true is a
    /// [`CorrelationError::MandatoryViolation`]; everything else passes.
    /// Evaluation is delegated to the collaborator and its failures are
    /// surfaced, not swallowed.
    pub fn check_mandatory<E: ConditionEvaluator + ?Sized>(
        item: &MappingItem,
        resolved: Option<&InternalValue>,
        object: &ExternalObject,
        evaluator: &E,
    ) -> CorrelationResult<()> {
        if resolved.is_some() {
            return Ok(());
        }
        if evaluator.evaluate(&item.mandatory_condition)? {
            warn!(
                internal_name = %item.internal_name,
                external_name = %item.external_name,
                object = %object_label(object),
                "mandatory attribute resolved to no value"
            );
            return Err(CorrelationError::MandatoryViolation {
                internal_name: item.internal_name.clone(),
                external_attribute: item.external_name.clone(),
                object: object_label(object),
            });
        }
        Ok(())
    }
}
