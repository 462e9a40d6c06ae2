//! Normalizes a `(redact.custom)` payload into a [`Rule`].
//!
//! The classifier performs the single dispatch over [`RuleValue`]; callers never
//! inspect the payload's branches themselves. Scalar branches are turned into
//! Go literals here. Message and element sub-rules are passed through for the
//! field resolver to pick their action.

use crate::{
    annotation::{FieldRules, MessageRule, RuleValue},
    error::Result,
    literal,
    schema::{Cardinality, ProtoKind},
    validate,
};

/// Whether a rule targets a single value or a whole repeated/map field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleLabel {
    Singular,
    Container,
}

/// A classified rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule<'a> {
    /// Set the field to `literal`.
    Scalar { kind: ProtoKind, literal: String },
    /// `(redact.custom).message.*`
    Message(&'a MessageRule),
    /// `(redact.custom).element.*`
    Element(ElementAction<'a>),
}

/// The single option an element rule sets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementAction<'a> {
    /// `(redact.custom).element.empty`
    Empty,
    /// `(redact.custom).element.nested`
    Nested,
    /// `(redact.custom).element.item.*`, not yet classified.
    Item(&'a FieldRules),
}

impl Rule<'_> {
    /// Kind the rule applies to. Element rules apply to any element kind.
    pub fn kind(&self) -> Option<ProtoKind> {
        match self {
            Rule::Scalar { kind, .. } => Some(*kind),
            Rule::Message(_) => Some(ProtoKind::Message),
            Rule::Element(_) => None,
        }
    }

    pub fn label(&self) -> RuleLabel {
        match self {
            Rule::Element(_) => RuleLabel::Container,
            Rule::Scalar { .. } | Rule::Message(_) => RuleLabel::Singular,
        }
    }
}

/// Classifies `rules`, attached to the entity at `location`.
///
/// Fails with `InvalidAnnotation` when no branch is populated, when a
/// sub-rule sets more than one (or, for element rules, none) of its options,
/// or when a float literal is not finite.
pub fn classify<'a>(rules: &'a FieldRules, location: &str) -> Result<Rule<'a>> {
    let value = validate::rule_payload(rules, location)?;
    let (kind, literal) = match value {
        RuleValue::Float(v) => {
            validate::finite_float(f64::from(*v), location)?;
            (ProtoKind::Float, v.to_string())
        }
        RuleValue::Double(v) => {
            validate::finite_float(*v, location)?;
            (ProtoKind::Double, v.to_string())
        }
        RuleValue::Int32(v) => (ProtoKind::Int32, v.to_string()),
        RuleValue::Int64(v) => (ProtoKind::Int64, v.to_string()),
        RuleValue::Uint32(v) => (ProtoKind::Uint32, v.to_string()),
        RuleValue::Uint64(v) => (ProtoKind::Uint64, v.to_string()),
        RuleValue::Sint32(v) => (ProtoKind::Sint32, v.to_string()),
        RuleValue::Sint64(v) => (ProtoKind::Sint64, v.to_string()),
        RuleValue::Fixed32(v) => (ProtoKind::Fixed32, v.to_string()),
        RuleValue::Fixed64(v) => (ProtoKind::Fixed64, v.to_string()),
        RuleValue::Sfixed32(v) => (ProtoKind::Sfixed32, v.to_string()),
        RuleValue::Sfixed64(v) => (ProtoKind::Sfixed64, v.to_string()),
        RuleValue::Bool(v) => (ProtoKind::Bool, v.to_string()),
        RuleValue::String(v) => (ProtoKind::String, literal::string_literal(v)),
        RuleValue::Bytes(v) => (ProtoKind::Bytes, literal::bytes_literal(v)),
        RuleValue::Enum(v) => (ProtoKind::Enum, v.to_string()),
        RuleValue::Message(rule) => {
            validate::message_rule(rule, location)?;
            return Ok(Rule::Message(rule));
        }
        RuleValue::Element(rule) => {
            return Ok(Rule::Element(validate::element_rule(rule, location)?));
        }
    };
    Ok(Rule::Scalar { kind, literal })
}

/// The rule spelling that fits a field of `kind` and `cardinality`.
pub fn suggested_rule_spelling(kind: ProtoKind, cardinality: Cardinality) -> String {
    if cardinality.is_collection() {
        return "(redact.custom).element.*".to_string();
    }
    match kind {
        ProtoKind::Message => "(redact.custom).message.*".to_string(),
        scalar => format!("(redact.custom).{}", scalar.proto_name()),
    }
}

/// The item rule spelling that fits elements of `kind`.
pub fn suggested_item_rule_spelling(kind: ProtoKind) -> String {
    match kind {
        ProtoKind::Message => "(redact.custom).element.item.message.*".to_string(),
        scalar => format!("(redact.custom).element.item.{}", scalar.proto_name()),
    }
}
