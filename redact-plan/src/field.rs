//! Field resolution: one annotated field in, one [`FieldDecision`] out.
//!
//! ## Decision table
//!
//! | Annotation | Decision |
//! |------------|----------|
//! | none | pass through (`redact = false`) |
//! | `(redact.redact)` | kind default; singular messages recurse |
//! | `(redact.custom).<scalar>` | set to the literal |
//! | `(redact.custom).message.*` | `nil`, empty instance, skip, or recurse |
//! | `(redact.custom).element.empty` | empty collection |
//! | `(redact.custom).element.nested` | iterate, element default |
//! | `(redact.custom).element.item.*` | iterate, item rule (depth 1 only) |

use serde::Serialize;

use crate::{
    annotation::{FieldRules, MessageRule},
    classify::{classify, ElementAction, Rule},
    defaults::{default_for, go_type_name, NO_SCALAR_DEFAULT},
    error::{PlanError, Result},
    imports::Qualifier,
    literal::{self, NIL},
    schema::{Cardinality, FieldDescriptor, ProtoKind, TypeRef},
    validate,
};

/// What the generated code does with one field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldDecision {
    pub name: String,
    pub redact: bool,
    /// Go expression assigned to the field (or to each element when
    /// `iterate` is set). Pointer-wrapped for proto3 `optional` scalars.
    pub redaction_value: Option<String>,
    /// Go type of the field's value, or of its elements for collections.
    pub go_type: String,
    pub is_map: bool,
    pub is_repeated: bool,
    pub is_message: bool,
    pub is_optional: bool,
    /// Redact each element instead of the whole collection.
    pub iterate: bool,
    /// Call the embedded message's own redactor.
    pub nested_call: bool,
    /// Leave the embedded message untouched.
    pub embed_skip: bool,
    pub embed_message_name: Option<String>,
    /// Embedded message name as written in the generated file.
    pub embed_message_qualified: Option<String>,
}

/// Resolves the fields of one message.
#[derive(Clone, Copy)]
pub struct FieldResolver<'a> {
    message: &'a str,
    qualifier: &'a dyn Qualifier,
}

impl<'a> FieldResolver<'a> {
    /// `message` is the fully qualified name of the owning message, used to
    /// locate errors.
    pub fn new(message: &'a str, qualifier: &'a dyn Qualifier) -> Self {
        Self { message, qualifier }
    }

    pub fn resolve(&self, field: &FieldDescriptor) -> Result<FieldDecision> {
        let location = format!("{}.{}", self.message, field.name);
        let type_ref = validate::type_reference(field, &location)?;
        let mut decision = self.base_decision(field, type_ref);

        let Some(annotation) = field.annotation.as_ref() else {
            return Ok(decision);
        };
        match annotation.custom.as_ref() {
            Some(rules) => {
                decision.redact = true;
                apply_rules(&mut decision, field, rules, &location)?;
            }
            None if annotation.redact => {
                decision.redact = true;
                decision.redaction_value =
                    default_value(field.kind, field.cardinality.is_collection(), &decision);
                decision.nested_call = decision.is_message;
            }
            None => {}
        }
        Ok(decision)
    }

    fn base_decision(&self, field: &FieldDescriptor, type_ref: Option<&TypeRef>) -> FieldDecision {
        let is_singular = field.cardinality == Cardinality::Singular;
        let is_message = is_singular && field.kind == ProtoKind::Message;
        let embedded = type_ref.filter(|_| field.kind == ProtoKind::Message);

        FieldDecision {
            name: field.name.clone(),
            go_type: self.value_go_type(field.kind, type_ref),
            is_map: matches!(field.cardinality, Cardinality::Map { .. }),
            is_repeated: field.cardinality == Cardinality::Repeated,
            is_message,
            is_optional: is_singular
                && field.proto3_optional
                && !matches!(field.kind, ProtoKind::Bytes | ProtoKind::Message),
            embed_message_name: embedded.map(|t| t.name.clone()),
            embed_message_qualified: embedded.map(|t| self.qualifier.qualify(t)),
            ..FieldDecision::default()
        }
    }

    /// Go type of one value of `kind`: the scalar type, the enum type, or a
    /// pointer to the message type.
    fn value_go_type(&self, kind: ProtoKind, type_ref: Option<&TypeRef>) -> String {
        if let Some(name) = go_type_name(kind) {
            return name.to_string();
        }
        let qualified = type_ref.map(|t| self.qualifier.qualify(t)).unwrap_or_default();
        match kind {
            ProtoKind::Message => format!("*{qualified}"),
            _ => qualified,
        }
    }
}

fn apply_rules(
    decision: &mut FieldDecision,
    field: &FieldDescriptor,
    rules: &FieldRules,
    location: &str,
) -> Result<()> {
    let rule = classify(rules, location)?;
    validate::rule_matches_field(field, &rule, location)?;
    match rule {
        Rule::Scalar { literal, .. } => {
            decision.redaction_value = Some(wrap_optional(decision, literal));
        }
        Rule::Message(rule) => apply_message_rule(decision, rule),
        Rule::Element(action) => {
            apply_element_rule(decision, field, action, location)?;
        }
    }
    Ok(())
}

fn apply_element_rule(
    decision: &mut FieldDecision,
    field: &FieldDescriptor,
    action: ElementAction<'_>,
    location: &str,
) -> Result<()> {
    match action {
        ElementAction::Empty => {
            decision.redaction_value = Some(empty_collection(field, decision, location)?);
        }
        ElementAction::Nested => {
            decision.iterate = true;
            decision.redaction_value = default_value(field.kind, false, decision);
            decision.nested_call = field.kind == ProtoKind::Message;
        }
        ElementAction::Item(item) => {
            decision.iterate = true;
            apply_item_rule(decision, field.kind, item, location)?;
        }
    }
    Ok(())
}

/// Resolves an `element.item.*` rule against the element kind. Items are one
/// level deep: an element rule inside an item is rejected before it is
/// classified.
fn apply_item_rule(
    decision: &mut FieldDecision,
    element_kind: ProtoKind,
    item: &FieldRules,
    location: &str,
) -> Result<()> {
    validate::nesting_depth(item, location)?;
    let item_rule = classify(item, location)?;
    validate::item_matches_element(element_kind, &item_rule, location)?;
    match item_rule {
        Rule::Scalar { literal, .. } => decision.redaction_value = Some(literal),
        Rule::Message(rule) => apply_message_rule(decision, rule),
        Rule::Element(_) => return Err(validate::depth_exceeded(location)),
    }
    Ok(())
}

fn empty_collection(
    field: &FieldDescriptor,
    decision: &FieldDecision,
    location: &str,
) -> Result<String> {
    match field.cardinality {
        Cardinality::Map { key } => {
            let key_type = go_type_name(key)
                .filter(|_| !matches!(key, ProtoKind::Float | ProtoKind::Double | ProtoKind::Bytes))
                .ok_or_else(|| {
                    PlanError::structural(location, format!("{key} is not a valid map key type"))
                })?;
            Ok(format!("map[{key_type}]{}{{}}", decision.go_type))
        }
        Cardinality::Repeated | Cardinality::Singular => Ok(format!("[]{}{{}}", decision.go_type)),
    }
}

/// Default for a value of `kind`, with the singular-message sentinel mapped
/// to "no value".
fn default_value(kind: ProtoKind, is_collection: bool, decision: &FieldDecision) -> Option<String> {
    let value = default_for(kind, is_collection);
    if value == NO_SCALAR_DEFAULT {
        return None;
    }
    Some(wrap_optional(decision, value.to_string()))
}

fn wrap_optional(decision: &FieldDecision, value: String) -> String {
    if decision.is_optional && value != NIL {
        literal::pointer_to(&decision.go_type, &value)
    } else {
        value
    }
}

/// Picks the action of a message sub-rule. The rule has already been checked
/// to set at most one flag.
fn apply_message_rule(decision: &mut FieldDecision, rule: &MessageRule) {
    if rule.empty {
        let qualified = decision.embed_message_qualified.clone().unwrap_or_default();
        decision.redaction_value = Some(format!("&{qualified}{{}}"));
    } else if rule.nil {
        decision.redaction_value = Some(NIL.to_string());
    } else if rule.skip {
        decision.embed_skip = true;
    } else {
        decision.nested_call = true;
    }
}
