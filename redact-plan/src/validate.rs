//! Checks shared by the field, message and service resolvers.
//!
//! Each check either passes or returns a [`PlanError`] carrying the location it
//! was given, what was expected, what was found, and the annotation spelling
//! that would have been accepted.

use crate::{
    annotation::{ElementRule, FieldRules, MessageRule, RuleValue},
    classify::{
        suggested_item_rule_spelling, suggested_rule_spelling, ElementAction, Rule, RuleLabel,
    },
    error::{PlanError, Result},
    schema::{Cardinality, FieldDescriptor, MessageOptions, ProtoKind, TypeRef},
    service::StatusCode,
};

const ELEMENT_RULE: &str = "(redact.custom).element.*";

const NESTING_HINT: &str = "use either (redact.custom).element.nested for iteration, \
(redact.custom).element.item.* for custom item values, \
or (redact.custom).element.empty for an empty collection";

/// The populated branch of a `(redact.custom)` payload.
pub(crate) fn rule_payload<'a>(rules: &'a FieldRules, location: &str) -> Result<&'a RuleValue> {
    rules
        .value
        .as_ref()
        .ok_or_else(|| PlanError::InvalidAnnotation {
            location: location.to_string(),
            expected: "redaction rule with values".to_string(),
            found: "empty rule".to_string(),
            hint: "define a value for the custom redaction rule".to_string(),
        })
}

pub(crate) fn finite_float(value: f64, location: &str) -> Result<()> {
    if value.is_finite() {
        return Ok(());
    }
    Err(PlanError::InvalidAnnotation {
        location: location.to_string(),
        expected: "a finite float value".to_string(),
        found: value.to_string(),
        hint: "NaN and infinities have no Go literal".to_string(),
    })
}

/// At most one of `nil`, `empty` and `skip`.
pub(crate) fn message_rule(rule: &MessageRule, location: &str) -> Result<()> {
    let set = [rule.nil, rule.empty, rule.skip]
        .into_iter()
        .filter(|flag| *flag)
        .count();
    if set <= 1 {
        return Ok(());
    }
    Err(PlanError::InvalidAnnotation {
        location: location.to_string(),
        expected: "at most one of (redact.custom).message.nil, .empty, or .skip".to_string(),
        found: format!(
            "multiple options set (nil={}, empty={}, skip={})",
            rule.nil, rule.empty, rule.skip
        ),
        hint: "these options are mutually exclusive".to_string(),
    })
}

/// Exactly one of `empty`, `nested` and `item`.
pub(crate) fn element_rule<'a>(
    rule: &'a ElementRule,
    location: &str,
) -> Result<ElementAction<'a>> {
    let found = match (rule.empty, rule.nested, rule.item.as_deref()) {
        (true, false, None) => return Ok(ElementAction::Empty),
        (false, true, None) => return Ok(ElementAction::Nested),
        (false, false, Some(item)) => return Ok(ElementAction::Item(item)),
        (false, false, None) => "element rule with no option set".to_string(),
        _ => format!(
            "multiple options set (empty={}, nested={}, item={})",
            rule.empty,
            rule.nested,
            rule.item.is_some()
        ),
    };
    Err(PlanError::InvalidAnnotation {
        location: location.to_string(),
        expected: "exactly one of (redact.custom).element.empty, .nested, or .item.*".to_string(),
        found,
        hint: "use (redact.custom).element.nested, .empty, or .item.*".to_string(),
    })
}

pub(crate) fn depth_exceeded(location: &str) -> PlanError {
    PlanError::NestedDepthExceeded {
        location: location.to_string(),
        hint: NESTING_HINT.to_string(),
    }
}

/// An element item rule must not itself be an element rule.
pub(crate) fn nesting_depth(item: &FieldRules, location: &str) -> Result<()> {
    if let Some(RuleValue::Element(_)) = item.value {
        return Err(depth_exceeded(location));
    }
    Ok(())
}

/// The rule's kind and label fit `field`.
pub(crate) fn rule_matches_field(
    field: &FieldDescriptor,
    rule: &Rule<'_>,
    location: &str,
) -> Result<()> {
    let suggestion = suggested_rule_spelling(field.kind, field.cardinality);

    if let Some(rule_kind) = rule.kind() {
        if rule_kind != field.kind {
            return Err(PlanError::TypeMismatch {
                location: location.to_string(),
                expected: format!("rule for type {}", field.kind),
                found: format!("rule for type {rule_kind}"),
                hint: format!("use {suggestion} instead"),
            });
        }
    }

    match (field.cardinality.is_collection(), rule.label()) {
        (true, RuleLabel::Singular) => Err(PlanError::LabelMismatch {
            location: location.to_string(),
            expected: ELEMENT_RULE.to_string(),
            found: "rule for a single value".to_string(),
            hint: format!(
                "{} fields require element rules, use {suggestion} instead",
                cardinality_name(field.cardinality)
            ),
        }),
        (false, RuleLabel::Container) => Err(PlanError::LabelMismatch {
            location: location.to_string(),
            expected: suggestion.clone(),
            found: ELEMENT_RULE.to_string(),
            hint: format!(
                "element rules only apply to repeated and map fields, use {suggestion} instead"
            ),
        }),
        _ => Ok(()),
    }
}

/// An item rule's kind fits the collection's element kind.
pub(crate) fn item_matches_element(
    element_kind: ProtoKind,
    rule: &Rule<'_>,
    location: &str,
) -> Result<()> {
    match rule.kind() {
        Some(kind) if kind == element_kind => Ok(()),
        Some(kind) => Err(PlanError::TypeMismatch {
            location: location.to_string(),
            expected: format!("item rule for type {element_kind}"),
            found: format!("item rule for type {kind}"),
            hint: format!(
                "use {} instead",
                suggested_item_rule_spelling(element_kind)
            ),
        }),
        None => Err(depth_exceeded(location)),
    }
}

/// At most one of `(redact.ignored)`, `(redact.nil)` and `(redact.empty)`.
pub(crate) fn message_options(options: &MessageOptions, location: &str) -> Result<()> {
    let set = [options.ignored, options.nil, options.empty]
        .into_iter()
        .filter(|flag| *flag)
        .count();
    if set <= 1 {
        return Ok(());
    }
    Err(PlanError::ConflictingMessageOptions {
        location: location.to_string(),
        found: format!(
            "multiple options set (ignored={}, nil={}, empty={})",
            options.ignored, options.nil, options.empty
        ),
    })
}

/// A code in the closed gRPC range `[0, 16]`.
pub(crate) fn status_code(code: u32, location: &str) -> Result<StatusCode> {
    StatusCode::from_u32(code).ok_or_else(|| PlanError::InvalidStatusCode {
        location: location.to_string(),
        code,
    })
}

/// Message and enum fields must name their type.
pub(crate) fn type_reference<'a>(
    field: &'a FieldDescriptor,
    location: &str,
) -> Result<Option<&'a TypeRef>> {
    match (field.kind, field.type_ref.as_ref()) {
        (ProtoKind::Message | ProtoKind::Enum, None) => Err(PlanError::structural(
            location,
            format!("{} field has no type reference", field.kind),
        )),
        (_, type_ref) => Ok(type_ref),
    }
}

fn cardinality_name(cardinality: Cardinality) -> &'static str {
    match cardinality {
        Cardinality::Singular => "singular",
        Cardinality::Repeated => "repeated",
        Cardinality::Map { .. } => "map",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    const AT: &str = "acme.User.field";

    #[test]
    fn message_options_allow_zero_or_one() {
        for (ignored, nil, empty) in [
            (false, false, false),
            (true, false, false),
            (false, true, false),
            (false, false, true),
        ] {
            let options = MessageOptions {
                ignored,
                nil,
                empty,
            };
            assert!(message_options(&options, AT).is_ok());
        }
    }

    #[test]
    fn message_options_reject_combinations() {
        for (ignored, nil, empty) in [
            (true, true, false),
            (true, false, true),
            (false, true, true),
            (true, true, true),
        ] {
            let options = MessageOptions {
                ignored,
                nil,
                empty,
            };
            let err = message_options(&options, "acme.User").unwrap_err();
            assert!(matches!(err, PlanError::ConflictingMessageOptions { .. }));
            assert!(err.to_string().contains("at most one of (redact.ignored)"));
        }
    }

    #[test]
    fn status_code_boundaries() {
        assert_eq!(status_code(0, AT).unwrap(), StatusCode::Ok);
        assert_eq!(status_code(16, AT).unwrap(), StatusCode::Unauthenticated);
        assert!(matches!(
            status_code(17, AT),
            Err(PlanError::InvalidStatusCode { code: 17, .. })
        ));
        assert!(status_code(u32::MAX, AT).is_err());
    }

    #[test]
    fn message_rule_rejects_multiple_flags() {
        let rule = MessageRule {
            nil: true,
            empty: true,
            skip: false,
        };
        assert!(matches!(
            message_rule(&rule, AT),
            Err(PlanError::InvalidAnnotation { .. })
        ));
        assert!(message_rule(&MessageRule::default(), AT).is_ok());
    }

    #[test]
    fn element_rule_requires_exactly_one_option() {
        assert_eq!(
            element_rule(&ElementRule::nested(), AT),
            Ok(ElementAction::Nested)
        );
        assert_eq!(element_rule(&ElementRule::empty(), AT), Ok(ElementAction::Empty));
        assert!(element_rule(&ElementRule::default(), AT).is_err());
        let both = ElementRule {
            empty: true,
            nested: true,
            item: None,
        };
        let err = element_rule(&both, AT).unwrap_err();
        assert!(err.to_string().contains("multiple options set"));
    }

    #[test]
    fn nesting_depth_rejects_element_items() {
        let inner = FieldRules::new(RuleValue::Element(ElementRule::nested()));
        let err = nesting_depth(&inner, AT).unwrap_err();
        assert!(matches!(err, PlanError::NestedDepthExceeded { .. }));
        assert!(err.to_string().contains("element.nested"));
        assert!(err.to_string().contains("element.item.*"));
        assert!(err.to_string().contains("element.empty"));

        let scalar = FieldRules::new(RuleValue::Int32(1));
        assert!(nesting_depth(&scalar, AT).is_ok());
    }

    #[test]
    fn type_mismatch_suggests_the_fields_rule() {
        let field = FieldDescriptor::new("Age", ProtoKind::Int32);
        let rules = FieldRules::new(RuleValue::String("x".into()));
        let rule = classify(&rules, AT).unwrap();
        let err = rule_matches_field(&field, &rule, AT).unwrap_err();
        match err {
            PlanError::TypeMismatch {
                expected,
                found,
                hint,
                ..
            } => {
                assert_eq!(expected, "rule for type int32");
                assert_eq!(found, "rule for type string");
                assert_eq!(hint, "use (redact.custom).int32 instead");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn collection_without_element_rule_is_a_label_mismatch() {
        let field = FieldDescriptor::new("Scores", ProtoKind::Int32).repeated();
        let rules = FieldRules::new(RuleValue::Int32(0));
        let rule = classify(&rules, AT).unwrap();
        let err = rule_matches_field(&field, &rule, AT).unwrap_err();
        assert!(matches!(err, PlanError::LabelMismatch { .. }));
        assert!(err.to_string().contains("(redact.custom).element.*"));
    }

    #[test]
    fn element_rule_on_singular_field_is_a_label_mismatch() {
        let field = FieldDescriptor::new("Name", ProtoKind::String);
        let rules = FieldRules::new(RuleValue::Element(ElementRule::empty()));
        let rule = classify(&rules, AT).unwrap();
        let err = rule_matches_field(&field, &rule, AT).unwrap_err();
        assert!(matches!(err, PlanError::LabelMismatch { .. }));
        assert!(err.to_string().contains("use (redact.custom).string instead"));
    }

    #[test]
    fn missing_type_reference_is_structural() {
        let field = FieldDescriptor::new("Profile", ProtoKind::Message);
        assert!(matches!(
            type_reference(&field, AT),
            Err(PlanError::Structural { .. })
        ));
        let field = FieldDescriptor::new("Name", ProtoKind::String);
        assert_eq!(type_reference(&field, AT).unwrap(), None);
    }
}
