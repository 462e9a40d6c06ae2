//! Message resolution.

use serde::Serialize;

use crate::{
    diagnostics::Diagnostics,
    field::{FieldDecision, FieldResolver},
    imports::Qualifier,
    schema::MessageDescriptor,
    validate,
};

/// Message-wide override set by `(redact.ignored)`, `(redact.nil)` or
/// `(redact.empty)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDisposition {
    /// Left out of redaction entirely; no fields are resolved.
    Ignore,
    /// Replaced by `nil` wherever it is redacted.
    Nil,
    /// Replaced by an empty instance wherever it is redacted.
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageDecision {
    pub name: String,
    pub full_name: String,
    pub qualified_name: String,
    /// In declaration order.
    pub fields: Vec<FieldDecision>,
    pub disposition: Option<MessageDisposition>,
}

impl MessageDecision {
    pub fn is_ignored(&self) -> bool {
        self.disposition == Some(MessageDisposition::Ignore)
    }

    /// Whether any field needs generated redaction code.
    pub fn redacts_any_field(&self) -> bool {
        self.fields.iter().any(|field| field.redact)
    }
}

/// Resolves `message` and all of its fields.
///
/// Conflicting message options fail before any field is looked at. Field
/// failures are all collected; the message fails if any field did.
pub fn resolve_message(
    message: &MessageDescriptor,
    qualifier: &dyn Qualifier,
) -> Result<MessageDecision, Diagnostics> {
    let full_name = message.full_name();
    validate::message_options(&message.options, full_name)?;

    let options = message.options;
    let disposition = if options.ignored {
        Some(MessageDisposition::Ignore)
    } else if options.nil {
        Some(MessageDisposition::Nil)
    } else if options.empty {
        Some(MessageDisposition::Empty)
    } else {
        None
    };

    let mut decision = MessageDecision {
        name: message.name().to_string(),
        full_name: full_name.to_string(),
        qualified_name: qualifier.qualify(&message.type_ref),
        fields: Vec::new(),
        disposition,
    };
    if decision.is_ignored() {
        return Ok(decision);
    }

    let resolver = FieldResolver::new(full_name, qualifier);
    let mut diagnostics = Diagnostics::new();
    decision.fields.reserve(message.fields.len());
    for field in &message.fields {
        match resolver.resolve(field) {
            Ok(field) => decision.fields.push(field),
            Err(error) => diagnostics.push(error),
        }
    }
    diagnostics.into_result(decision)
}
