//! Decoded `(redact.*)` field options.
//!
//! A field carries at most one [`FieldAnnotation`]: the bare `(redact.redact)`
//! flag, a structured `(redact.custom)` rule, or both. The structured rule is
//! a sum type with one variant per scalar kind plus the message and element
//! sub-rules, so exactly one branch can ever be populated.

use serde::{Deserialize, Serialize};

/// Everything attached to one field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAnnotation {
    /// `(redact.redact) = true`: redact with the kind's default value.
    #[serde(default)]
    pub redact: bool,
    /// `(redact.custom)`
    #[serde(default)]
    pub custom: Option<FieldRules>,
}

impl FieldAnnotation {
    /// Bare `(redact.redact) = true`.
    pub fn redact() -> Self {
        Self {
            redact: true,
            custom: None,
        }
    }

    /// A structured rule.
    pub fn custom(value: RuleValue) -> Self {
        Self {
            redact: false,
            custom: Some(FieldRules::new(value)),
        }
    }

    /// A structured rule option that was present but carried no value.
    pub fn empty_custom() -> Self {
        Self {
            redact: false,
            custom: Some(FieldRules::default()),
        }
    }
}

/// The `(redact.custom)` payload.
///
/// `value` is `None` when the option was written without selecting any
/// branch, which the classifier rejects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRules {
    #[serde(default)]
    pub value: Option<RuleValue>,
}

impl FieldRules {
    pub fn new(value: RuleValue) -> Self {
        Self { value: Some(value) }
    }
}

/// One populated branch of `(redact.custom)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleValue {
    Float(f32),
    Double(f64),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Sint32(i32),
    Sint64(i64),
    Fixed32(u32),
    Fixed64(u64),
    Sfixed32(i32),
    Sfixed64(i64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    /// Enum number.
    Enum(i32),
    Message(MessageRule),
    Element(ElementRule),
}

/// `(redact.custom).message.*`
///
/// At most one flag may be set. With none set the embedded message is
/// redacted by calling its own generated redactor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRule {
    #[serde(default)]
    pub nil: bool,
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub skip: bool,
}

impl MessageRule {
    pub fn nil() -> Self {
        Self {
            nil: true,
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self {
            empty: true,
            ..Self::default()
        }
    }

    pub fn skip() -> Self {
        Self {
            skip: true,
            ..Self::default()
        }
    }
}

/// `(redact.custom).element.*`
///
/// Exactly one of `empty`, `nested` or `item` must be set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRule {
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub nested: bool,
    #[serde(default)]
    pub item: Option<Box<FieldRules>>,
}

impl ElementRule {
    pub fn empty() -> Self {
        Self {
            empty: true,
            ..Self::default()
        }
    }

    pub fn nested() -> Self {
        Self {
            nested: true,
            ..Self::default()
        }
    }

    pub fn item(value: RuleValue) -> Self {
        Self {
            item: Some(Box::new(FieldRules::new(value))),
            ..Self::default()
        }
    }
}
