//! Read-only view of the protobuf schema handed over by the reflection layer.
//!
//! These types mirror what a descriptor walker exposes for one input file:
//! messages with their fields, services with their methods, and the options
//! attached to each. The planner never mutates them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::annotation::FieldAnnotation;

/// Protobuf value kinds a field (or a collection element) can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtoKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
    Enum,
    Message,
}

impl ProtoKind {
    /// Every kind, in descriptor order.
    pub const ALL: [ProtoKind; 17] = [
        ProtoKind::Double,
        ProtoKind::Float,
        ProtoKind::Int64,
        ProtoKind::Uint64,
        ProtoKind::Int32,
        ProtoKind::Fixed64,
        ProtoKind::Fixed32,
        ProtoKind::Bool,
        ProtoKind::String,
        ProtoKind::Bytes,
        ProtoKind::Uint32,
        ProtoKind::Sfixed32,
        ProtoKind::Sfixed64,
        ProtoKind::Sint32,
        ProtoKind::Sint64,
        ProtoKind::Enum,
        ProtoKind::Message,
    ];

    /// The keyword used for this kind in `.proto` sources and rule spellings.
    pub fn proto_name(self) -> &'static str {
        match self {
            ProtoKind::Double => "double",
            ProtoKind::Float => "float",
            ProtoKind::Int64 => "int64",
            ProtoKind::Uint64 => "uint64",
            ProtoKind::Int32 => "int32",
            ProtoKind::Fixed64 => "fixed64",
            ProtoKind::Fixed32 => "fixed32",
            ProtoKind::Bool => "bool",
            ProtoKind::String => "string",
            ProtoKind::Bytes => "bytes",
            ProtoKind::Uint32 => "uint32",
            ProtoKind::Sfixed32 => "sfixed32",
            ProtoKind::Sfixed64 => "sfixed64",
            ProtoKind::Sint32 => "sint32",
            ProtoKind::Sint64 => "sint64",
            ProtoKind::Enum => "enum",
            ProtoKind::Message => "message",
        }
    }

    /// Numeric kinds, enums included, all redact to zero.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            ProtoKind::Bool | ProtoKind::String | ProtoKind::Bytes | ProtoKind::Message
        )
    }
}

impl fmt::Display for ProtoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.proto_name())
    }
}

/// How many values a field holds.
///
/// For `Repeated` and `Map` fields the owning [`FieldDescriptor::kind`] is the
/// element (map value) kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    #[default]
    Singular,
    Repeated,
    Map {
        key: ProtoKind,
    },
}

impl Cardinality {
    pub fn is_collection(self) -> bool {
        !matches!(self, Cardinality::Singular)
    }
}

/// Reference to a named message or enum type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Name of the generated Go type (e.g. `Profile`, `User_Address`).
    pub name: String,
    /// Fully qualified protobuf name (e.g. `acme.users.v1.Profile`).
    pub full_name: String,
    /// Go import path of the package declaring the type. Empty means "same
    /// package as the file being generated".
    #[serde(default)]
    pub import_path: String,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            import_path: String::new(),
        }
    }

    #[must_use]
    pub fn with_import_path(mut self, import_path: impl Into<String>) -> Self {
        self.import_path = import_path.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Go field name as it appears on the generated struct.
    pub name: String,
    pub kind: ProtoKind,
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Declared with the proto3 `optional` keyword.
    #[serde(default)]
    pub proto3_optional: bool,
    /// Message or enum type of the field (or of its elements).
    #[serde(default)]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub annotation: Option<FieldAnnotation>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: ProtoKind) -> Self {
        Self {
            name: name.into(),
            kind,
            cardinality: Cardinality::Singular,
            proto3_optional: false,
            type_ref: None,
            annotation: None,
        }
    }

    /// A singular embedded message field.
    pub fn message(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self::new(name, ProtoKind::Message).with_type(type_ref)
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    #[must_use]
    pub fn map(mut self, key: ProtoKind) -> Self {
        self.cardinality = Cardinality::Map { key };
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.proto3_optional = true;
        self
    }

    #[must_use]
    pub fn with_type(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = Some(type_ref);
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotation: FieldAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }
}

/// Message-level redaction options. At most one may be set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOptions {
    #[serde(default)]
    pub ignored: bool,
    #[serde(default)]
    pub nil: bool,
    #[serde(default)]
    pub empty: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    pub type_ref: TypeRef,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub options: MessageOptions,
}

impl MessageDescriptor {
    pub fn new(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            fields: Vec::new(),
            options: MessageOptions::default(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: MessageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.type_ref.name
    }

    pub fn full_name(&self) -> &str {
        &self.type_ref.full_name
    }
}

/// Access-control options shared by services and methods.
///
/// On a method every value left unset is inherited from its service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessOptions {
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub internal_code: Option<u32>,
    #[serde(default)]
    pub internal_err_message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    pub full_name: String,
    pub input: Option<TypeRef>,
    pub output: Option<MessageDescriptor>,
    #[serde(default)]
    pub client_streaming: bool,
    #[serde(default)]
    pub server_streaming: bool,
    #[serde(default)]
    pub options: AccessOptions,
}

impl MethodDescriptor {
    pub fn unary(
        name: impl Into<String>,
        full_name: impl Into<String>,
        input: TypeRef,
        output: MessageDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            input: Some(input),
            output: Some(output),
            client_streaming: false,
            server_streaming: false,
            options: AccessOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: AccessOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn streaming(mut self, client: bool, server: bool) -> Self {
        self.client_streaming = client;
        self.server_streaming = server;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default)]
    pub options: AccessOptions,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            methods: Vec::new(),
            options: AccessOptions::default(),
        }
    }

    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: AccessOptions) -> Self {
        self.options = options;
        self
    }
}

/// A file imported by the file being generated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedFile {
    pub import_path: String,
    /// Go package name declared by the import.
    pub package_name: String,
    /// First message, enum or service the import declares, if any. Imports
    /// without usable types are not aliased.
    #[serde(default)]
    pub first_symbol: Option<TypeRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Source `.proto` path.
    pub name: String,
    /// Go package name of the generated code.
    pub package: String,
    /// Go import path of the generated code.
    #[serde(default)]
    pub import_path: String,
    #[serde(default)]
    pub imports: Vec<ImportedFile>,
    /// All messages in the file, nested ones included.
    #[serde(default)]
    pub messages: Vec<MessageDescriptor>,
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
    /// `(redact.file_skip)`
    #[serde(default)]
    pub skip: bool,
}
