//! Compile-time redaction plans for protobuf schemas.
//!
//! This crate turns the `(redact.*)` options attached to a protobuf schema into
//! resolved, type-checked decisions that a code generator renders into Go:
//! - **Fields**: what to set each field to, whether to iterate a collection, and
//!   whether to recurse into an embedded message.
//! - **Messages**: the per-field decisions plus the message-wide
//!   ignore/nil/empty override.
//! - **Services and methods**: skip and internal gating, with gRPC status codes
//!   and error messages inherited from service to method.
//!
//! Key rules:
//! - Unannotated fields pass through unchanged.
//! - The bare `(redact.redact)` flag uses the kind's default; singular embedded
//!   messages recurse while repeated and map fields are nulled wholesale.
//! - A `(redact.custom)` rule must match the field's kind and label, and element
//!   rules nest at most one level deep.
//! - Every failure carries the fully qualified location of the offending
//!   entity and the annotation spelling that would have been accepted.
//!
//! What this crate does:
//! - resolves one [`FileDescriptor`] at a time with [`Planner::plan_file`]
//! - builds the Go import table and qualifies embedded type names
//! - reports every failure in a file through [`Diagnostics`]
//!
//! What it does not do:
//! - speak the protoc plugin protocol or decode descriptors
//! - render Go source
//! - redact anything at runtime
//!
//! ## Example
//! ```
//! use redact_plan::{
//!     FieldAnnotation, FieldDescriptor, FieldResolver, LocalNames, ProtoKind,
//! };
//!
//! let field = FieldDescriptor::new("Password", ProtoKind::String)
//!     .annotated(FieldAnnotation::redact());
//! let decision = FieldResolver::new("acme.v1.User", &LocalNames)
//!     .resolve(&field)
//!     .unwrap();
//! assert_eq!(decision.redaction_value.as_deref(), Some("\"REDACTED\""));
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
mod annotation;
mod classify;
mod config;
mod defaults;
mod diagnostics;
mod error;
mod field;
mod imports;
mod literal;
mod logging;
mod message;
mod plan;
mod schema;
mod service;
mod validate;

// Re-exports
pub use annotation::{ElementRule, FieldAnnotation, FieldRules, MessageRule, RuleValue};
pub use classify::{
    classify, suggested_item_rule_spelling, suggested_rule_spelling, ElementAction, Rule,
    RuleLabel,
};
pub use config::{
    ConfigError, Options, DEFAULT_ERROR_TEMPLATE, DEFAULT_RUNTIME_IMPORT, FAIL_FAST_ENV,
    RUNTIME_IMPORT_ENV,
};
pub use defaults::{default_for, go_type_name, NO_SCALAR_DEFAULT, REDACTED_STRING};
pub use diagnostics::Diagnostics;
pub use error::{PlanError, Result};
pub use field::{FieldDecision, FieldResolver};
pub use imports::{
    ImportTable, LocalNames, Qualifier, RUNTIME_ALIAS, STANDARD_IMPORTS, STANDARD_REFERENCES,
};
pub use literal::{bytes_literal, pointer_to, string_literal};
pub use message::{resolve_message, MessageDecision, MessageDisposition};
pub use plan::{Planner, ProtoFileData};
pub use schema::{
    AccessOptions, Cardinality, FieldDescriptor, FileDescriptor, ImportedFile, MessageDescriptor,
    MessageOptions, MethodDescriptor, ProtoKind, ServiceDescriptor, TypeRef,
};
pub use service::{
    resolve_method, resolve_service, substitute_placeholders, AccessDefaults, MethodDecision,
    ServiceDecision, StatusCode,
};
