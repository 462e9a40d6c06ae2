//! Service and method access decisions.
//!
//! Service-level `internal`, `internal_code` and `internal_err_message` are
//! defaults that each method may override independently. They are resolved
//! once per service into [`AccessDefaults`] and passed down to every method.

use serde::Serialize;

use crate::{
    config::Options,
    diagnostics::Diagnostics,
    error::{PlanError, Result},
    imports::Qualifier,
    literal,
    message::{resolve_message, MessageDecision},
    schema::{AccessOptions, MethodDescriptor, ServiceDescriptor},
    validate,
};

const SERVICE_PLACEHOLDER: &str = "%service%";
const METHOD_PLACEHOLDER: &str = "%method%";

/// Canonical gRPC status codes, numbered as on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum StatusCode {
    #[serde(rename = "OK")]
    Ok = 0,
    Canceled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    #[default]
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl StatusCode {
    pub const ALL: [StatusCode; 17] = [
        StatusCode::Ok,
        StatusCode::Canceled,
        StatusCode::Unknown,
        StatusCode::InvalidArgument,
        StatusCode::DeadlineExceeded,
        StatusCode::NotFound,
        StatusCode::AlreadyExists,
        StatusCode::PermissionDenied,
        StatusCode::ResourceExhausted,
        StatusCode::FailedPrecondition,
        StatusCode::Aborted,
        StatusCode::OutOfRange,
        StatusCode::Unimplemented,
        StatusCode::Internal,
        StatusCode::Unavailable,
        StatusCode::DataLoss,
        StatusCode::Unauthenticated,
    ];

    /// `None` outside `[0, 16]`.
    pub fn from_u32(code: u32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Name of the matching `codes.Code` constant in grpc-go.
    pub fn name(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Canceled => "Canceled",
            StatusCode::Unknown => "Unknown",
            StatusCode::InvalidArgument => "InvalidArgument",
            StatusCode::DeadlineExceeded => "DeadlineExceeded",
            StatusCode::NotFound => "NotFound",
            StatusCode::AlreadyExists => "AlreadyExists",
            StatusCode::PermissionDenied => "PermissionDenied",
            StatusCode::ResourceExhausted => "ResourceExhausted",
            StatusCode::FailedPrecondition => "FailedPrecondition",
            StatusCode::Aborted => "Aborted",
            StatusCode::OutOfRange => "OutOfRange",
            StatusCode::Unimplemented => "Unimplemented",
            StatusCode::Internal => "Internal",
            StatusCode::Unavailable => "Unavailable",
            StatusCode::DataLoss => "DataLoss",
            StatusCode::Unauthenticated => "Unauthenticated",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for StatusCode {
    type Error = u32;

    fn try_from(code: u32) -> std::result::Result<Self, Self::Error> {
        Self::from_u32(code).ok_or(code)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceDecision {
    pub name: String,
    pub full_name: String,
    pub skip: bool,
    pub methods: Vec<MethodDecision>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MethodDecision {
    pub name: String,
    pub full_name: String,
    /// Inherited from the service when the service is skipped.
    pub skip: bool,
    /// Input type as written in the generated file.
    pub input: String,
    pub output: MessageDecision,
    /// Deny the call outright instead of redacting its response.
    pub internal: bool,
    pub status_code: StatusCode,
    /// Error message with `%service%` and `%method%` substituted.
    pub err_message: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
}

impl MethodDecision {
    pub fn is_streaming(&self) -> bool {
        self.client_streaming || self.server_streaming
    }

    /// Whether the generated interceptor redacts the response payload.
    /// Streaming methods only take part in skip and internal gating.
    pub fn redacts_payload(&self) -> bool {
        !self.skip && !self.internal && !self.is_streaming()
    }

    /// `err_message` as a Go string literal.
    pub fn err_message_literal(&self) -> String {
        literal::string_literal(&self.err_message)
    }
}

/// Service-level settings each method inherits unless it sets its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessDefaults {
    pub skip: bool,
    pub internal: bool,
    pub status_code: StatusCode,
    pub err_template: String,
}

impl AccessDefaults {
    /// Resolves `service`'s options on top of the run-wide defaults.
    pub fn for_service(service: &ServiceDescriptor, options: &Options) -> Result<Self> {
        let access = &service.options;
        let status_code = match access.internal_code {
            Some(code) => validate::status_code(code, &service.full_name)?,
            None => options.default_status_code,
        };
        Ok(Self {
            skip: access.skip,
            internal: access.internal,
            status_code,
            err_template: access
                .internal_err_message
                .clone()
                .unwrap_or_else(|| options.default_error_template.clone()),
        })
    }
}

/// Replaces every `%service%` and `%method%` in `template` in a single left to
/// right pass, so substituted names are never themselves rescanned.
pub fn substitute_placeholders(template: &str, service: &str, method: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix(SERVICE_PLACEHOLDER) {
            out.push_str(service);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(METHOD_PLACEHOLDER) {
            out.push_str(method);
            rest = after;
        } else {
            out.push('%');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Resolves every method of `service`.
///
/// An invalid service-level status code fails the whole service. Method
/// failures are collected and the service fails once all methods were tried.
pub fn resolve_service(
    service: &ServiceDescriptor,
    options: &Options,
    qualifier: &dyn Qualifier,
) -> std::result::Result<ServiceDecision, Diagnostics> {
    let defaults = AccessDefaults::for_service(service, options)?;

    let mut diagnostics = Diagnostics::new();
    let mut methods = Vec::with_capacity(service.methods.len());
    for method in &service.methods {
        match resolve_method(service, method, &defaults, qualifier) {
            Ok(decision) => methods.push(decision),
            Err(errors) => {
                diagnostics.extend(errors);
                if options.fail_fast {
                    break;
                }
            }
        }
    }

    diagnostics.into_result(ServiceDecision {
        name: service.name.clone(),
        full_name: service.full_name.clone(),
        skip: defaults.skip,
        methods,
    })
}

/// Resolves one method against its service's already resolved defaults.
pub fn resolve_method(
    service: &ServiceDescriptor,
    method: &MethodDescriptor,
    defaults: &AccessDefaults,
    qualifier: &dyn Qualifier,
) -> std::result::Result<MethodDecision, Diagnostics> {
    let location = if method.full_name.is_empty() {
        format!("{}.{}", service.full_name, method.name)
    } else {
        method.full_name.clone()
    };

    let access = resolve_access(&method.options, defaults, &location)?;
    let input = method
        .input
        .as_ref()
        .ok_or_else(|| PlanError::structural(&location, "method has no input type"))?;
    let output = method
        .output
        .as_ref()
        .ok_or_else(|| PlanError::structural(&location, "method has no output type"))?;
    let output = resolve_message(output, qualifier)?;

    Ok(MethodDecision {
        name: method.name.clone(),
        full_name: location,
        skip: access.skip,
        input: qualifier.qualify(input),
        output,
        internal: access.internal,
        status_code: access.status_code,
        err_message: substitute_placeholders(&access.err_template, &service.name, &method.name),
        client_streaming: method.client_streaming,
        server_streaming: method.server_streaming,
    })
}

/// Skipped methods are passed through, so their own access options are not
/// checked.
fn resolve_access(
    access: &AccessOptions,
    defaults: &AccessDefaults,
    location: &str,
) -> Result<AccessDefaults> {
    if defaults.skip || access.skip {
        return Ok(AccessDefaults {
            skip: true,
            internal: false,
            ..defaults.clone()
        });
    }
    let status_code = match access.internal_code {
        Some(code) => validate::status_code(code, location)?,
        None => defaults.status_code,
    };
    Ok(AccessDefaults {
        skip: false,
        internal: defaults.internal || access.internal,
        status_code,
        err_template: access
            .internal_err_message
            .clone()
            .unwrap_or_else(|| defaults.err_template.clone()),
    })
}
