//! Per-file driver.
//!
//! [`Planner::plan_file`] resolves every message and service of one file and
//! hands back a [`ProtoFileData`] for the renderer. Failures are collected
//! across the whole file unless [`Options::with_fail_fast`] is set; a file
//! with any failure yields no data at all.

use std::collections::BTreeMap;

use serde::Serialize;
use slog::{debug, info, o, warn, Logger};

use crate::{
    config::Options,
    diagnostics::Diagnostics,
    error::PlanError,
    imports::ImportTable,
    message::{resolve_message, MessageDecision},
    schema::FileDescriptor,
    service::{resolve_service, ServiceDecision},
};

/// Everything the renderer needs for one generated file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProtoFileData {
    /// Source `.proto` path.
    pub source: String,
    pub package: String,
    /// Alias to Go import path.
    pub imports: BTreeMap<String, String>,
    /// Qualified symbols referenced to keep every import used.
    pub references: Vec<String>,
    pub messages: Vec<MessageDecision>,
    pub services: Vec<ServiceDecision>,
}

impl ProtoFileData {
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Plans files under one set of [`Options`].
#[derive(Clone, Debug)]
pub struct Planner {
    options: Options,
    logger: Logger,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Planner {
    /// A planner that logs nowhere.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            logger: Logger::root(slog::Discard, o!()),
        }
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Plans `file`. Returns `Ok(None)` for files marked `(redact.file_skip)`.
    pub fn plan_file(&self, file: &FileDescriptor) -> Result<Option<ProtoFileData>, Diagnostics> {
        let logger = self.logger.new(o!("file" => file.name.clone()));
        if file.skip {
            info!(logger, "file skipped");
            return Ok(None);
        }
        if file.package.trim().is_empty() {
            let error = PlanError::structural(&file.name, "file has no Go package name");
            warn!(logger, "redaction error"; "location" => error.location(), "error" => %error);
            return Err(error.into());
        }

        let imports = ImportTable::for_file(file, self.options.runtime_import(), &logger);
        let mut diagnostics = Diagnostics::new();

        let mut messages = Vec::with_capacity(file.messages.len());
        for message in &file.messages {
            if self.stopped(&diagnostics) {
                break;
            }
            match resolve_message(message, &imports) {
                Ok(decision) => {
                    if decision.is_ignored() {
                        info!(logger, "message ignored"; "message" => &decision.full_name);
                    }
                    messages.push(decision);
                }
                Err(errors) => record(&logger, &mut diagnostics, errors),
            }
        }

        let mut services = Vec::with_capacity(file.services.len());
        for service in &file.services {
            if self.stopped(&diagnostics) {
                break;
            }
            match resolve_service(service, &self.options, &imports) {
                Ok(decision) => {
                    log_service(&logger, &decision);
                    services.push(decision);
                }
                Err(errors) => record(&logger, &mut diagnostics, errors),
            }
        }

        debug!(
            logger,
            "file planned";
            "messages" => messages.len(),
            "services" => services.len(),
            "errors" => diagnostics.len()
        );
        diagnostics.into_result(Some(ProtoFileData {
            source: file.name.clone(),
            package: file.package.clone(),
            imports: imports.imports().clone(),
            references: imports.references().to_vec(),
            messages,
            services,
        }))
    }

    fn stopped(&self, diagnostics: &Diagnostics) -> bool {
        self.options.fail_fast() && !diagnostics.is_empty()
    }
}

/// A message that is also a method output fails again inside its service;
/// each distinct error is recorded once per file.
fn record(logger: &Logger, diagnostics: &mut Diagnostics, errors: Diagnostics) {
    for error in errors {
        if diagnostics.contains(&error) {
            continue;
        }
        warn!(logger, "redaction error"; "location" => error.location(), "error" => %error);
        diagnostics.push(error);
    }
}

fn log_service(logger: &Logger, service: &ServiceDecision) {
    if service.skip {
        info!(logger, "service skipped"; "service" => &service.full_name);
    }
    for method in &service.methods {
        if method.skip && !service.skip {
            info!(logger, "method skipped"; "method" => &method.full_name);
        } else if method.internal {
            debug!(
                logger,
                "method denied";
                "method" => &method.full_name,
                "status" => method.status_code
            );
        }
        #[cfg(feature = "json")]
        slog::trace!(
            logger,
            "method resolved";
            "method" => &method.full_name,
            "decision" => crate::logging::DecisionJson::of(method)
        );
    }
}
