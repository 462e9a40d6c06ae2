//! Go import aliases for the generated file, and type name qualification.
//!
//! Embedded message and enum types declared in another Go package are written
//! as `alias.Name`. [`Qualifier`] is the seam the resolvers use for this; the
//! [`ImportTable`] built from a file's imports is the default implementation.

use std::collections::BTreeMap;

use slog::{debug, Logger};

use crate::schema::{FileDescriptor, ImportedFile, TypeRef};

/// Imports every generated file needs, as `(alias, path)`.
pub const STANDARD_IMPORTS: [(&str, &str); 4] = [
    ("context", "context"),
    ("grpc", "google.golang.org/grpc"),
    ("codes", "google.golang.org/grpc/codes"),
    ("status", "google.golang.org/grpc/status"),
];

/// Alias under which the redaction runtime is imported.
pub const RUNTIME_ALIAS: &str = "redact";

/// Symbols referenced from every generated file so its imports stay used.
pub const STANDARD_REFERENCES: [&str; 5] = [
    "grpc.Server",
    "context.Context",
    "redact.Redactor",
    "codes.Code",
    "status.Status",
];

const MAX_IMPORT_PATH_LEN: usize = 1000;

/// Formats a type reference as it must appear in the generated file.
pub trait Qualifier {
    fn qualify(&self, type_ref: &TypeRef) -> String;
}

impl<F> Qualifier for F
where
    F: Fn(&TypeRef) -> String,
{
    fn qualify(&self, type_ref: &TypeRef) -> String {
        self(type_ref)
    }
}

/// Writes every type by its bare name, for files whose embedded types all
/// live in the same Go package.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalNames;

impl Qualifier for LocalNames {
    fn qualify(&self, type_ref: &TypeRef) -> String {
        type_ref.name.clone()
    }
}

/// Import aliases for one generated file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportTable {
    self_path: String,
    path_to_alias: BTreeMap<String, String>,
    alias_to_path: BTreeMap<String, String>,
    references: Vec<String>,
}

impl ImportTable {
    /// Starts a table holding the standard imports and the redaction runtime
    /// at `runtime_path`.
    pub fn new(self_path: impl Into<String>, runtime_path: &str) -> Self {
        let mut table = Self {
            self_path: self_path.into(),
            ..Self::default()
        };
        for (alias, path) in STANDARD_IMPORTS {
            table.insert(alias.to_string(), path.to_string());
        }
        table.insert(RUNTIME_ALIAS.to_string(), runtime_path.to_string());
        table.references = STANDARD_REFERENCES.iter().map(ToString::to_string).collect();
        table
    }

    /// Builds the table for `file`, aliasing each import that exposes usable
    /// types.
    pub fn for_file(file: &FileDescriptor, runtime_path: &str, logger: &Logger) -> Self {
        let mut table = Self::new(file.import_path.clone(), runtime_path);
        for import in &file.imports {
            table.register(import, logger);
        }
        debug!(logger, "import references generated"; "count" => table.references.len());
        table
    }

    /// Adds `import` and returns its alias, or `None` when it is skipped.
    ///
    /// Self-imports, already known paths, imports without messages, enums or
    /// services, and imports with an invalid path or package name are skipped.
    /// A package name that is already taken gets the first free numeric
    /// suffix.
    pub fn register(&mut self, import: &ImportedFile, logger: &Logger) -> Option<String> {
        let path = import.import_path.as_str();
        if let Err(reason) = check_import_path(path) {
            debug!(logger, "skipping invalid import path"; "path" => path, "reason" => reason);
            return None;
        }
        if path == self.self_path || self.path_to_alias.contains_key(path) {
            return None;
        }
        let Some(symbol) = import.first_symbol.as_ref() else {
            debug!(logger, "skipping import without usable types"; "path" => path);
            return None;
        };
        if let Err(reason) = check_package_name(&import.package_name) {
            debug!(
                logger,
                "skipping import with invalid package name";
                "path" => path,
                "package" => &import.package_name,
                "reason" => reason
            );
            return None;
        }

        let mut alias = import.package_name.clone();
        if self.alias_to_path.contains_key(&alias) {
            let mut suffix = 1_usize;
            while self
                .alias_to_path
                .contains_key(&format!("{}{suffix}", import.package_name))
            {
                suffix += 1;
            }
            alias = format!("{}{suffix}", import.package_name);
            debug!(logger, "resolved import alias conflict"; "path" => path, "alias" => &alias);
        }

        self.insert(alias.clone(), path.to_string());
        self.references.push(format!("{alias}.{}", symbol.name));
        Some(alias)
    }

    pub fn alias_for(&self, path: &str) -> Option<&str> {
        self.path_to_alias.get(path).map(String::as_str)
    }

    /// Alias to import path, for the generated import block.
    pub fn imports(&self) -> &BTreeMap<String, String> {
        &self.alias_to_path
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    fn insert(&mut self, alias: String, path: String) {
        self.path_to_alias.insert(path.clone(), alias.clone());
        self.alias_to_path.insert(alias, path);
    }
}

impl Qualifier for ImportTable {
    fn qualify(&self, type_ref: &TypeRef) -> String {
        if type_ref.import_path.is_empty() || type_ref.import_path == self.self_path {
            return type_ref.name.clone();
        }
        match self.path_to_alias.get(&type_ref.import_path) {
            Some(alias) => format!("{alias}.{}", type_ref.name),
            None => type_ref.name.clone(),
        }
    }
}

fn check_import_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("import path is empty".to_string());
    }
    if path.len() > MAX_IMPORT_PATH_LEN {
        return Err(format!("import path too long: {} characters", path.len()));
    }
    Ok(())
}

fn check_package_name(name: &str) -> Result<(), String> {
    match name.chars().next() {
        None => Err("package name is empty".to_string()),
        Some(first) if first.is_ascii_digit() => {
            Err(format!("package name starts with a digit: {name}"))
        }
        Some(_) => Ok(()),
    }
}
