//! Callables bound to one template execution.
//!
//! A [`Functions`] table knows which template is executing, which mount set
//! it reads through and which data it executes against. It is created fresh
//! for every execution and registered on a private copy of the compiled
//! template, so concurrent executions never observe each other's bindings.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use serde_json::Value;
use tera::Tera;

use super::{Callables, TemplateCache};
use crate::error::{Error, Result};
use crate::overlay::MountSet;
use crate::path;

/// Deepest chain of nested `include` calls allowed before failing.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Per-execution callables: `filename`, `dirs`, `files`, `include` and
/// `includeText`.
#[derive(Debug, Clone)]
pub struct Functions {
    filename: String,
    mounts: Arc<MountSet>,
    cache: Arc<TemplateCache>,
    data: Arc<Value>,
    depth: usize,
}

impl Functions {
    pub fn new(
        filename: &str,
        mounts: Arc<MountSet>,
        cache: Arc<TemplateCache>,
        data: Value,
    ) -> Self {
        Self {
            filename: filename.to_string(),
            mounts,
            cache,
            data: Arc::new(data),
            depth: 0,
        }
    }

    pub(crate) fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Virtual path of the executing template.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Virtual directories matching `pattern`.
    pub fn dirs(&self, pattern: &str) -> Result<Vec<String>> {
        self.mounts.directories(pattern)
    }

    /// Virtual files matching `pattern`.
    pub fn files(&self, pattern: &str) -> Result<Vec<String>> {
        self.mounts.files(pattern)
    }

    /// Resolve `target` against the directory of the executing template.
    ///
    /// Absolute paths are only cleaned.
    pub fn resolve_path(&self, target: &str) -> String {
        if path::is_absolute(target) {
            path::clean(target)
        } else {
            path::join(&path::parent(&self.filename), target)
        }
    }

    /// Render the template at `target`.
    ///
    /// Without `data` the included template sees the caller's data.
    pub fn include(&self, target: &str, data: Option<&Value>) -> Result<String> {
        let resolved = self.resolve_path(target);
        debug!("{} includes {}", self.filename, resolved);

        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(included(
                &resolved,
                Error::Execution {
                    name: self.filename.clone(),
                    message: format!("include nested deeper than {}", MAX_INCLUDE_DEPTH),
                },
            ));
        }

        let template = self
            .cache
            .resolve(&resolved)
            .map_err(|e| included(&resolved, e))?;
        template
            .execute_nested(data.unwrap_or(&self.data), self.depth + 1)
            .map_err(|e| included(&resolved, e))
    }

    /// Read the file at `target` verbatim.
    pub fn include_text(&self, target: &str) -> Result<String> {
        let resolved = self.resolve_path(target);
        self.mounts
            .read_to_string(&resolved)
            .map_err(|e| included(&resolved, e))
    }
}

impl Callables for Functions {
    fn register(&self, tera: &mut Tera) {
        let this = self.clone();
        tera.register_function("filename", move |_: &HashMap<String, Value>| -> tera::Result<Value> {
            Ok(Value::String(this.filename().to_string()))
        });

        let this = self.clone();
        tera.register_function("dirs", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
            let pattern = string_arg(args, "dirs", "pattern")?;
            this.dirs(pattern).map(string_list).map_err(engine_error)
        });

        let this = self.clone();
        tera.register_function("files", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
            let pattern = string_arg(args, "files", "pattern")?;
            this.files(pattern).map(string_list).map_err(engine_error)
        });

        let this = self.clone();
        tera.register_function("include", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
            let target = string_arg(args, "include", "path")?;
            this.include(target, args.get("data"))
                .map(Value::String)
                .map_err(engine_error)
        });

        let this = self.clone();
        tera.register_function("includeText", move |args: &HashMap<String, Value>| -> tera::Result<Value> {
            let target = string_arg(args, "includeText", "path")?;
            this.include_text(target)
                .map(Value::String)
                .map_err(engine_error)
        });
    }
}

fn included(target: &str, source: Error) -> Error {
    Error::Include {
        path: target.to_string(),
        source: Box::new(source),
    }
}

fn engine_error(err: Error) -> tera::Error {
    tera::Error::msg(err.to_string())
}

fn string_list(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

/// Fetch a required string argument of a template callable.
pub(crate) fn string_arg<'a>(
    args: &'a HashMap<String, Value>,
    callable: &str,
    name: &str,
) -> tera::Result<&'a str> {
    match args.get(name) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(tera::Error::msg(format!(
            "{}: argument '{}' must be a string, got {}",
            callable, name, other
        ))),
        None => Err(tera::Error::msg(format!(
            "{}: missing argument '{}'",
            callable, name
        ))),
    }
}
