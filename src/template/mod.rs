//! # Templates
//!
//! Templates are written in [Tera](https://keats.github.io/tera/) syntax and
//! resolved by virtual path through a [`MountSet`](crate::overlay::MountSet).
//!
//! - **`CompiledTemplate`**: the parsed, immutable form of one template,
//!   named by its absolute virtual path. Cloning it is a deep copy.
//! - **`TemplateCache`** (`cache`): compiles each virtual path at most once
//!   and hands out clones.
//! - **`Template`**: a clone handed out by the cache. Executing it binds a
//!   fresh [`Functions`] table to the clone, never to the cached copy.
//! - **`Callables`**: a table of named functions and filters registered on
//!   the engine. [`Builtins`] are bound at compile time, [`Functions`] at
//!   execution time.
//!
//! Inside a template the following callables are available:
//!
//! | Callable | Result |
//! |----------|--------|
//! | `filename()` | virtual path of the executing template |
//! | `dirs(pattern=...)` | virtual directories matching a glob |
//! | `files(pattern=...)` | virtual files matching a glob |
//! | `include(path=..., data=...)` | another template, rendered |
//! | `includeText(path=...)` | another file, verbatim |
//! | `globFilter(pattern=...)` | filter keeping list items matching a glob |
//! | `require` | filter/function failing on empty values |

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tera::{Context, Tera};

use crate::error::{Error, Result};

pub mod builtins;
pub mod cache;
pub mod functions;

pub use builtins::Builtins;
pub use cache::TemplateCache;
pub use functions::Functions;

/// A table of named callables the engine can bind to a template.
pub trait Callables: Send + Sync {
    /// Register every callable of the table on `tera`.
    fn register(&self, tera: &mut Tera);
}

/// Engine options applied when a template is compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Template name suffixes for which HTML autoescaping is enabled.
    ///
    /// Empty by default: generated files are plain text.
    pub autoescape: Vec<&'static str>,
}

/// The parsed, reusable form of one template source.
#[derive(Clone)]
pub struct CompiledTemplate {
    name: String,
    tera: Tera,
}

impl CompiledTemplate {
    /// Parse `source` as the template `name`, with `base` callables bound.
    pub fn compile(
        name: &str,
        source: &str,
        base: &dyn Callables,
        options: &Options,
    ) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(options.autoescape.clone());
        base.register(&mut tera);

        tera.add_raw_template(name, source)
            .map_err(|e| Error::Compile {
                name: name.to_string(),
                message: describe(&e),
            })?;

        Ok(Self {
            name: name.to_string(),
            tera,
        })
    }

    /// The absolute virtual path the template was compiled from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render a copy of the template with `callables` bound to it.
    pub fn render(&self, callables: &dyn Callables, data: &Value) -> Result<String> {
        let mut tera = self.tera.clone();
        callables.register(&mut tera);

        let context = context_from(&self.name, data)?;
        tera.render(&self.name, &context)
            .map_err(|e| Error::Execution {
                name: self.name.clone(),
                message: describe(&e),
            })
    }
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A template handed out by a [`TemplateCache`], ready to execute.
#[derive(Debug, Clone)]
pub struct Template {
    compiled: CompiledTemplate,
    cache: Arc<TemplateCache>,
}

impl Template {
    pub(crate) fn new(compiled: CompiledTemplate, cache: Arc<TemplateCache>) -> Self {
        Self { compiled, cache }
    }

    /// The absolute virtual path of the template.
    pub fn name(&self) -> &str {
        self.compiled.name()
    }

    /// Execute the template against `data` and return the rendered text.
    pub fn execute(&self, data: &Value) -> Result<String> {
        self.execute_nested(data, 0)
    }

    /// Execute at the given include depth.
    pub(crate) fn execute_nested(&self, data: &Value, depth: usize) -> Result<String> {
        let functions = Functions::new(
            self.name(),
            Arc::clone(self.cache.mount_set()),
            Arc::clone(&self.cache),
            data.clone(),
        )
        .with_depth(depth);

        self.compiled.render(&functions, data)
    }
}

/// Build an engine context from template data.
///
/// Mappings become the top-level variables; `null` executes with no
/// variables at all.
fn context_from(name: &str, data: &Value) -> Result<Context> {
    match data {
        Value::Null => Ok(Context::new()),
        Value::Object(_) => Context::from_value(data.clone()).map_err(|e| Error::Execution {
            name: name.to_string(),
            message: describe(&e),
        }),
        other => Err(Error::Execution {
            name: name.to_string(),
            message: format!("template data must be a mapping, got {}", other),
        }),
    }
}

/// Flatten an engine error and its causes into one line.
pub(crate) fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
