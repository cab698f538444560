//! Compile-once template cache keyed by absolute virtual path.
//!
//! The cache is shared by every template it hands out, so that `include`
//! calls made while rendering reuse templates compiled earlier in the run.
//! Lookups take a read lock; a miss upgrades to the write lock and checks
//! again before compiling, so each path is compiled at most once even when
//! several threads miss at the same time.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use log::debug;

use super::{Builtins, Callables, CompiledTemplate, Options, Template};
use crate::error::{Error, Result};
use crate::overlay::MountSet;
use crate::path;

/// Shared cache of compiled templates read through a mount set.
pub struct TemplateCache {
    mounts: Arc<MountSet>,
    options: Options,
    base: Arc<dyn Callables>,
    templates: RwLock<HashMap<String, CompiledTemplate>>,
}

impl TemplateCache {
    /// Create a cache over `mounts` binding the [`Builtins`] at compile time.
    pub fn new(mounts: Arc<MountSet>, options: Options) -> Self {
        Self::with_callables(mounts, options, Arc::new(Builtins))
    }

    /// Create a cache binding `base` to every template it compiles.
    pub fn with_callables(
        mounts: Arc<MountSet>,
        options: Options,
        base: Arc<dyn Callables>,
    ) -> Self {
        Self {
            mounts,
            options,
            base,
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// The mount set templates are read through.
    pub fn mount_set(&self) -> &Arc<MountSet> {
        &self.mounts
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Return an executable copy of the template at virtual path `name`,
    /// compiling it on first use.
    pub fn resolve(self: &Arc<Self>, name: &str) -> Result<Template> {
        if !path::is_absolute(name) {
            return Err(Error::AbsolutePathRequired {
                context: "template".to_string(),
                path: name.to_string(),
            });
        }
        let name = path::clean(name);

        let compiled = match self.lookup(&name)? {
            Some(compiled) => {
                debug!("Template cache hit: {}", name);
                compiled
            }
            None => self.compile(&name)?,
        };

        Ok(Template::new(compiled, Arc::clone(self)))
    }

    /// Number of compiled templates held.
    pub fn len(&self) -> Result<usize> {
        Ok(self.templates.read().map_err(|_| poisoned())?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns true if `name` has already been compiled.
    pub fn contains(&self, name: &str) -> Result<bool> {
        let templates = self.templates.read().map_err(|_| poisoned())?;
        Ok(templates.contains_key(&path::clean(name)))
    }

    fn lookup(&self, name: &str) -> Result<Option<CompiledTemplate>> {
        let templates = self.templates.read().map_err(|_| poisoned())?;
        Ok(templates.get(name).cloned())
    }

    fn compile(&self, name: &str) -> Result<CompiledTemplate> {
        let mut templates = self.templates.write().map_err(|_| poisoned())?;

        // Another thread may have compiled it while we waited for the lock.
        if let Some(compiled) = templates.get(name) {
            debug!("Template cache hit after wait: {}", name);
            return Ok(compiled.clone());
        }

        let source = self.mounts.read_to_string(name)?;
        let compiled = CompiledTemplate::compile(name, &source, self.base.as_ref(), &self.options)?;
        debug!("Compiled template {}", name);

        templates.insert(name.to_string(), compiled.clone());
        Ok(compiled)
    }
}

impl fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateCache")
            .field("mounts", &self.mounts)
            .field("options", &self.options)
            .field("templates", &self.len().ok())
            .finish_non_exhaustive()
    }
}

fn poisoned() -> Error {
    Error::LockPoisoned {
        context: "template cache".to_string(),
    }
}
