//! Dispatch of generic attributes to per-type restore handlers.

use crate::error::{MetadataError, RestoreError};
use crate::node::{GenericAttribute, GenericAttributeType};
use crate::unknown::UnknownTypeLog;
use logging::trace_generic;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Restores one generic attribute type onto a path.
pub trait GenericAttributeHandler: Send + Sync {
    /// Applies `value` to `path`.
    fn restore(&self, path: &Path, value: &[u8]) -> Result<(), RestoreError>;
}

impl<F> GenericAttributeHandler for F
where
    F: Fn(&Path, &[u8]) -> Result<(), RestoreError> + Send + Sync,
{
    fn restore(&self, path: &Path, value: &[u8]) -> Result<(), RestoreError> {
        self(path, value)
    }
}

/// The set of generic attribute types a platform knows how to restore.
///
/// Types without a handler are recorded in the [`UnknownTypeLog`] and
/// otherwise ignored; a node captured on one OS therefore restores cleanly on
/// another.
#[derive(Default)]
pub struct GenericAttributeRegistry {
    handlers: HashMap<GenericAttributeType, Box<dyn GenericAttributeHandler>>,
}

impl GenericAttributeRegistry {
    /// Creates a registry that understands nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler` for `kind`, replacing any previous one.
    pub fn register<H>(&mut self, kind: GenericAttributeType, handler: H)
    where
        H: GenericAttributeHandler + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<H>(mut self, kind: GenericAttributeType, handler: H) -> Self
    where
        H: GenericAttributeHandler + 'static,
    {
        self.register(kind, handler);
        self
    }

    /// Reports whether a handler exists for `kind`.
    #[must_use]
    pub fn understands(&self, kind: &GenericAttributeType) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Returns the handled types in sorted order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&GenericAttributeType> {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        kinds
    }

    /// Restores every attribute in `attrs`.
    ///
    /// A failing handler does not stop the others; all failures are returned
    /// together once every attribute has been tried.
    pub fn restore_all(
        &self,
        path: &Path,
        attrs: &[GenericAttribute],
        unknown: &UnknownTypeLog,
    ) -> Result<(), RestoreError> {
        let mut failures: Vec<MetadataError> = Vec::new();
        for attr in attrs {
            match self.handlers.get(&attr.kind) {
                Some(handler) => {
                    if let Err(err) = handler.restore(path, &attr.value) {
                        trace_generic!(
                            debug,
                            "restoring {} on {} failed: {}",
                            attr.kind,
                            path.display(),
                            err
                        );
                        failures.extend(err.into_failures());
                    }
                }
                None => {
                    unknown.record(&attr.kind);
                }
            }
        }
        RestoreError::check(path, failures)
    }
}

impl fmt::Debug for GenericAttributeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericAttributeRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
