use crate::backend::{AttributeBackend, platform_backend};
use crate::error::{MetadataError, RestoreError};
use crate::node::{Node, NodeType};
use crate::options::MetadataOptions;
use crate::stat::StatT;
use crate::unknown::UnknownTypeLog;
use filetime::set_file_times;
use logging::{trace_node, trace_time};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Everything a restore needs besides the node itself.
///
/// One context is created per restore job and cloned into each worker; the
/// clones share the backend and the unknown-type log.
#[derive(Clone)]
pub struct RestoreContext {
    options: MetadataOptions,
    backend: Arc<dyn AttributeBackend>,
    unknown: Arc<UnknownTypeLog>,
}

impl RestoreContext {
    /// Creates a context using `backend` with default options.
    pub fn new(backend: Arc<dyn AttributeBackend>) -> Self {
        Self {
            options: MetadataOptions::default(),
            backend,
            unknown: Arc::new(UnknownTypeLog::new()),
        }
    }

    /// Creates a context for the backend selected on this platform.
    #[must_use]
    pub fn for_platform() -> Self {
        Self::new(platform_backend())
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: MetadataOptions) -> Self {
        self.options = options;
        self
    }

    /// Shares an existing unknown-type log, e.g. across several jobs.
    #[must_use]
    pub fn with_unknown_log(mut self, unknown: Arc<UnknownTypeLog>) -> Self {
        self.unknown = unknown;
        self
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &MetadataOptions {
        &self.options
    }

    /// Returns the backend.
    #[must_use]
    pub fn backend(&self) -> &dyn AttributeBackend {
        &*self.backend
    }

    /// Returns the unknown-type log.
    #[must_use]
    pub fn unknown_types(&self) -> &UnknownTypeLog {
        &self.unknown
    }
}

impl fmt::Debug for RestoreContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoreContext")
            .field("options", &self.options)
            .field("backend", &self.backend.name())
            .field("unknown", &self.unknown)
            .finish()
    }
}

#[cfg(unix)]
fn mode_of(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_of(metadata: &fs::Metadata) -> u32 {
    let base = if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    if metadata.is_dir() { base | 0o111 } else { base }
}

impl Node {
    /// Captures the metadata of `path` (which is not followed if it is a
    /// symlink).
    ///
    /// Generic attributes are captured first; their result decides whether
    /// extended attributes are read at all.
    pub fn capture<B>(
        path: &Path,
        backend: &B,
        options: &MetadataOptions,
    ) -> Result<Self, MetadataError>
    where
        B: AttributeBackend + ?Sized,
    {
        let metadata = fs::symlink_metadata(path)
            .map_err(|error| MetadataError::new("inspect entry", path, error))?;
        let stat = StatT::from_metadata(&metadata);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut node = Self::new(name, NodeType::from_file_type(metadata.file_type()));
        node.mode = mode_of(&metadata);
        node.atime = stat.atim();
        node.mtime = stat.mtim();
        node.ctime = stat.ctim();

        let generic = backend.fill_generic_attributes(path, &metadata, node.node_type)?;
        if options.generic_attributes_enabled() {
            node.generic_attributes = generic.attributes;
        }
        if generic.allow_extended && options.extended_attributes_enabled() {
            node.extended_attributes = backend.fill_extended_attributes(path)?;
        }

        trace_node!(
            debug,
            "captured {} {} ({} extended, {} generic) via {}",
            node.node_type,
            path.display(),
            node.extended_attributes.len(),
            node.generic_attributes.len(),
            backend.name()
        );
        Ok(node)
    }

    /// Restores this node's extended attributes, generic attributes and
    /// timestamps onto `path`.
    ///
    /// Each step runs even when an earlier one failed; every failure is
    /// collected into the returned [`RestoreError`].
    pub fn restore_metadata(&self, path: &Path, ctx: &RestoreContext) -> Result<(), RestoreError> {
        let options = ctx.options();
        let backend = ctx.backend();
        let mut failures = Vec::new();

        if options.extended_attributes_enabled() && !self.extended_attributes.is_empty() {
            let attrs = &self.extended_attributes;
            if let Err(error) = backend.restore_extended_attributes(path, attrs) {
                failures.push(error);
            }
        }

        if options.generic_attributes_enabled() && !self.generic_attributes.is_empty() {
            let attrs = &self.generic_attributes;
            let unknown = ctx.unknown_types();
            if let Err(error) = backend.restore_generic_attributes(path, attrs, unknown) {
                failures.extend(error.into_failures());
            }
        }

        if options.times_enabled() {
            if let Err(error) = self.restore_timestamps(path, backend) {
                failures.push(error);
            }
        }

        if !failures.is_empty() {
            trace_node!(debug, "{} failures restoring {}", failures.len(), path.display());
        }
        RestoreError::check(path, failures)
    }

    /// Sets the access and modification times of `path`.
    ///
    /// Symlinks are handled by the backend so the link itself is updated and
    /// the target is left alone.
    pub fn restore_timestamps<B>(&self, path: &Path, backend: &B) -> Result<(), MetadataError>
    where
        B: AttributeBackend + ?Sized,
    {
        trace_time!(
            trace,
            "restoring times on {}: atime {:?} mtime {:?}",
            path.display(),
            self.atime,
            self.mtime
        );
        if self.node_type == NodeType::Symlink {
            return backend.restore_symlink_timestamps(path, self.atime, self.mtime);
        }
        set_file_times(path, self.atime.to_file_time(), self.mtime.to_file_time())
            .map_err(|error| MetadataError::new("set timestamps", path, error))
    }
}
