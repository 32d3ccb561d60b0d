//! crates/logging/src/tracing_macros.rs
//! Convenience macros for subsystem-specific tracing.
//!
//! These macros provide ergonomic wrappers around standard tracing macros
//! with the targets defined by [`Subsystem`](crate::Subsystem). Callers must
//! depend on `tracing` themselves. The level is the first token:
//!
//! ```ignore
//! trace_xattr!(warn, path = %path.display(), "attribute skipped");
//! ```

/// Emit an extended attribute trace.
///
/// # Example
/// ```ignore
/// trace_xattr!(debug, "listed {} attributes", count);
/// ```
#[macro_export]
macro_rules! trace_xattr {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "attrkeep::xattr", $($arg)*);
    };
}

/// Emit a Windows EA buffer trace.
///
/// # Example
/// ```ignore
/// trace_ea!(trace, "growing EA buffer to {}", len);
/// ```
#[macro_export]
macro_rules! trace_ea {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "attrkeep::ea", $($arg)*);
    };
}

/// Emit a generic attribute dispatch trace.
///
/// # Example
/// ```ignore
/// trace_generic!(warn, "unknown generic attribute type {}", tag);
/// ```
#[macro_export]
macro_rules! trace_generic {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "attrkeep::generic", $($arg)*);
    };
}

/// Emit a timestamp trace.
///
/// # Example
/// ```ignore
/// trace_time!(debug, "restoring symlink times on {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "attrkeep::time", $($arg)*);
    };
}

/// Emit a security descriptor trace.
///
/// # Example
/// ```ignore
/// trace_acl!(debug, "descriptor not retrievable for {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_acl {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "attrkeep::acl", $($arg)*);
    };
}

/// Emit an encryption reconciliation trace.
///
/// # Example
/// ```ignore
/// trace_crypt!(debug, "retrying encrypt after clearing system flag");
/// ```
#[macro_export]
macro_rules! trace_crypt {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "attrkeep::crypt", $($arg)*);
    };
}

/// Emit a node orchestration trace.
///
/// # Example
/// ```ignore
/// trace_node!(info, "captured {}", path.display());
/// ```
#[macro_export]
macro_rules! trace_node {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(target: "attrkeep::node", $($arg)*);
    };
}
