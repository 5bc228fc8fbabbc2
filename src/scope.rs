//! Variable-scope filtering for nested rendering contexts.
//!
//! When a caller exposes "all currently defined variables" to a nested
//! scope (mixin or partial invocation), host-environment superglobals
//! and engine-internal bindings must not leak through. The reserved set
//! is fixed and process-wide.

use std::collections::HashSet;
use std::sync::OnceLock;

use indexmap::IndexMap;
use tracing::instrument;

/// Variable names excluded from scope propagation: request/session
/// superglobals of the host environment plus engine-internal names.
pub const IGNORED_SCOPE_VARIABLES: &[&str] = &[
    "GLOBALS",
    "_SERVER",
    "_GET",
    "_POST",
    "_FILES",
    "_REQUEST",
    "_SESSION",
    "_ENV",
    "_COOKIE",
    "php_errormsg",
    "HTTP_RAW_POST_DATA",
    "http_response_header",
    "argc",
    "argv",
    "__scope",
    "__arguments",
    "__ignore",
    "__block",
];

/// The reserved names as a lookup set, initialized once per process and
/// read-only thereafter.
pub fn ignored_scope_variables() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| IGNORED_SCOPE_VARIABLES.iter().copied().collect())
}

/// Returns the caller's bindings with every reserved name stripped,
/// preserving the remaining entries and their order.
#[instrument(level = "trace", skip(defined))]
pub fn create_scope<V>(mut defined: IndexMap<String, V>) -> IndexMap<String, V> {
    let ignored = ignored_scope_variables();
    defined.retain(|name, _| !ignored.contains(name.as_str()));
    defined
}
