//! Per-model accumulators that turn columns, accessors and relations into aligned doc lines.
//!
//! A registry lives for exactly one model pass: the generator builds a fresh one for every
//! target and drops it once the document is patched.

mod property;
mod schema;

pub use property::{PropertyEntry, PropertyRegistry};
pub use schema::{SchemaEntry, SchemaRegistry};

use heck::ToSnakeCase;

use crate::types::KeyCase;

/// Apply the configured case convention to a property or column name.
pub fn normalize_key(name: &str, case: KeyCase) -> String {
    match case {
        KeyCase::Upper => name.to_uppercase(),
        KeyCase::Snake => name.to_snake_case(),
    }
}

/// Comments are emitted on a single line.
pub(crate) fn strip_line_breaks(comment: &str) -> String {
    comment.replace(['\r', '\n'], "")
}
