use indexmap::IndexMap;

use super::{normalize_key, strip_line_breaks};
use crate::types::{KeyCase, PropertyOrigin};

/// Types documented as `string` regardless of where they came from.
const STRING_LIKE: &[&str] = &["date", "datetime"];

/// One `@property` line in the making.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    pub key: String,
    /// Distinct types in first-seen order. May contain `""` for an unresolved relation target.
    pub types: Vec<String>,
    pub comment: Option<String>,
    pub origin: PropertyOrigin,
}

impl PropertyEntry {
    /// Non-empty types joined with `|`.
    pub fn joined_types(&self) -> String {
        self.types
            .iter()
            .filter(|t| !t.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }

    fn comment_or_key(&self) -> &str {
        self.comment.as_deref().unwrap_or(&self.key)
    }
}

/// Accumulates property entries for one model, unioning types per key.
#[derive(Debug, Clone)]
pub struct PropertyRegistry {
    case: KeyCase,
    entries: IndexMap<String, PropertyEntry>,
}

impl PropertyRegistry {
    pub fn new(case: KeyCase) -> Self {
        Self {
            case,
            entries: IndexMap::new(),
        }
    }

    /// Record `ty` under the normalized `name`.
    ///
    /// The first non-empty comment for a key sticks; later ones are ignored.
    pub fn add(&mut self, name: &str, ty: &str, comment: &str, origin: PropertyOrigin) {
        let key = normalize_key(name, self.case);
        let ty = if STRING_LIKE.contains(&ty) { "string" } else { ty };

        let entry = self.entries.entry(key.clone()).or_insert_with(|| PropertyEntry {
            key,
            types: Vec::new(),
            comment: None,
            origin,
        });

        if !entry.types.iter().any(|t| t == ty) {
            entry.types.push(ty.to_string());
        }

        let comment = strip_line_breaks(comment);
        if entry.comment.is_none() && !comment.is_empty() {
            entry.comment = Some(comment);
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render one aligned ` * @property` line per entry, in insertion order.
    pub fn format(&self) -> Vec<String> {
        let joined: Vec<String> = self.entries.values().map(PropertyEntry::joined_types).collect();
        let key_width = self.entries.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        let type_width = joined.iter().map(|t| t.chars().count()).max().unwrap_or(0);

        self.entries
            .values()
            .zip(joined.iter())
            .map(|(entry, types)| {
                format!(
                    " * @property {types:<type_width$} ${key:<key_width$}  {comment}",
                    key = entry.key,
                    comment = entry.comment_or_key(),
                )
            })
            .collect()
    }
}
