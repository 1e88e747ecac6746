use super::{normalize_key, strip_line_breaks};
use crate::types::{ColumnDescriptor, KeyCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub name: String,
    pub db_type: String,
    pub comment: String,
}

/// Accumulates columns into the lines of a `protected $schema = [...]` map literal.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    case: KeyCase,
    indent: String,
    entries: Vec<SchemaEntry>,
}

impl SchemaRegistry {
    pub fn new(case: KeyCase, indent: impl Into<String>) -> Self {
        Self {
            case,
            indent: indent.into(),
            entries: Vec::new(),
        }
    }

    /// Append a column. Column names are unique per table, so nothing is deduplicated.
    pub fn add(&mut self, column: &ColumnDescriptor) {
        self.entries.push(SchemaEntry {
            name: normalize_key(&column.name, self.case),
            db_type: column.db_type.clone(),
            comment: strip_line_breaks(&column.comment),
        });
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `'name' => 'type', // comment` line per column, keys and comments aligned.
    pub fn format(&self) -> Vec<String> {
        let name_width = self.entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
        let type_width = self.entries.iter().map(|e| e.db_type.chars().count()).max().unwrap_or(0);
        let indent = &self.indent;

        self.entries
            .iter()
            .map(|entry| {
                let name = format!("'{}'", entry.name);
                let ty = format!("'{}',", entry.db_type);
                let comment = if entry.comment.is_empty() { &entry.name } else { &entry.comment };
                format!(
                    "{indent}{indent}{name:<width$} => {ty:<ty_width$} // {comment}",
                    width = name_width + 2,
                    ty_width = type_width + 3,
                )
            })
            .collect()
    }
}
