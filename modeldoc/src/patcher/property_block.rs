//! `@property` lines in the class doc comment.

use once_cell::sync::Lazy;
use regex::Regex;

use super::document::{Document, ManagedBlock};
use crate::errors::PatchError;

const PROPERTY_TAG: &str = "@property";

/// `@property T $item`, `@property T[] $items`: generic placeholders written by hand.
static TEMPLATE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@property\s+T\b").expect("valid placeholder pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyPatch {
    Replaced(ManagedBlock),
    Created(usize),
}

pub struct PropertyBlock<'a> {
    /// Short class name as written in the declaration
    pub class_name: &'a str,
    pub parent: &'a str,
    pub lines: &'a [String],
    pub virtual_markers: &'a [String],
}

impl PropertyBlock<'_> {
    pub fn class_line(&self) -> String {
        format!("class {} extends {}", self.class_name, self.parent)
    }

    /// Hand-maintained lines that survive regeneration.
    ///
    /// A line we are about to emit ourselves is never treated as hand-maintained, even when
    /// its comment happens to contain a marker.
    fn is_preserved(&self, line: &str) -> bool {
        if self.lines.iter().any(|generated| generated == line) {
            return false;
        }
        TEMPLATE_PLACEHOLDER.is_match(line) || self.virtual_markers.iter().any(|m| !m.is_empty() && line.contains(m.as_str()))
    }

    pub fn apply(&self, doc: &mut Document) -> Result<PropertyPatch, PatchError> {
        let class_line = self.class_line();
        let class_index = doc
            .find_exact(&class_line)
            .ok_or(PatchError::ClassLineMissing { line: class_line })?;

        let Some(opener) = doc.doc_block_above(class_index) else {
            let mut lines = vec!["/**".to_string(), format!(" * {}", self.class_name)];
            lines.extend(self.lines.iter().cloned());
            lines.push(" */".to_string());
            log::debug!("creating class doc comment above line {}", class_index + 1);
            doc.insert(class_index, lines);
            return Ok(PropertyPatch::Created(class_index));
        };

        let block = ManagedBlock::new(opener, class_index);
        let existing = &doc.lines()[block.range()];
        let rebuilt = if existing.len() == 1 {
            self.expand_inline(&existing[0])
        } else {
            self.rebuild(existing)
        };
        log::debug!("rewriting class doc comment at lines {}..{}", block.start + 1, block.end);
        doc.replace(block, rebuilt);
        Ok(PropertyPatch::Replaced(block))
    }

    /// Drop generated `@property` lines; the fresh ones go above the closer, ahead of the kept tagged lines.
    fn rebuild(&self, existing: &[String]) -> Vec<String> {
        let Some((closer, body)) = existing.split_last() else {
            return self.lines.to_vec();
        };
        let mut kept = Vec::with_capacity(existing.len() + self.lines.len());
        let mut preserved = Vec::new();

        for line in body {
            if !line.contains(PROPERTY_TAG) {
                kept.push(line.clone());
            } else if self.is_preserved(line) {
                preserved.push(line.clone());
            }
        }

        kept.extend(self.lines.iter().cloned());
        kept.extend(preserved);
        kept.push(closer.clone());
        kept
    }

    /// `/** Title */` becomes a multi-line comment around the property lines.
    fn expand_inline(&self, line: &str) -> Vec<String> {
        let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
        let title = line.trim().trim_start_matches("/**").trim_end_matches("*/").trim();
        let mut lines = vec![format!("{indent}/**")];
        if !title.is_empty() {
            lines.push(format!("{indent} * {title}"));
        }
        lines.extend(self.lines.iter().cloned());
        lines.push(format!("{indent} */"));
        lines
    }
}
