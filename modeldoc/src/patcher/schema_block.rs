//! The `protected $schema = [...]` map and its doc header.

use super::document::{Document, ManagedBlock};
use crate::errors::PatchError;

pub const SCHEMA_START: &str = "protected $schema = [";
pub const SCHEMA_END: &str = "];";
pub const TABLE_ANCHOR: &str = "protected $table";

/// What happened to the schema region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPatch {
    Replaced(ManagedBlock),
    Inserted(usize),
    /// Neither the schema sentinel nor the table anchor exists.
    NoAnchor,
}

/// Location of an existing schema block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaSpan {
    /// Doc header start through the last entry; the closing `];` is outside.
    pub block: ManagedBlock,
    pub sentinel: usize,
    /// `protected $schema = [];` written on a single line.
    pub inline: bool,
}

pub struct SchemaBlock<'a> {
    pub indent: &'a str,
    pub uses: &'a [String],
    pub entries: &'a [String],
}

impl SchemaBlock<'_> {
    fn header(&self) -> Vec<String> {
        let indent = self.indent;
        let mut header = vec![format!("{indent}/**"), format!("{indent} * @var string[]")];
        header.extend(self.uses.iter().map(|m| format!("{indent} * @uses {m}")));
        header.push(format!("{indent} */"));
        header
    }

    /// Find the managed span of an existing schema block.
    pub fn locate(doc: &Document) -> Result<Option<SchemaSpan>, PatchError> {
        let Some(sentinel) = doc.find(SCHEMA_START, 0) else {
            return Ok(None);
        };
        let start = doc.doc_block_above(sentinel).unwrap_or(sentinel);

        let line = &doc.lines()[sentinel];
        let after_start = line.find(SCHEMA_START).map_or("", |pos| &line[pos + SCHEMA_START.len()..]);
        if after_start.contains(SCHEMA_END) {
            return Ok(Some(SchemaSpan {
                block: ManagedBlock::new(start, sentinel + 1),
                sentinel,
                inline: true,
            }));
        }

        // Entry comments may contain `];`, so only a line opening with it closes the map.
        let end = doc.lines()[sentinel + 1..]
            .iter()
            .position(|line| line.trim_start().starts_with(SCHEMA_END))
            .map(|offset| sentinel + 1 + offset)
            .ok_or(PatchError::UnterminatedSchema { start: sentinel + 1 })?;
        Ok(Some(SchemaSpan {
            block: ManagedBlock::new(start, end),
            sentinel,
            inline: false,
        }))
    }

    /// Regenerate the schema block, or create it after the table declaration.
    pub fn apply(&self, doc: &mut Document) -> Result<SchemaPatch, PatchError> {
        if let Some(span) = Self::locate(doc)? {
            let mut lines = self.header();
            if span.inline {
                lines.push(format!("{}{SCHEMA_START}", self.indent));
                lines.extend(self.entries.iter().cloned());
                lines.push(format!("{}{SCHEMA_END}", self.indent));
            } else {
                lines.push(doc.lines()[span.sentinel].clone());
                lines.extend(self.entries.iter().cloned());
            }
            log::debug!("replacing schema block at lines {}..{}", span.block.start + 1, span.block.end + 1);
            doc.replace(span.block, lines);
            return Ok(SchemaPatch::Replaced(span.block));
        }

        let Some(anchor) = doc.find(TABLE_ANCHOR, 0) else {
            return Ok(SchemaPatch::NoAnchor);
        };
        let mut at = anchor + 1;
        if doc.line(at).is_some_and(|line| line.trim().is_empty()) {
            at += 1;
        }

        let mut lines = self.header();
        lines.push(format!("{}{SCHEMA_START}", self.indent));
        lines.extend(self.entries.iter().cloned());
        lines.push(format!("{}{SCHEMA_END}", self.indent));
        lines.push(String::new());
        log::debug!("inserting schema block at line {}", at + 1);
        doc.insert(at, lines);
        Ok(SchemaPatch::Inserted(at))
    }
}
