//! Anchor-based patching of model source files.
//!
//! This module provides:
//! - [`Document`], a file held as lines and edited only through span replacement
//! - the three managed regions (table declaration, schema map, class doc properties)
//! - [`AnchorPatcher`], which applies them in a fixed order
//!
//! Regions are found by exact substring markers and fully regenerated, so patching the
//! output of a previous run with the same inputs changes nothing.

mod document;
mod property_block;
mod schema_block;
mod table_block;

pub use document::{Document, LINE_ENDING, ManagedBlock};
pub use property_block::{PropertyBlock, PropertyPatch};
pub use schema_block::{SCHEMA_END, SCHEMA_START, SchemaBlock, SchemaPatch, SchemaSpan, TABLE_ANCHOR};
pub use table_block::TableDeclaration;

use crate::errors::PatchError;

/// Everything synthesized for one model, ready to be merged into its file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedBlocks {
    /// Table to declare when the class does not declare one
    pub table: Option<String>,
    /// `@uses` references for the schema doc header
    pub uses: Vec<String>,
    pub schema: Vec<String>,
    pub properties: Vec<String>,
}

/// What the patcher did to each region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSummary {
    pub table_declared: bool,
    pub schema: SchemaPatch,
    pub properties: PropertyPatch,
}

pub struct AnchorPatcher<'a> {
    pub class_name: &'a str,
    pub parent: &'a str,
    pub indent: &'a str,
    pub virtual_markers: &'a [String],
}

impl AnchorPatcher<'_> {
    pub fn class_line(&self) -> String {
        format!("class {} extends {}", self.class_name, self.parent)
    }

    /// Apply table, schema and property regions in that order.
    ///
    /// The schema edit runs before the property edit so the class line is looked up in the
    /// already schema-patched document. Nothing is touched when the class line is missing.
    pub fn patch(&self, doc: &mut Document, blocks: &GeneratedBlocks) -> Result<PatchSummary, PatchError> {
        let class_line = self.class_line();
        let class_index = doc
            .find_exact(&class_line)
            .ok_or(PatchError::ClassLineMissing { line: class_line })?;

        let table_declared = match &blocks.table {
            Some(table) => TableDeclaration {
                indent: self.indent,
                table,
            }
            .apply(doc, class_index),
            None => false,
        };

        let schema = SchemaBlock {
            indent: self.indent,
            uses: &blocks.uses,
            entries: &blocks.schema,
        }
        .apply(doc)?;

        let properties = PropertyBlock {
            class_name: self.class_name,
            parent: self.parent,
            lines: &blocks.properties,
            virtual_markers: self.virtual_markers,
        }
        .apply(doc)?;

        Ok(PatchSummary {
            table_declared,
            schema,
            properties,
        })
    }
}
