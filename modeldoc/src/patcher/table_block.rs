//! Insert-once `protected $table` declaration.

use super::document::Document;
use super::schema_block::TABLE_ANCHOR;

pub struct TableDeclaration<'a> {
    pub indent: &'a str,
    pub table: &'a str,
}

impl TableDeclaration<'_> {
    fn lines(&self) -> Vec<String> {
        let indent = self.indent;
        vec![
            format!("{indent}/**"),
            format!("{indent} * @var string"),
            format!("{indent} */"),
            format!("{indent}{TABLE_ANCHOR} = '{}';", self.table),
            String::new(),
        ]
    }

    /// Insert the declaration into the class body opened at `class_index`.
    ///
    /// Returns `false` when the document already declares a table.
    pub fn apply(&self, doc: &mut Document, class_index: usize) -> bool {
        if doc.find(TABLE_ANCHOR, 0).is_some() {
            return false;
        }

        // The body opens either on the class line itself or on the line after it.
        let at = (class_index..=class_index + 1)
            .find(|&i| doc.line(i).is_some_and(|line| line.trim_end().ends_with('{')))
            .map_or(class_index + 1, |i| i + 1)
            .min(doc.len());

        log::debug!("declaring table '{}' at line {}", self.table, at + 1);
        doc.insert(at, self.lines());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserts_after_opening_brace() {
        let mut doc = Document::from_lines(["class UserModel extends BaseModel", "{", "}"]);
        let declaration = TableDeclaration {
            indent: "    ",
            table: "user",
        };
        assert!(declaration.apply(&mut doc, 0));
        assert_eq!(
            doc.lines(),
            &[
                "class UserModel extends BaseModel",
                "{",
                "    /**",
                "     * @var string",
                "     */",
                "    protected $table = 'user';",
                "",
                "}",
            ]
        );
        assert!(!declaration.apply(&mut doc, 0));
    }

    #[test]
    fn test_existing_declaration_is_left_alone() {
        let mut doc = Document::from_lines(["class A extends B", "{", "    protected $table = 'a';", "}"]);
        let before = doc.clone();
        assert!(
            !TableDeclaration {
                indent: "    ",
                table: "other"
            }
            .apply(&mut doc, 0)
        );
        assert_eq!(doc, before);
    }
}
