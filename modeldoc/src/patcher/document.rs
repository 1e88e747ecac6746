use std::ops::Range;

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Half-open span `[start, end)` of document lines owned by one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagedBlock {
    pub start: usize,
    pub end: usize,
}

impl ManagedBlock {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Zero-width span: replacing it inserts.
    pub fn at(index: usize) -> Self {
        Self::new(index, index)
    }

    pub fn range(self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// A file as an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split text into lines after folding `\r\n` and `\r` into `\n`.
    ///
    /// A trailing newline shows up as a final empty line, so `render` reproduces it.
    pub fn parse(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            lines: normalized.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Join lines with the platform line separator.
    pub fn render(&self) -> String {
        self.lines.join(LINE_ENDING)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// First line at or after `from` containing `needle`.
    pub fn find(&self, needle: &str, from: usize) -> Option<usize> {
        self.lines
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, line)| line.contains(needle))
            .map(|(i, _)| i)
    }

    /// First line equal to `expected`, ignoring trailing whitespace.
    pub fn find_exact(&self, expected: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.trim_end() == expected)
    }

    /// Start of the doc comment that ends on the line directly above `index`.
    ///
    /// Only a contiguous `/** ... */` block qualifies: every line between the opener and
    /// `index` must be part of the comment. Anything else (a `//` comment, code, a blank
    /// line) means there is no doc block.
    pub fn doc_block_above(&self, index: usize) -> Option<usize> {
        let closer = index.checked_sub(1)?;
        if !self.lines[closer].trim_end().ends_with("*/") {
            return None;
        }
        (0..=closer).rev().find_map(|i| {
            let line = self.lines[i].trim();
            if line.contains("/**") {
                Some(Some(i))
            } else if line.starts_with('*') {
                None
            } else {
                Some(None)
            }
        })?
    }

    /// Replace the lines of `block` with `lines` in one splice.
    pub fn replace(&mut self, block: ManagedBlock, lines: Vec<String>) {
        self.lines.splice(block.range(), lines);
    }

    pub fn insert(&mut self, index: usize, lines: Vec<String>) {
        self.replace(ManagedBlock::at(index), lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_line_endings() {
        let doc = Document::parse("a\r\nb\rc\n");
        assert_eq!(doc.lines(), &["a", "b", "c", ""]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_render_round_trips() {
        let text = "<?php\n\nclass A extends B\n{\n}\n";
        assert_eq!(Document::parse(text).render(), text);
    }

    #[test]
    fn test_doc_block_above() {
        let doc = Document::from_lines([
            "// stray",
            "/**",
            " * Title",
            " * @property int $ID",
            " */",
            "class A extends B",
        ]);
        assert_eq!(doc.doc_block_above(5), Some(1));
        assert_eq!(doc.doc_block_above(1), None);
        assert_eq!(doc.doc_block_above(0), None);
    }

    #[test]
    fn test_doc_block_must_be_contiguous() {
        let doc = Document::from_lines(["/**", " * Header", " */", "namespace app;", "", "class A extends B"]);
        assert_eq!(doc.doc_block_above(5), None);

        let inline = Document::from_lines(["/** Title */", "class A extends B"]);
        assert_eq!(inline.doc_block_above(1), Some(0));

        let broken = Document::from_lines(["/**", " * a", "$x = 1; */", "class A"]);
        assert_eq!(broken.doc_block_above(3), None);
    }

    #[test]
    fn test_replace_span() {
        let mut doc = Document::from_lines(["a", "b", "c", "d"]);
        doc.replace(ManagedBlock::new(1, 3), vec!["x".into()]);
        assert_eq!(doc.lines(), &["a", "x", "d"]);
        doc.insert(3, vec!["e".into(), "f".into()]);
        assert_eq!(doc.lines(), &["a", "x", "d", "e", "f"]);
    }

    #[test]
    fn test_find_helpers() {
        let doc = Document::from_lines(["class A extends B  ", "x", "class A extends B"]);
        assert_eq!(doc.find_exact("class A extends B"), Some(0));
        assert_eq!(doc.find("extends", 1), Some(2));
        assert_eq!(doc.find("missing", 0), None);
    }
}
