// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A small builder for indentation-structured block documents.

/// Accumulates the layout text: blocks open with `header {`, nest one
/// indent level per open block, and close with `}`.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    out: String,
    depth: usize,
}

impl LayoutBuilder {
    const INDENT: &'static str = "    ";

    #[must_use]
    pub fn new() -> LayoutBuilder {
        LayoutBuilder::default()
    }

    /// Append one line at the current indent level.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str(LayoutBuilder::INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    /// Open a nested block: `header {`.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    /// Close the innermost open block.
    pub fn close(&mut self) {
        debug_assert!(self.depth > 0, "close() without a matching open()");
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Consume the builder and return the document.
    #[must_use]
    pub fn finish(self) -> String {
        debug_assert!(self.depth == 0, "unbalanced open()/close()");
        self.out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nesting_and_indentation() {
        let mut out = LayoutBuilder::new();
        out.open("outer");
        out.line("a = 1");
        out.open("inner");
        out.line("b = 2");
        out.close();
        out.close();
        assert_eq!(
            out.finish(),
            "outer {\n    a = 1\n    inner {\n        b = 2\n    }\n}\n"
        );
    }

    #[test]
    fn empty_block() {
        let mut out = LayoutBuilder::new();
        out.open("empty");
        out.close();
        assert_eq!(out.finish(), "empty {\n}\n");
    }
}
