//! Append-only line sink for generated scripts.

/// Receives generated script text one line at a time.
///
/// Writers only ever append: nothing a renderer has written can be
/// rewritten or removed, which is what lets a failing step leave the
/// already-emitted prefix intact.
pub trait LineWriter {
    /// Append one line at the current indentation. Embedded newlines
    /// are split and each piece indented.
    fn append_line(&mut self, line: &str);

    /// Increase indentation for subsequent lines.
    fn start_block(&mut self);

    /// Decrease indentation for subsequent lines.
    fn end_block(&mut self);
}

/// In-memory [`LineWriter`] that collects lines into a `Vec<String>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryLineWriter {
    indent: String,
    depth: usize,
    lines: Vec<String>,
}

impl Default for InMemoryLineWriter {
    fn default() -> Self {
        Self::new("  ")
    }
}

impl InMemoryLineWriter {
    /// Create an empty writer using `indent` per nesting level.
    #[must_use]
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            depth: 0,
            lines: Vec::new(),
        }
    }

    /// Lines written so far, already indented.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Current nesting depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Join all lines with `\n`, terminated by a trailing newline.
    #[must_use]
    pub fn into_string(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl LineWriter for InMemoryLineWriter {
    fn append_line(&mut self, line: &str) {
        for piece in line.split('\n') {
            if piece.is_empty() {
                self.lines.push(String::new());
            } else {
                self.lines
                    .push(format!("{}{piece}", self.indent.repeat(self.depth)));
            }
        }
    }

    fn start_block(&mut self) {
        self.depth += 1;
    }

    fn end_block(&mut self) {
        if self.depth == 0 {
            tracing::warn!("end_block called at depth 0");
            return;
        }
        self.depth -= 1;
    }
}


#[cfg(test)]
mod quickcheck_tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn every_piece_becomes_a_line(text: String, depth: u8) -> bool {
        let mut out = InMemoryLineWriter::default();
        for _ in 0..depth % 8 {
            out.start_block();
        }
        out.append_line(&text);
        out.lines().len() == text.matches('\n').count() + 1
    }

    #[quickcheck]
    fn blocks_never_go_negative(opens: u8, closes: u8) -> bool {
        let mut out = InMemoryLineWriter::default();
        for _ in 0..opens {
            out.start_block();
        }
        for _ in 0..closes {
            out.end_block();
        }
        out.depth() == usize::from(opens.saturating_sub(closes))
    }

    #[quickcheck]
    fn indented_lines_start_with_indent(line: String) -> bool {
        let mut out = InMemoryLineWriter::new("\t");
        out.start_block();
        out.append_line(&line);
        out.lines()
            .iter()
            .all(|l| l.is_empty() || l.starts_with('\t'))
    }
}
