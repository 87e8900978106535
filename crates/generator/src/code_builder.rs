//! Indentation-aware source builder

const INDENT: &str = "  ";

/// Accumulates lines of TypeScript at the current indentation level
#[derive(Debug, Default)]
pub struct CodeBuilder {
    buffer: String,
    level: usize,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text at the current indentation
    ///
    /// Multi-line text is indented line by line, so nested blocks rendered
    /// elsewhere keep their relative layout.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        for line in text.as_ref().split('\n') {
            if !line.is_empty() {
                for _ in 0..self.level {
                    self.buffer.push_str(INDENT);
                }
                self.buffer.push_str(line);
            }
            self.buffer.push('\n');
        }
        self
    }

    /// Emit `open`, the body one level deeper, then `close`
    pub fn block<F>(&mut self, open: impl AsRef<str>, close: impl AsRef<str>, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.line(open);
        self.level += 1;
        body(self);
        self.level -= 1;
        self.line(close)
    }

    /// Built source without the trailing newline
    pub fn finish(self) -> String {
        let mut buffer = self.buffer;
        while buffer.ends_with('\n') {
            buffer.pop();
        }
        buffer
    }
}
