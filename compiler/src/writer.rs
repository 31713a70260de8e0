/// One level of indentation in generated code.
pub const INDENT: &str = "    ";

/// Ordered text buffer with an indentation depth.
///
/// Depth only changes inside [`CodeWriter::indented`], which restores it
/// when the closure returns, so every push has exactly one pop.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buffer: String,
    depth:  usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current depth. Empty lines carry no indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buffer.push_str(INDENT);
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Runs `f` one level deeper.
    pub fn indented<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Writes `open`, the indented body produced by `f`, then `close`.
    pub fn block<R>(&mut self, open: impl AsRef<str>, close: impl AsRef<str>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.line(open);
        let result = self.indented(f);
        self.line(close);
        result
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
