//! Indenting line writer for free-form Fortran.

/// Lines longer than this are split with `&` continuations.
pub const MAX_LINE: usize = 100;

/// Accumulates source text line by line.
///
/// Statement lines longer than [`MAX_LINE`] are broken at the last space
/// that fits, the head ending in `&` and the tail continuing on the next
/// line after a leading `&`. Comment lines are never broken.
#[derive(Debug)]
pub struct SourceWriter {
    buf: String,
    width: usize,
    level: usize,
}

impl SourceWriter {
    /// An empty writer indenting by `width` spaces per level.
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
            level: 0,
        }
    }

    fn prefix(&self) -> String {
        " ".repeat(self.width * self.level)
    }

    /// Write one statement at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let prefix = self.prefix();
        let mut rest = text.as_ref().trim_end();
        let mut first = true;
        loop {
            let lead = if first {
                prefix.clone()
            } else {
                format!("{prefix}{}& ", " ".repeat(self.width))
            };
            let mut room = MAX_LINE.saturating_sub(lead.len() + 2);
            let split = if rest.len() > room {
                while !rest.is_char_boundary(room) {
                    room -= 1;
                }
                rest[..room].rfind(' ').filter(|&i| i > 0)
            } else {
                None
            };
            match split {
                Some(i) => {
                    self.buf.push_str(&lead);
                    self.buf.push_str(&rest[..i]);
                    self.buf.push_str(" &\n");
                    rest = &rest[i + 1..];
                    first = false;
                }
                None => {
                    self.buf.push_str(&lead);
                    self.buf.push_str(rest);
                    self.buf.push('\n');
                    return;
                }
            }
        }
    }

    /// Write a comment line. Embedded newlines become separate comments.
    pub fn comment(&mut self, text: impl AsRef<str>) {
        let prefix = self.prefix();
        for line in text.as_ref().lines() {
            self.buf.push_str(&prefix);
            if line.is_empty() {
                self.buf.push_str("!\n");
            } else {
                self.buf.push_str("! ");
                self.buf.push_str(line.trim_end());
                self.buf.push('\n');
            }
        }
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Write `open`, run `body` one level deeper, then write `close`.
    pub fn block(
        &mut self,
        open: impl AsRef<str>,
        close: impl AsRef<str>,
        body: impl FnOnce(&mut Self),
    ) {
        self.line(open);
        self.level += 1;
        body(self);
        self.level -= 1;
        self.line(close);
    }

    /// Run `body` one level deeper.
    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.level += 1;
        body(self);
        self.level -= 1;
    }

    /// The text written so far.
    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_indent() {
        let mut w = SourceWriter::new(2);
        w.block("subroutine f()", "end subroutine f", |w| {
            w.line("x = 1");
            w.comment("done");
        });
        assert_eq!(w.finish(), "subroutine f()\n  x = 1\n  ! done\nend subroutine f\n");
    }

    #[test]
    fn long_lines_continue() {
        let mut w = SourceWriter::new(4);
        let terms: Vec<String> = (0..30).map(|i| format!("term_{i}")).collect();
        w.line(terms.join(" .and. "));
        let text = w.finish();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= MAX_LINE, "{line}");
        }
        for line in &lines[..lines.len() - 1] {
            assert!(line.ends_with(" &"));
        }
        for line in &lines[1..] {
            assert!(line.trim_start().starts_with("& "));
        }
        // Joining the continuations restores the statement.
        let joined: String = lines
            .iter()
            .map(|l| l.trim_start().trim_start_matches("& ").trim_end_matches(" &"))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(joined, terms.join(" .and. "));
    }

    #[test]
    fn comments_are_not_wrapped() {
        let mut w = SourceWriter::new(4);
        let long = "x".repeat(150);
        w.comment(&long);
        assert_eq!(w.finish(), format!("! {long}\n"));
    }

    proptest::proptest! {
        #[test]
        fn wrapped_statements_fit_and_rejoin(
            words in proptest::collection::vec("[a-z_()=+*]{1,24}", 1..60),
            depth in 0usize..4,
        ) {
            let statement = words.join(" ");
            let mut w = SourceWriter::new(4);
            fn nest(w: &mut SourceWriter, depth: usize, text: &str) {
                if depth == 0 {
                    w.line(text);
                } else {
                    w.indented(|w| nest(w, depth - 1, text));
                }
            }
            nest(&mut w, depth, &statement);
            let text = w.finish();
            let lines: Vec<&str> = text.lines().collect();
            for line in &lines {
                proptest::prop_assert!(line.len() <= MAX_LINE, "{}", line);
            }
            let joined: String = lines
                .iter()
                .map(|l| l.trim_start().trim_start_matches("& ").trim_end_matches(" &"))
                .collect::<Vec<_>>()
                .join(" ");
            proptest::prop_assert_eq!(joined, statement);
        }
    }
}
