//! Statement lexer for Doxyfile text
//!
//! The input is line oriented: each statement is `VARIABLE (=|+=) value...`
//! on one logical line, where a standalone trailing `\` continues the
//! statement on the next physical line and lines starting with `#` are
//! comments. The lexer keeps an explicit byte cursor into the input slice
//! rather than re-slicing a mutable buffer, and yields values as
//! [`Cow`] — borrowed for bare tokens, owned only when a quoted string
//! contains escapes.

use crate::error::LexError;
use std::borrow::Cow;
use std::fmt;

/// Assignment operator of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=` — replace the key's value list
    Assign,
    /// `+=` — append to the key's value list
    Append,
}

impl Operator {
    /// The source form of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::Append => "+=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Pull-based lexer over one configuration file
///
/// Drive it with [`var`](Lexer::var), then [`op`](Lexer::op), then the
/// value iteration ([`next_value`](Lexer::next_value) or
/// [`values`](Lexer::values)) until it reports the end of the statement.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Cursor into `input`; always within the current trimmed line
    pos: usize,
    /// Exclusive end of the current trimmed line
    end: usize,
    /// Start offset of the next unread physical line
    next_line: usize,
    /// 1-based number of the physical line the cursor is on
    line: usize,
    eof: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `input`
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            end: 0,
            next_line: 0,
            line: 0,
            eof: false,
        }
    }

    /// 1-based physical line of the current buffer (0 before any line is read)
    pub fn line(&self) -> usize {
        self.line
    }

    /// Remainder of the current logical line
    fn buffer(&self) -> &'a str {
        &self.input[self.pos..self.end]
    }

    /// Loads the next physical line, trimmed, into the buffer
    fn read_line(&mut self) {
        if self.next_line >= self.input.len() {
            self.eof = true;
            self.pos = self.end;
            return;
        }
        let start = self.next_line;
        let (line_end, next) = match self.input[start..].find('\n') {
            Some(i) => (start + i, start + i + 1),
            None => (self.input.len(), self.input.len()),
        };
        self.line += 1;
        self.next_line = next;
        let raw = &self.input[start..line_end];
        let leading = raw.len() - raw.trim_start().len();
        self.pos = start + leading;
        self.end = self.pos + raw.trim().len();
    }

    /// Skips token separators: whitespace, then continuation and comments
    ///
    /// A buffer starting with `\` abandons the rest of the physical line
    /// and continues on the next one; a buffer starting with `#` ends the
    /// logical line (trailing comment).
    fn skip_separators(&mut self) {
        let trimmed = self.buffer().trim_start();
        self.pos = self.end - trimmed.len();
        while self.buffer().starts_with('\\') && !self.eof {
            self.read_line();
            let trimmed = self.buffer().trim_start();
            self.pos = self.end - trimmed.len();
        }
        if self.buffer().starts_with('#') {
            self.pos = self.end;
        }
    }

    /// Consumes `len` bytes of the buffer and skips following separators
    fn advance(&mut self, len: usize) {
        self.pos += len;
        self.skip_separators();
    }

    /// Refills the buffer across blank and comment lines
    fn fill_buffer(&mut self) {
        while self.buffer().is_empty() && !self.eof {
            self.read_line();
            self.skip_separators();
        }
    }

    /// Reads the variable name starting the next statement
    ///
    /// Reads ahead across physical lines. `Ok(None)` signals the end of the
    /// input (normal parse termination). Anything not matching `[@A-Z_]+`
    /// where a variable is expected is an [`LexError::UnexpectedCharacter`].
    pub fn var(&mut self) -> Result<Option<&'a str>, LexError> {
        if self.buffer().is_empty() {
            self.fill_buffer();
        }
        let buf = self.buffer();
        let Some(first) = buf.chars().next() else {
            return Ok(None);
        };
        if !matches!(first, '@' | '_' | 'A'..='Z') {
            return Err(LexError::UnexpectedCharacter {
                character: first,
                line: self.line,
            });
        }
        let len = buf
            .bytes()
            .take_while(|b| matches!(b, b'@' | b'_' | b'A'..=b'Z'))
            .count();
        let name = &buf[..len];
        self.advance(len);
        Ok(Some(name))
    }

    /// Reads the assignment operator, if one is next in the buffer
    ///
    /// Does not read ahead: the operator must follow the variable name on
    /// the same logical line. Consumes nothing on `None`.
    pub fn op(&mut self) -> Option<Operator> {
        let buf = self.buffer();
        if buf.starts_with("+=") {
            self.advance(2);
            Some(Operator::Append)
        } else if buf.starts_with('=') {
            self.advance(1);
            Some(Operator::Assign)
        } else {
            None
        }
    }

    /// Reads the next value token of the current statement
    ///
    /// `Ok(None)` once the logical line is exhausted. Values are either
    /// quoted strings or bare runs of non-whitespace characters.
    pub fn next_value(&mut self) -> Result<Option<Cow<'a, str>>, LexError> {
        let buf = self.buffer();
        if buf.is_empty() {
            return Ok(None);
        }
        if buf.starts_with('"') {
            return self.quoted_value().map(Some);
        }
        let len: usize = buf
            .chars()
            .take_while(|c| !c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        let token = &buf[..len];
        self.advance(len);
        Ok(Some(Cow::Borrowed(token)))
    }

    /// Iterator over the remaining values of the current statement
    pub fn values(&mut self) -> Values<'_, 'a> {
        Values { lexer: self }
    }

    /// Scans a quoted string starting at the opening `"`
    ///
    /// Inside the quotes a backslash followed by any character emits that
    /// character literally; no other escape decoding happens. The closing
    /// quote must appear before the end of the physical line.
    fn quoted_value(&mut self) -> Result<Cow<'a, str>, LexError> {
        let line = self.line;
        let buf = &self.buffer()[1..];
        let mut chars = buf.char_indices();
        let mut owned: Option<String> = None;
        let mut segment_start = 0;
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    let value = match owned {
                        Some(mut s) => {
                            s.push_str(&buf[segment_start..i]);
                            Cow::Owned(s)
                        }
                        None => Cow::Borrowed(&buf[..i]),
                    };
                    self.advance(1 + i + 1);
                    return Ok(value);
                }
                '\\' => {
                    let Some((next, escaped)) = chars.next() else {
                        return Err(LexError::UnterminatedString { line });
                    };
                    let s = owned.get_or_insert_with(|| String::with_capacity(buf.len()));
                    s.push_str(&buf[segment_start..i]);
                    s.push(escaped);
                    segment_start = next + escaped.len_utf8();
                }
                _ => {}
            }
        }
        Err(LexError::UnterminatedString { line })
    }
}

/// Iterator over the value tokens of one statement
///
/// Returned by [`Lexer::values`]; ends when the current logical line is
/// exhausted.
pub struct Values<'l, 'a> {
    lexer: &'l mut Lexer<'a>,
}

impl<'a> Iterator for Values<'_, 'a> {
    type Item = Result<Cow<'a, str>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.next_value().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_values(lexer: &mut Lexer<'_>) -> Vec<String> {
        lexer
            .values()
            .map(|v| v.expect("lex error").into_owned())
            .collect()
    }

    #[test]
    fn lexes_a_simple_statement() {
        let mut lexer = Lexer::new("INPUT = src doc\n");
        assert_eq!(lexer.var().unwrap(), Some("INPUT"));
        assert_eq!(lexer.op(), Some(Operator::Assign));
        assert_eq!(collect_values(&mut lexer), ["src", "doc"]);
        assert_eq!(lexer.var().unwrap(), None);
    }

    #[test]
    fn lexes_append_operator() {
        let mut lexer = Lexer::new("INPUT += more\n");
        assert_eq!(lexer.var().unwrap(), Some("INPUT"));
        assert_eq!(lexer.op(), Some(Operator::Append));
        assert_eq!(collect_values(&mut lexer), ["more"]);
    }

    #[test]
    fn no_spaces_around_operator() {
        let mut lexer = Lexer::new("GENERATE_HTML=YES");
        assert_eq!(lexer.var().unwrap(), Some("GENERATE_HTML"));
        assert_eq!(lexer.op(), Some(Operator::Assign));
        assert_eq!(collect_values(&mut lexer), ["YES"]);
    }

    #[test]
    fn missing_operator_returns_none_without_consuming() {
        let mut lexer = Lexer::new("X value\n");
        assert_eq!(lexer.var().unwrap(), Some("X"));
        assert_eq!(lexer.op(), None);
        assert_eq!(collect_values(&mut lexer), ["value"]);
    }

    #[test]
    fn variable_names_allow_at_and_underscore() {
        let mut lexer = Lexer::new("@INCLUDE_PATH = conf\n");
        assert_eq!(lexer.var().unwrap(), Some("@INCLUDE_PATH"));
    }

    #[test]
    fn rejects_lowercase_variable() {
        let mut lexer = Lexer::new("input = src\n");
        let err = lexer.var().unwrap_err();
        assert!(matches!(
            err,
            LexError::UnexpectedCharacter {
                character: 'i',
                line: 1
            }
        ));
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let mut lexer = Lexer::new("\n# header comment\n\n   # indented comment\nX = 1\n");
        assert_eq!(lexer.var().unwrap(), Some("X"));
        assert_eq!(lexer.line(), 5);
    }

    #[test]
    fn trailing_comment_ends_the_statement() {
        let mut lexer = Lexer::new("X = a b # trailing\nY = 2\n");
        assert_eq!(lexer.var().unwrap(), Some("X"));
        assert_eq!(lexer.op(), Some(Operator::Assign));
        assert_eq!(collect_values(&mut lexer), ["a", "b"]);
        assert_eq!(lexer.var().unwrap(), Some("Y"));
    }

    #[test]
    fn hash_inside_a_token_is_literal() {
        let mut lexer = Lexer::new("X = a#b\n");
        lexer.var().unwrap();
        lexer.op();
        assert_eq!(collect_values(&mut lexer), ["a#b"]);
    }

    #[test]
    fn continuation_joins_physical_lines() {
        let mut lexer = Lexer::new("X = a \\\n    b\nY = 2\n");
        assert_eq!(lexer.var().unwrap(), Some("X"));
        assert_eq!(lexer.op(), Some(Operator::Assign));
        assert_eq!(collect_values(&mut lexer), ["a", "b"]);
        assert_eq!(lexer.var().unwrap(), Some("Y"));
    }

    #[test]
    fn continuation_repeats_over_several_lines() {
        let mut lexer = Lexer::new("X = a \\\n b \\\n c\n");
        lexer.var().unwrap();
        lexer.op();
        assert_eq!(collect_values(&mut lexer), ["a", "b", "c"]);
    }

    #[test]
    fn backslash_glued_to_a_token_is_part_of_it() {
        // Only a standalone `\` continues the statement.
        let mut lexer = Lexer::new("X = a\\\nY = 2\n");
        lexer.var().unwrap();
        lexer.op();
        assert_eq!(collect_values(&mut lexer), ["a\\"]);
        assert_eq!(lexer.var().unwrap(), Some("Y"));
    }

    #[test]
    fn quoted_value_preserves_spaces() {
        let mut lexer = Lexer::new("X = \"a b  c\"\n");
        lexer.var().unwrap();
        lexer.op();
        assert_eq!(collect_values(&mut lexer), ["a b  c"]);
    }

    #[test]
    fn escaped_quote_is_literal() {
        let mut lexer = Lexer::new(r#"X = "a \" b""#);
        lexer.var().unwrap();
        lexer.op();
        assert_eq!(collect_values(&mut lexer), [r#"a " b"#]);
    }

    #[test]
    fn backslash_escapes_any_character() {
        let mut lexer = Lexer::new(r#"X = "a\nb\\c""#);
        lexer.var().unwrap();
        lexer.op();
        // `\n` is a literal `n`, not a newline; `\\` is a single backslash.
        assert_eq!(collect_values(&mut lexer), [r"anb\c"]);
    }

    #[test]
    fn empty_quoted_string_is_a_value() {
        let mut lexer = Lexer::new("X = \"\"\n");
        lexer.var().unwrap();
        lexer.op();
        assert_eq!(collect_values(&mut lexer), [""]);
    }

    #[test]
    fn quoted_and_bare_values_mix() {
        let mut lexer = Lexer::new("X = one \"two three\" four\n");
        lexer.var().unwrap();
        lexer.op();
        assert_eq!(collect_values(&mut lexer), ["one", "two three", "four"]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut lexer = Lexer::new("X = \"open\n");
        lexer.var().unwrap();
        lexer.op();
        let err = lexer.next_value().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { line: 1 }));
    }

    #[test]
    fn trailing_backslash_inside_quotes_is_an_error() {
        let mut lexer = Lexer::new("X = \"open\\");
        lexer.var().unwrap();
        lexer.op();
        assert!(matches!(
            lexer.next_value(),
            Err(LexError::UnterminatedString { line: 1 })
        ));
    }

    #[test]
    fn bare_value_without_escapes_borrows_input() {
        let mut lexer = Lexer::new("X = borrowed\n");
        lexer.var().unwrap();
        lexer.op();
        let value = lexer.next_value().unwrap().unwrap();
        assert!(matches!(value, Cow::Borrowed("borrowed")));
    }

    #[test]
    fn clean_quoted_value_borrows_input() {
        let mut lexer = Lexer::new("X = \"no escapes\"\n");
        lexer.var().unwrap();
        lexer.op();
        let value = lexer.next_value().unwrap().unwrap();
        assert!(matches!(value, Cow::Borrowed("no escapes")));
    }

    #[test]
    fn tracks_line_numbers() {
        let mut lexer = Lexer::new("A = 1\nB = 2\nC = 3\n");
        while let Some(var) = lexer.var().unwrap() {
            match var {
                "A" => assert_eq!(lexer.line(), 1),
                "B" => assert_eq!(lexer.line(), 2),
                "C" => assert_eq!(lexer.line(), 3),
                other => panic!("unexpected variable {other}"),
            }
            lexer.op();
            collect_values(&mut lexer);
        }
    }

    #[test]
    fn empty_input_terminates_immediately() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.var().unwrap(), None);
        // Calling again stays at end of input.
        assert_eq!(lexer.var().unwrap(), None);
    }

    #[test]
    fn comment_only_input_terminates() {
        let mut lexer = Lexer::new("# nothing here\n# or here\n");
        assert_eq!(lexer.var().unwrap(), None);
    }

    #[test]
    fn values_stop_at_end_of_statement() {
        let mut lexer = Lexer::new("X = 1\nY = 2\n");
        lexer.var().unwrap();
        lexer.op();
        assert_eq!(collect_values(&mut lexer), ["1"]);
        assert_eq!(lexer.next_value().unwrap(), None);
        assert_eq!(lexer.var().unwrap(), Some("Y"));
    }
}
