//! Sequential token cursor over WAM text.
//!
//! The single low-level read primitive of the codec. Whitespace and newlines
//! separate tokens, blank lines vanish, original order is preserved. There
//! is no lookahead and no backtracking; the grammar upstream is specified
//! tightly enough that neither is ever needed. All domain meaning lives in
//! the parser.

use crate::error::CursorError;

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    text: &'a str,
    line: u32,
}

/// Ordered, mutable cursor over the token stream of one text buffer.
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut tokens = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line_no = (i + 1) as u32;
            for word in line.split_whitespace() {
                tokens.push(Token {
                    text: word,
                    line: line_no,
                });
            }
        }
        Self { tokens, pos: 0 }
    }

    /// Line of the most recently consumed token, or 0 before any read.
    pub fn current_line(&self) -> u32 {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].line
        }
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn next_token(&mut self) -> Result<Token<'a>, CursorError> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or(CursorError::UnexpectedEof {
                line: self.tokens.last().map_or(0, |t| t.line),
            })?;
        self.pos += 1;
        Ok(token)
    }

    /// Consume exactly one token as an integer.
    pub fn read_int(&mut self) -> Result<i64, CursorError> {
        let token = self.next_token()?;
        token.text.parse::<i64>().map_err(|_| CursorError::Malformed {
            line: token.line,
            token: token.text.to_string(),
            wanted: "integer",
        })
    }

    /// Consume exactly one token as a float.
    pub fn read_float(&mut self) -> Result<f64, CursorError> {
        let token = self.next_token()?;
        token.text.parse::<f64>().map_err(|_| CursorError::Malformed {
            line: token.line,
            token: token.text.to_string(),
            wanted: "float",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_tokens_in_order_across_lines() {
        let mut cursor = TokenCursor::new("1 2\n\n  3.5\t4\n");
        assert_eq!(cursor.read_int().unwrap(), 1);
        assert_eq!(cursor.read_int().unwrap(), 2);
        assert_eq!(cursor.read_float().unwrap(), 3.5);
        assert_eq!(cursor.read_int().unwrap(), 4);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn blank_lines_are_discarded() {
        let cursor = TokenCursor::new("\n\n 7 \n\n\n 8\n");
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn eof_reports_last_line() {
        let mut cursor = TokenCursor::new("1\n2\n");
        cursor.read_int().unwrap();
        cursor.read_int().unwrap();
        let err = cursor.read_int().unwrap_err();
        assert_eq!(err, CursorError::UnexpectedEof { line: 2 });
    }

    #[test]
    fn malformed_int_names_token_and_line() {
        let mut cursor = TokenCursor::new("1\nxyz\n");
        cursor.read_int().unwrap();
        match cursor.read_int().unwrap_err() {
            CursorError::Malformed { line, token, wanted } => {
                assert_eq!(line, 2);
                assert_eq!(token, "xyz");
                assert_eq!(wanted, "integer");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn float_accepts_exponent_notation() {
        let mut cursor = TokenCursor::new("1.0E5 -2.5e-3");
        assert_eq!(cursor.read_float().unwrap(), 1.0e5);
        assert_eq!(cursor.read_float().unwrap(), -2.5e-3);
    }

    #[test]
    fn int_token_reads_as_float_too() {
        let mut cursor = TokenCursor::new("42");
        assert_eq!(cursor.read_float().unwrap(), 42.0);
    }
}
