//! On-demand scanner: hands out one token per call until `End`.

use tracing::trace;

use crate::error::{CompileResult, LexError};
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Construct a lexer over a slice of source.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    /// Produce the next token. At end of input this returns `End` without
    /// advancing.
    pub fn next_token(&mut self) -> CompileResult<Token> {
        self.eat_while(|b| b.is_ascii_whitespace());
        let start = self.pos;

        let Some(b) = self.peek() else {
            return Ok(Token::new(TokenKind::End, "", start));
        };

        let token = if b.is_ascii_digit() {
            self.number(start)?
        } else if b.is_ascii_alphabetic() {
            self.eat_while(|b| b.is_ascii_alphanumeric());
            let word = &self.src[start..self.pos];
            Token::new(TokenKind::from_word(word), word, start)
        } else {
            let ch = self.src[start..].chars().next().unwrap_or('\0');
            let kind = TokenKind::from_symbol(ch)
                .ok_or(LexError::UnexpectedChar { ch, offset: start })?;
            self.pos += ch.len_utf8();
            Token::new(kind, ch, start)
        };

        trace!(kind = ?token.kind, text = %token.text, offset = start, "token");
        Ok(token)
    }

    // digits, then optionally '.' followed by at least one digit
    fn number(&mut self, start: usize) -> CompileResult<Token> {
        self.eat_while(|b| b.is_ascii_digit());
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
                return Err(LexError::MalformedFloat { offset: self.pos }.into());
            }
            self.eat_while(|b| b.is_ascii_digit());
        }
        Ok(Token::new(TokenKind::Number, &self.src[start..self.pos], start))
    }
}

/// Scan the whole input eagerly. The returned vector always ends with `End`.
pub fn tokenize(src: &str) -> CompileResult<Vec<Token>> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.is(TokenKind::End);
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
