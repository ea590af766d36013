use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Var,
    TypeInt,
    TypeFloat,
    Print,
    Identifier,
    Number,
    Assign,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    End,
}

impl TokenKind {
    /// Classify an alphanumeric word against the keyword set.
    pub fn from_word(word: &str) -> Self {
        match word {
            "var" => TokenKind::Var,
            "int" => TokenKind::TypeInt,
            "float" => TokenKind::TypeFloat,
            "print" => TokenKind::Print,
            _ => TokenKind::Identifier,
        }
    }

    /// Single-character punctuation and operators.
    pub fn from_symbol(c: char) -> Option<Self> {
        Some(match c {
            '=' => TokenKind::Assign,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            _ => return None,
        })
    }
}

/// One lexeme together with where it started in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "EOF"),
            _ => write!(f, "{}", self.text),
        }
    }
}
