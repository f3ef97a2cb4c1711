use super::span::Span;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Token {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Comma,
    Semicolon,
    Colon,

    // One or two character tokens.
    Bang,
    BangEq,
    Equals,
    DoubleEq,
    LeftAngle,
    RightAngle,

    // Literals.
    Identifier(String),
    Integer(i64),
    Str(String),

    // Keywords.
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
    While,
    Null,

    LexerError(String),
    EndOfFile,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}
