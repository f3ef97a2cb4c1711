use super::span::Span;
use super::token::Token;

use std::fmt;

#[derive(Debug)]
pub enum ParserError {
    ExpectedToken(Token, Span, Token),
    ExpectedExpr(Span, Token),
    ExpectedIdentifier(Span),
    ExpectedHashPair(Span),
    IllegalToken(Span, String),
}

pub type ParserResult<T> = Result<T, ParserError>;

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParserError::ExpectedToken(expected, span, got) => {
                write!(
                    f,
                    "Expected next token {:?} on line {}, but instead got {:?}.",
                    expected, span.line, got
                )
            }
            ParserError::ExpectedExpr(span, got) => {
                write!(
                    f,
                    "No prefix parse rule for {:?} on line {}.",
                    got, span.line
                )
            }
            ParserError::ExpectedIdentifier(span) => {
                write!(f, "Expected identifier on line {}.", span.line)
            }
            ParserError::ExpectedHashPair(span) => {
                write!(f, "Invalid hash pair on line {}.", span.line)
            }
            ParserError::IllegalToken(span, string) => {
                write!(f, "Illegal token on line {}: {}", span.line, string)
            }
        }
    }
}
