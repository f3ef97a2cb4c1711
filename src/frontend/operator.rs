use super::token::Token;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrefixOperator {
    Negate,
    LogicalNot,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    EqualTo,
    NotEqualTo,
    GreaterThan,
    LessThan,
}

/// Token roles the Pratt loop can continue an expression with: plain binary
/// operators plus the call and index forms.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParserOperator {
    Infix(InfixOperator),
    Call,
    Index,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    // Lowest precedence
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index, // Highest precedence
}

impl PrefixOperator {
    pub fn from_token(token: &Token) -> Option<PrefixOperator> {
        match token {
            Token::Bang => Some(PrefixOperator::LogicalNot),
            Token::Minus => Some(PrefixOperator::Negate),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            PrefixOperator::LogicalNot => "!",
            PrefixOperator::Negate => "-",
        }
    }
}

impl InfixOperator {
    pub fn from_token(token: &Token) -> Option<InfixOperator> {
        let op = match token {
            Token::Plus => InfixOperator::Add,
            Token::Minus => InfixOperator::Subtract,
            Token::Asterisk => InfixOperator::Multiply,
            Token::Slash => InfixOperator::Divide,
            Token::DoubleEq => InfixOperator::EqualTo,
            Token::BangEq => InfixOperator::NotEqualTo,
            Token::RightAngle => InfixOperator::GreaterThan,
            Token::LeftAngle => InfixOperator::LessThan,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::EqualTo => "==",
            InfixOperator::NotEqualTo => "!=",
            InfixOperator::GreaterThan => ">",
            InfixOperator::LessThan => "<",
        }
    }
}

impl ParserOperator {
    pub fn from_token(token: &Token) -> Option<ParserOperator> {
        if let Some(op) = InfixOperator::from_token(token) {
            return Some(ParserOperator::Infix(op));
        }

        match token {
            Token::LeftParen => Some(ParserOperator::Call),
            Token::LeftBracket => Some(ParserOperator::Index),
            _ => None,
        }
    }

    /// Every operator here is left-associative, so the Pratt loop only
    /// continues on a strictly higher precedence.
    pub fn is_higher_precedence(&self, min_precedence: Precedence) -> bool {
        self.precedence() > min_precedence
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            ParserOperator::Infix(op) => match op {
                InfixOperator::EqualTo | InfixOperator::NotEqualTo => Precedence::Equals,
                InfixOperator::GreaterThan | InfixOperator::LessThan => Precedence::LessGreater,
                InfixOperator::Add | InfixOperator::Subtract => Precedence::Sum,
                InfixOperator::Multiply | InfixOperator::Divide => Precedence::Product,
            },
            ParserOperator::Call => Precedence::Call,
            ParserOperator::Index => Precedence::Index,
        }
    }
}
