use super::errors::{ParserError, ParserResult};
use super::grammar::{Block, Expr, ExprType, FuncInfo, Identifier, Literal, Program, Stmt, StmtType};
use super::lexer::Lexer;
use super::operator::{ParserOperator, Precedence, PrefixOperator};
use super::token::{SpannedToken, Token};

/// Pratt parser with a single token of lookahead. The first token is
/// primed at construction; statement-level errors are collected and the
/// stream resynchronized, so one pass reports as many errors as possible.
pub struct Parser<'s> {
    lexer: Lexer<'s>,
    current: SpannedToken,
    errors: Vec<ParserError>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();

        Parser {
            lexer,
            current,
            errors: vec![],
        }
    }

    /// Consumes the current token and returns it. Consuming an illegal
    /// token is a parse error.
    fn advance(&mut self) -> ParserResult<SpannedToken> {
        if let Token::LexerError(e) = &self.current.token {
            return Err(ParserError::IllegalToken(self.current.span, e.clone()));
        }

        let next = self.lexer.next_token();
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Drops the current token unconditionally, illegal or not.
    fn skip(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn at(&self, t: &Token) -> bool {
        self.current.token == *t
    }

    /// Consumes the current token when it matches.
    fn eat(&mut self, t: &Token) -> ParserResult<bool> {
        if self.at(t) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Requires the current token to match and consumes it.
    fn expect(&mut self, t: Token) -> ParserResult<()> {
        if self.at(&t) {
            self.advance()?;
            return Ok(());
        }

        if let Token::LexerError(e) = &self.current.token {
            return Err(ParserError::IllegalToken(self.current.span, e.clone()));
        }

        Err(ParserError::ExpectedToken(
            t,
            self.current.span,
            self.current.token.clone(),
        ))
    }

    pub fn parse(mut self) -> Result<Program, Vec<ParserError>> {
        let mut stmts = vec![];

        while !self.at(&Token::EndOfFile) {
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.recover();
                }
            }
        }

        if self.errors.is_empty() {
            Ok(Program { stmts })
        } else {
            Err(self.errors)
        }
    }

    /// After an error, resumes just past the next `;` (or at end of input)
    /// so the following statement can still be tried.
    fn recover(&mut self) {
        loop {
            match self.current.token {
                Token::EndOfFile => return,
                Token::Semicolon => {
                    self.skip();
                    return;
                }
                _ => self.skip(),
            }
        }
    }

    fn parse_statement(&mut self) -> ParserResult<Stmt> {
        let span = self.current.span;

        let stmt_type = match self.current.token {
            Token::Let => self.parse_let()?,
            Token::Return => self.parse_return()?,
            _ => self.parse_expression_statement()?,
        };

        Ok(Stmt::new(stmt_type, span))
    }

    fn parse_let(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Let)?;
        let name = self.parse_identifier()?;
        self.expect(Token::Equals)?;
        let expr = self.parse_expression()?;

        // The trailing `;` is required, tolerated missing at end of input.
        if !self.at(&Token::EndOfFile) {
            self.expect(Token::Semicolon)?;
        }

        Ok(StmtType::Let(name, expr))
    }

    fn parse_return(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Return)?;

        let expr = if matches!(
            self.current.token,
            Token::Semicolon | Token::RightBrace | Token::EndOfFile
        ) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        if !matches!(self.current.token, Token::RightBrace | Token::EndOfFile) {
            self.expect(Token::Semicolon)?;
        }

        Ok(StmtType::Return(expr))
    }

    fn parse_expression_statement(&mut self) -> ParserResult<StmtType> {
        let expr = self.parse_expression()?;
        self.eat(&Token::Semicolon)?;
        Ok(StmtType::Expression(expr))
    }

    pub fn parse_expression(&mut self) -> ParserResult<Expr> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Core Pratt loop: parse a prefix form, then fold in operators whose
    /// precedence exceeds `min_precedence`. Every operator is
    /// left-associative.
    fn parse_precedence(&mut self, min_precedence: Precedence) -> ParserResult<Expr> {
        let mut lhs = match PrefixOperator::from_token(&self.current.token) {
            Some(op) => {
                let span = self.advance()?.span;
                let operand = self.parse_precedence(Precedence::Prefix)?;
                Expr::new(ExprType::Prefix(op, Box::new(operand)), span)
            }
            None => self.parse_primary()?,
        };

        while let Some(op) = ParserOperator::from_token(&self.current.token) {
            if !op.is_higher_precedence(min_precedence) {
                break;
            }

            let precedence = op.precedence();
            let span = lhs.span;

            let new_lhs = match op {
                ParserOperator::Infix(infix) => {
                    self.advance()?;
                    let rhs = self.parse_precedence(precedence)?;
                    ExprType::Infix(infix, Box::new(lhs), Box::new(rhs))
                }
                ParserOperator::Call => {
                    self.expect(Token::LeftParen)?;
                    let arguments =
                        self.parse_comma_sep(Token::RightParen, Self::parse_expression)?;
                    ExprType::Call(Box::new(lhs), arguments)
                }
                ParserOperator::Index => {
                    self.expect(Token::LeftBracket)?;
                    let index = self.parse_expression()?;
                    self.expect(Token::RightBracket)?;
                    ExprType::Index(Box::new(lhs), Box::new(index))
                }
            };

            lhs = Expr::new(new_lhs, span);
        }

        Ok(lhs)
    }

    fn parse_primary(&mut self) -> ParserResult<Expr> {
        let SpannedToken { token, span } = self.advance()?;

        let expr = match token {
            Token::Integer(n) => ExprType::Literal(Literal::Integer(n)),
            Token::Str(s) => ExprType::Literal(Literal::Str(s)),
            Token::True => ExprType::Literal(Literal::Boolean(true)),
            Token::False => ExprType::Literal(Literal::Boolean(false)),
            Token::Null => ExprType::Literal(Literal::Null),
            Token::Identifier(name) => ExprType::Variable(Identifier::new(name, span)),
            Token::LeftParen => {
                let sub_expr = self.parse_expression()?;
                self.expect(Token::RightParen)?;
                return Ok(sub_expr);
            }
            Token::If => self.parse_if()?,
            Token::While => self.parse_while()?,
            Token::Function => self.parse_function()?,
            Token::LeftBracket => self.parse_array()?,
            Token::LeftBrace => self.parse_hash()?,
            t => return Err(ParserError::ExpectedExpr(span, t)),
        };

        Ok(Expr::new(expr, span))
    }

    fn parse_if(&mut self) -> ParserResult<ExprType> {
        self.expect(Token::LeftParen)?;
        let condition = self.parse_expression()?;
        self.expect(Token::RightParen)?;

        self.expect(Token::LeftBrace)?;
        let consequence = self.parse_block()?;

        let alternative = if self.eat(&Token::Else)? {
            self.expect(Token::LeftBrace)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(ExprType::If(Box::new(condition), consequence, alternative))
    }

    fn parse_while(&mut self) -> ParserResult<ExprType> {
        self.expect(Token::LeftParen)?;
        let test = self.parse_expression()?;
        self.expect(Token::RightParen)?;

        self.expect(Token::LeftBrace)?;
        let body = self.parse_block()?;

        Ok(ExprType::While(Box::new(test), body))
    }

    fn parse_function(&mut self) -> ParserResult<ExprType> {
        self.expect(Token::LeftParen)?;
        let params = self.parse_comma_sep(Token::RightParen, Self::parse_identifier)?;

        self.expect(Token::LeftBrace)?;
        let body = self.parse_block()?;

        Ok(ExprType::Function(FuncInfo::new(params, body)))
    }

    fn parse_array(&mut self) -> ParserResult<ExprType> {
        let elements = self.parse_comma_sep(Token::RightBracket, Self::parse_expression)?;
        Ok(ExprType::Array(elements))
    }

    fn parse_hash(&mut self) -> ParserResult<ExprType> {
        let mut pairs = vec![];

        if !self.eat(&Token::RightBrace)? {
            loop {
                let key = self.parse_expression()?;
                if !self.eat(&Token::Colon)? {
                    return Err(ParserError::ExpectedHashPair(self.current.span));
                }
                let value = self.parse_expression()?;
                pairs.push((key, value));

                if self.eat(&Token::RightBrace)? {
                    break;
                }
                self.expect(Token::Comma)?;
            }
        }

        Ok(ExprType::Hash(pairs))
    }

    /// Blocks appear after `if`, `else`, `while` and `fn` headers; the
    /// opening `{` has already been consumed. Bad statements inside a
    /// block are recorded and skipped like top-level ones.
    fn parse_block(&mut self) -> ParserResult<Block> {
        let mut stmts = vec![];

        while !self.at(&Token::RightBrace) && !self.at(&Token::EndOfFile) {
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.recover();
                }
            }
        }

        self.expect(Token::RightBrace)?;
        Ok(Block { stmts })
    }

    fn parse_identifier(&mut self) -> ParserResult<Identifier> {
        match self.advance()? {
            SpannedToken {
                token: Token::Identifier(name),
                span,
            } => Ok(Identifier::new(name, span)),
            other => Err(ParserError::ExpectedIdentifier(other.span)),
        }
    }

    fn parse_comma_sep<T, F>(&mut self, closing: Token, parser: F) -> ParserResult<Vec<T>>
    where
        F: Fn(&mut Parser<'s>) -> ParserResult<T>,
    {
        let mut items = vec![];
        if self.eat(&closing)? {
            return Ok(items);
        }

        items.push(parser(self)?);

        while !self.eat(&closing)? {
            self.expect(Token::Comma)?;
            items.push(parser(self)?);
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_source(source: &str) -> Program {
        Parser::new(source).parse().unwrap()
    }

    fn expr_string(source: &str) -> String {
        let program = parse_source(source);
        assert_eq!(program.stmts.len(), 1);
        program.stmts[0].ast_string()
    }

    #[test]
    fn test_operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("true != false", "(true != false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            ("add(a * b[2], b[1], 2 * [1, 2][1])", "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))"),
        ];

        for (source, expected) in cases {
            assert_eq!(expr_string(source), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_round_trip_is_stable() {
        // Re-parsing the canonical form must reproduce it.
        let sources = [
            "1 + 2 * 3 - 4 / 5",
            "-x * !y",
            "a < b == c > d",
            "first(rest([1, 2, 3]))[0]",
        ];

        for source in sources {
            let printed = expr_string(source);
            assert_eq!(expr_string(&printed), printed, "source: {}", source);
        }
    }

    #[test]
    fn test_let_statements() {
        let program = parse_source("let x = 5; let y = x;");
        assert_eq!(program.stmts.len(), 2);
        assert_eq!(program.stmts[0].ast_string(), "let x = 5;");
        assert_eq!(program.stmts[1].ast_string(), "let y = x;");

        // Missing `;` tolerated at end of input.
        assert_eq!(parse_source("let x = 5").stmts[0].ast_string(), "let x = 5;");
    }

    #[test]
    fn test_return_statements() {
        let program = parse_source("return; return 5; return 2 * 3;");
        assert_eq!(program.stmts.len(), 3);
        assert_eq!(program.stmts[0].ast_string(), "return;");
        assert_eq!(program.stmts[1].ast_string(), "return 5;");
        assert_eq!(program.stmts[2].ast_string(), "return (2 * 3);");
    }

    #[test]
    fn test_if_expression() {
        assert_eq!(
            expr_string("if (x < y) { x }"),
            "if ((x < y)) { x }"
        );
        assert_eq!(
            expr_string("if (x < y) { x } else { y }"),
            "if ((x < y)) { x } else { y }"
        );
    }

    #[test]
    fn test_while_expression() {
        assert_eq!(
            expr_string("while (i < 10) { let i = i + 1; }"),
            "while ((i < 10)) { let i = (i + 1); }"
        );
    }

    #[test]
    fn test_function_literal() {
        assert_eq!(
            expr_string("fn(x, y) { x + y; }"),
            "fn(x, y) { (x + y) }"
        );
        assert_eq!(expr_string("fn() { 1 }"), "fn() { 1 }");
    }

    #[test]
    fn test_call_expression() {
        assert_eq!(
            expr_string("add(1, 2 * 3, 4 + 5)"),
            "add(1, (2 * 3), (4 + 5))"
        );
        assert_eq!(expr_string("fn(x) { x }(5)"), "fn(x) { x }(5)");
    }

    #[test]
    fn test_array_and_index() {
        assert_eq!(
            expr_string("[1, 2 * 2, 3 + 3]"),
            "[1, (2 * 2), (3 + 3)]"
        );
        assert_eq!(expr_string("[]"), "[]");
        assert_eq!(expr_string("myArray[1 + 1]"), "(myArray[(1 + 1)])");
    }

    #[test]
    fn test_hash_literals() {
        assert_eq!(
            expr_string("{\"one\": 1, \"two\": 2}"),
            "{\"one\":1, \"two\":2}"
        );
        assert_eq!(expr_string("{}"), "{}");
        assert_eq!(
            expr_string("{1: true, true: 2}"),
            "{1:true, true:2}"
        );
        assert_eq!(
            expr_string("{\"k\": 1 + 2}"),
            "{\"k\":(1 + 2)}"
        );
    }

    #[test]
    fn test_parse_errors_are_collected() {
        let errors = Parser::new("let = 5; let x 5; 1 + 2;").parse().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_no_prefix_rule_error() {
        let errors = Parser::new("+ 5;").parse().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("No prefix parse rule"));
    }

    #[test]
    fn test_illegal_token_error() {
        let errors = Parser::new("let x = 5 @;").parse().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Illegal token"));
    }

    #[test]
    fn test_error_reports_line_number() {
        let errors = Parser::new("let x = 1;\nlet = 2;").parse().unwrap_err();
        assert!(errors[0].to_string().contains("line 2"));
    }

    #[test]
    fn test_hash_pair_error() {
        let errors = Parser::new("{1, 2};").parse().unwrap_err();
        assert!(!errors.is_empty());
    }
}
