use super::operator::{InfixOperator, PrefixOperator};
use super::span::Span;

#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Stmt {
    pub stmt: StmtType,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StmtType {
    Expression(Expr),
    Let(Identifier, Expr),
    Return(Option<Expr>),
}

/// A braced statement sequence. Blocks only occur as subforms of `if`,
/// `while` and function literals, never as standalone statements.
#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Expr {
    pub expr: ExprType,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExprType {
    Literal(Literal),
    Variable(Identifier),
    Prefix(PrefixOperator, Box<Expr>),
    Infix(InfixOperator, Box<Expr>, Box<Expr>),
    If(Box<Expr>, Block, Option<Block>),
    While(Box<Expr>, Block),
    Function(FuncInfo),
    Call(Box<Expr>, Vec<Expr>),
    Index(Box<Expr>, Box<Expr>),
    Array(Vec<Expr>),
    Hash(Vec<(Expr, Expr)>),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FuncInfo {
    pub params: Vec<Identifier>,
    pub body: Block,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Integer(i64),
    Str(String),
    Boolean(bool),
    Null,
}

impl Identifier {
    pub fn new(name: String, span: Span) -> Self {
        Self { name, span }
    }
}

impl Stmt {
    pub fn new(stmt: StmtType, span: Span) -> Self {
        Stmt { stmt, span }
    }

    pub fn ast_string(&self) -> String {
        match &self.stmt {
            StmtType::Expression(expr) => expr.ast_string(),
            StmtType::Let(name, expr) => format!("let {} = {};", name.name, expr.ast_string()),
            StmtType::Return(None) => "return;".to_owned(),
            StmtType::Return(Some(expr)) => format!("return {};", expr.ast_string()),
        }
    }
}

impl Block {
    pub fn ast_string(&self) -> String {
        let stmts: Vec<_> = self.stmts.iter().map(|s| s.ast_string()).collect();
        stmts.join(" ")
    }
}

impl FuncInfo {
    pub fn new(params: Vec<Identifier>, body: Block) -> Self {
        FuncInfo { params, body }
    }
}

impl Program {
    pub fn ast_string(&self) -> String {
        let stmts: Vec<_> = self.stmts.iter().map(|s| s.ast_string()).collect();
        stmts.join(" ")
    }
}

impl Expr {
    pub fn new(expr: ExprType, span: Span) -> Self {
        Expr { expr, span }
    }

    /// Canonical source reconstruction. Every prefix and infix expression is
    /// parenthesized so that associativity stays visible, and re-parsing the
    /// result yields the same structure.
    pub fn ast_string(&self) -> String {
        match &self.expr {
            ExprType::Literal(l) => match l {
                Literal::Integer(n) => n.to_string(),
                Literal::Str(s) => format!("\"{}\"", s),
                Literal::Boolean(b) => b.to_string(),
                Literal::Null => "null".to_owned(),
            },
            ExprType::Variable(var) => var.name.clone(),
            ExprType::Prefix(op, expr) => format!("({}{})", op.symbol(), expr.ast_string()),
            ExprType::Infix(op, lhs, rhs) => format!(
                "({} {} {})",
                lhs.ast_string(),
                op.symbol(),
                rhs.ast_string()
            ),
            ExprType::If(condition, consequence, alternative) => {
                let mut out = format!(
                    "if ({}) {{ {} }}",
                    condition.ast_string(),
                    consequence.ast_string()
                );
                if let Some(alternative) = alternative {
                    out.push_str(&format!(" else {{ {} }}", alternative.ast_string()));
                }
                out
            }
            ExprType::While(test, body) => {
                format!("while ({}) {{ {} }}", test.ast_string(), body.ast_string())
            }
            ExprType::Function(func_info) => {
                let params: Vec<_> = func_info.params.iter().map(|p| p.name.clone()).collect();
                format!("fn({}) {{ {} }}", params.join(", "), func_info.body.ast_string())
            }
            ExprType::Call(callee, args) => {
                let args: Vec<_> = args.iter().map(|a| a.ast_string()).collect();
                format!("{}({})", callee.ast_string(), args.join(", "))
            }
            ExprType::Index(collection, index) => {
                format!("({}[{}])", collection.ast_string(), index.ast_string())
            }
            ExprType::Array(elements) => {
                let elements: Vec<_> = elements.iter().map(|e| e.ast_string()).collect();
                format!("[{}]", elements.join(", "))
            }
            ExprType::Hash(pairs) => {
                let pairs: Vec<_> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}:{}", k.ast_string(), v.ast_string()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
        }
    }
}
