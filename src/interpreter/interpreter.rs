use super::builtins;
use super::environment::Environment;
use super::errors::{InterpreterError, RuntimeResult};
use super::function::TuskFn;
use super::object::{ArrayDataPtr, HashDataPtr, HashKey, Object};
use crate::frontend::grammar::{
    Block, Expr, ExprType, Identifier, Literal, Program, Stmt, StmtType,
};

use std::io::{self, Write};

pub struct Interpreter<W: Write> {
    pub env: Environment,
    output: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Interpreter::new_with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn new_with_output(output: W) -> Self {
        Interpreter {
            env: Environment::new(),
            output,
        }
    }

    pub fn swap_env(&mut self, mut env: Environment) -> Environment {
        std::mem::swap(&mut self.env, &mut env);
        // Return old original interpreter env
        env
    }

    /// Evaluates statements in order and yields the last statement's value.
    /// A `return` fired anywhere inside unwraps here.
    pub fn eval_program(&mut self, program: &Program) -> RuntimeResult<Object> {
        let mut result = Object::Null;

        for stmt in program.stmts.iter() {
            result = match self.eval_statement(stmt) {
                Err(InterpreterError::Return(object)) => return Ok(object),
                other => other?,
            };
        }

        Ok(result)
    }

    pub fn eval_statement(&mut self, stmt: &Stmt) -> RuntimeResult<Object> {
        match &stmt.stmt {
            StmtType::Expression(expr) => self.eval_expression(expr),
            StmtType::Let(name, expr) => {
                let value = self.eval_expression(expr)?;
                self.env.define(name.name.clone(), value);
                Ok(Object::Null)
            }
            StmtType::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Object::Null,
                };
                Err(InterpreterError::Return(value))
            }
        }
    }

    /// Blocks run in the current frame, so `let` inside an `if`/`while`
    /// body writes the enclosing scope. The `Return` marker passes through
    /// untouched and escapes the enclosing function, not just the block.
    pub fn eval_block(&mut self, block: &Block) -> RuntimeResult<Object> {
        let mut result = Object::Null;

        for stmt in block.stmts.iter() {
            result = self.eval_statement(stmt)?;
        }

        Ok(result)
    }

    pub fn eval_expression(&mut self, expr: &Expr) -> RuntimeResult<Object> {
        match &expr.expr {
            ExprType::Literal(l) => Ok(self.eval_literal(l)),
            ExprType::Variable(var) => self.lookup_identifier(var),
            ExprType::Prefix(op, expr) => {
                let value = self.eval_expression(expr)?;
                Object::apply_prefix_op(*op, value)
            }
            ExprType::Infix(op, lhs, rhs) => {
                let lhs = self.eval_expression(lhs)?;
                let rhs = self.eval_expression(rhs)?;
                Object::apply_infix_op(*op, lhs, rhs)
            }
            ExprType::If(condition, consequence, alternative) => {
                self.eval_if_else(condition, consequence, alternative.as_ref())
            }
            ExprType::While(test, body) => self.eval_while(test, body),
            ExprType::Function(func_info) => {
                Ok(Object::TuskFn(TuskFn::new(func_info, self.env.clone())))
            }
            ExprType::Call(callee, args) => self.eval_func_call(callee, args),
            ExprType::Index(collection, index) => {
                let collection = self.eval_expression(collection)?;
                let index = self.eval_expression(index)?;
                self.eval_index(collection, index)
            }
            ExprType::Array(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements.iter() {
                    values.push(self.eval_expression(element)?);
                }
                Ok(Object::Array(ArrayDataPtr::new(values)))
            }
            ExprType::Hash(pairs) => self.eval_hash_literal(pairs),
        }
    }

    fn eval_literal(&self, l: &Literal) -> Object {
        match l {
            Literal::Integer(n) => Object::Integer(*n),
            Literal::Str(s) => Object::String(s.clone()),
            Literal::Boolean(b) => Object::Boolean(*b),
            Literal::Null => Object::Null,
        }
    }

    fn lookup_identifier(&self, var: &Identifier) -> RuntimeResult<Object> {
        if let Some(obj) = self.env.get(&var.name) {
            return Ok(obj);
        }

        match builtins::lookup(&var.name) {
            Some(native) => Ok(Object::NativeFn(native)),
            None => Err(InterpreterError::UndefinedIdentifier(var.name.clone())),
        }
    }

    fn eval_if_else(
        &mut self,
        condition: &Expr,
        consequence: &Block,
        alternative: Option<&Block>,
    ) -> RuntimeResult<Object> {
        if self.eval_expression(condition)?.is_truthy() {
            return self.eval_block(consequence);
        }
        if let Some(alternative) = alternative {
            return self.eval_block(alternative);
        }

        Ok(Object::Null)
    }

    fn eval_while(&mut self, test: &Expr, body: &Block) -> RuntimeResult<Object> {
        while self.eval_expression(test)?.is_truthy() {
            self.eval_block(body)?;
        }

        Ok(Object::Null)
    }

    fn eval_func_call(&mut self, callee: &Expr, raw_args: &[Expr]) -> RuntimeResult<Object> {
        let callee = self.eval_expression(callee)?;

        let mut args = Vec::with_capacity(raw_args.len());
        for raw_arg in raw_args.iter() {
            args.push(self.eval_expression(raw_arg)?);
        }

        match callee {
            Object::TuskFn(f) => f.execute(args, self),
            Object::NativeFn(f) => f.execute(args, &mut self.output),
            other => Err(InterpreterError::NotCallable(other)),
        }
    }

    fn eval_index(&mut self, collection: Object, index: Object) -> RuntimeResult<Object> {
        match (collection, index) {
            (Object::Array(arr), Object::Integer(i)) => {
                if i < 0 {
                    return Ok(Object::Null);
                }
                Ok(arr.get(i as usize).unwrap_or(Object::Null))
            }
            (collection @ Object::Array(_), index) => {
                Err(InterpreterError::InvalidIndexType(collection, index))
            }
            (Object::Hash(hash), index) => {
                let key = HashKey::from_object(&index)?;
                Ok(hash.get(&key).unwrap_or(Object::Null))
            }
            (other, _) => Err(InterpreterError::IndexNotSupported(other)),
        }
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expr, Expr)]) -> RuntimeResult<Object> {
        let hash = HashDataPtr::new();

        for (key_expr, value_expr) in pairs.iter() {
            let key = self.eval_expression(key_expr)?;
            let value = self.eval_expression(value_expr)?;
            let hash_key = HashKey::from_object(&key)?;
            hash.insert(hash_key, key, value);
        }

        Ok(Object::Hash(hash))
    }
}
