use super::environment::Environment;
use super::errors::{InterpreterError, RuntimeResult};
use super::interpreter::Interpreter;
use super::object::Object;
use crate::frontend::grammar::{Block, FuncInfo, Identifier};

use std::fmt;
use std::io::Write;
use std::rc::Rc;

pub struct TuskFnData {
    params: Vec<Identifier>,
    body: Block,
    closure: Environment,
}

/// A user function value: parameter list, body and the environment captured
/// at the point of the `fn` literal.
#[derive(Clone)]
pub struct TuskFn(Rc<TuskFnData>);

impl TuskFn {
    pub fn new(func_info: &FuncInfo, closure: Environment) -> Self {
        let data = TuskFnData {
            params: func_info.params.clone(),
            body: func_info.body.clone(),
            closure,
        };
        TuskFn(Rc::new(data))
    }

    pub fn execute<W: Write>(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<W>,
    ) -> RuntimeResult<Object> {
        // Create a new environment pointing to the surrounding closure.
        // Parameters bind positionally: missing arguments bind to null,
        // extra arguments are dropped.
        let env = Environment::enclosed(&self.0.closure);
        let mut args = args.into_iter();
        for param in self.0.params.iter() {
            env.define(param.name.clone(), args.next().unwrap_or(Object::Null));
        }

        let prev_env = interpreter.swap_env(env);
        let result = match interpreter.eval_block(&self.0.body) {
            Err(InterpreterError::Return(object)) => Ok(object),
            other => other,
        };
        interpreter.swap_env(prev_env);

        result
    }

    pub fn inspect(&self) -> String {
        let params: Vec<_> = self.0.params.iter().map(|p| p.name.as_str()).collect();
        format!("<fn({})>", params.join(", "))
    }
}

impl fmt::Debug for TuskFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

impl PartialEq<TuskFn> for TuskFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TuskFn {}
