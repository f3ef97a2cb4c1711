use super::errors::{InterpreterError, RuntimeResult};
use super::object::{ArrayDataPtr, Object};

use rand::Rng;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

type FnType = fn(Vec<Object>, &mut dyn Write) -> RuntimeResult<Object>;

pub struct NativeFnData {
    func: FnType,
    name: String,
}

#[derive(Clone)]
pub struct NativeFn(Rc<NativeFnData>);

impl NativeFn {
    fn new(name: &str, func: FnType) -> Self {
        let name = name.to_owned();
        let data = NativeFnData { func, name };
        NativeFn(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Each builtin enforces its own arity and argument types; `output` is
    /// the interpreter's writer, so `puts` and prompts are capturable.
    pub fn execute(&self, args: Vec<Object>, output: &mut dyn Write) -> RuntimeResult<Object> {
        (self.0.func)(args, output)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native-func {}>", self.0.name)
    }
}

impl PartialEq<NativeFn> for NativeFn {
    // You cannot derive Eq for function pointers in Rust, and LLVM can
    // merge two functions with identical bodies into one. Compare native
    // funcs by name instead.
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for NativeFn {}

/// Built-ins are resolved only after the environment chain misses, so user
/// bindings shadow them.
pub fn lookup(name: &str) -> Option<NativeFn> {
    let func: FnType = match name {
        "len" => len_builtin,
        "first" => first_builtin,
        "last" => last_builtin,
        "rest" => rest_builtin,
        "push" => push_builtin,
        "pop" => pop_builtin,
        "replace" => replace_builtin,
        "bool" => bool_builtin,
        "puts" => puts_builtin,
        "gets" => gets_builtin,
        "geti" => geti_builtin,
        "random" => random_builtin,
        _ => return None,
    };

    Some(NativeFn::new(name, func))
}

fn check_arity(args: &[Object], want: usize) -> RuntimeResult<()> {
    if args.len() != want {
        return Err(InterpreterError::Builtin(format!(
            "wrong number of arguments. got={}, want={}",
            args.len(),
            want
        )));
    }
    Ok(())
}

fn array_arg<'a>(args: &'a [Object], builtin: &str) -> RuntimeResult<&'a ArrayDataPtr> {
    match &args[0] {
        Object::Array(arr) => Ok(arr),
        other => Err(InterpreterError::Builtin(format!(
            "argument to `{}` must be ARRAY, got {}",
            builtin,
            other.type_name()
        ))),
    }
}

fn len_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 1)?;

    match &args[0] {
        Object::String(s) => Ok(Object::Integer(s.len() as i64)),
        Object::Array(arr) => Ok(Object::Integer(arr.len() as i64)),
        other => Err(InterpreterError::Builtin(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        ))),
    }
}

fn first_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 1)?;
    let arr = array_arg(&args, "first")?;
    Ok(arr.first().unwrap_or(Object::Null))
}

fn last_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 1)?;
    let arr = array_arg(&args, "last")?;
    Ok(arr.last().unwrap_or(Object::Null))
}

fn rest_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 1)?;
    let arr = array_arg(&args, "rest")?;

    match arr.rest() {
        Some(rest) => Ok(Object::Array(rest)),
        None => Ok(Object::Null),
    }
}

fn push_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 2)?;
    let arr = array_arg(&args, "push")?;

    arr.push(args[1].clone());
    Ok(Object::Array(arr.clone()))
}

fn pop_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 1)?;
    let arr = array_arg(&args, "pop")?;
    Ok(arr.pop().unwrap_or(Object::Null))
}

fn replace_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 3)?;
    let arr = array_arg(&args, "replace")?;

    let index = match &args[1] {
        Object::Integer(i) => *i,
        other => {
            return Err(InterpreterError::Builtin(format!(
                "argument to `replace` must be INTEGER, got {}",
                other.type_name()
            )))
        }
    };

    if index < 0 || index as usize >= arr.len() {
        return Err(InterpreterError::Builtin(format!(
            "invalid index for given array, got={}, array length={}",
            index,
            arr.len()
        )));
    }

    arr.set(index as usize, args[2].clone());
    Ok(Object::Array(arr.clone()))
}

fn bool_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 1)?;
    Ok(Object::Boolean(args[0].is_truthy()))
}

fn puts_builtin(args: Vec<Object>, output: &mut dyn Write) -> RuntimeResult<Object> {
    let parts: Vec<_> = args.iter().map(|arg| arg.inspect()).collect();
    writeln!(output, "{}", parts.join(" ")).map_err(write_failed)?;
    Ok(Object::Null)
}

fn gets_builtin(args: Vec<Object>, output: &mut dyn Write) -> RuntimeResult<Object> {
    Ok(Object::String(read_stdin_line(&args, output)?))
}

fn geti_builtin(args: Vec<Object>, output: &mut dyn Write) -> RuntimeResult<Object> {
    let text = read_stdin_line(&args, output)?;

    match text.parse() {
        Ok(value) => Ok(Object::Integer(value)),
        Err(_) => Ok(Object::Null),
    }
}

/// Shared plumbing for `gets`/`geti`: optional prompt, then one trimmed
/// line from standard input.
fn read_stdin_line(args: &[Object], output: &mut dyn Write) -> RuntimeResult<String> {
    if args.len() > 1 {
        return Err(InterpreterError::Builtin(format!(
            "wrong number of arguments. got={}, want=0 or 1",
            args.len()
        )));
    }

    if let Some(prompt) = args.first() {
        write!(output, "{}", prompt.inspect()).map_err(write_failed)?;
        output.flush().map_err(write_failed)?;
    }

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| InterpreterError::Builtin(format!("failed to read stdin: {}", e)))?;

    Ok(line.trim().to_owned())
}

fn random_builtin(args: Vec<Object>, _output: &mut dyn Write) -> RuntimeResult<Object> {
    check_arity(&args, 1)?;

    let cap = match &args[0] {
        Object::Integer(n) => *n,
        other => {
            return Err(InterpreterError::Builtin(format!(
                "argument to `random` must be INTEGER, got {}",
                other.type_name()
            )))
        }
    };

    if cap < 1 {
        return Err(InterpreterError::Builtin(format!(
            "cap value must be at least 1, got={}",
            cap
        )));
    }

    let value = rand::thread_rng().gen_range(0..cap);
    Ok(Object::Integer(value))
}

fn write_failed(e: io::Error) -> InterpreterError {
    InterpreterError::Builtin(format!("failed to write output: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Object>) -> RuntimeResult<Object> {
        let mut sink = Vec::new();
        lookup(name).unwrap().execute(args, &mut sink)
    }

    fn int_array(values: &[i64]) -> ArrayDataPtr {
        ArrayDataPtr::new(values.iter().map(|v| Object::Integer(*v)).collect())
    }

    #[test]
    fn test_lookup() {
        assert!(lookup("len").is_some());
        assert!(lookup("no_such_builtin").is_none());
    }

    #[test]
    fn test_len() {
        assert_eq!(
            call("len", vec![Object::String("hello".to_owned())]),
            Ok(Object::Integer(5))
        );
        assert_eq!(
            call("len", vec![Object::Array(int_array(&[1, 2, 3]))]),
            Ok(Object::Integer(3))
        );
        assert_eq!(
            call("len", vec![Object::Integer(1)]).unwrap_err().to_string(),
            "argument to `len` not supported, got INTEGER"
        );
        assert_eq!(
            call("len", vec![]).unwrap_err().to_string(),
            "wrong number of arguments. got=0, want=1"
        );
    }

    #[test]
    fn test_first_last_rest() {
        let arr = int_array(&[1, 2, 3]);
        assert_eq!(
            call("first", vec![Object::Array(arr.clone())]),
            Ok(Object::Integer(1))
        );
        assert_eq!(
            call("last", vec![Object::Array(arr.clone())]),
            Ok(Object::Integer(3))
        );

        // rest copies; the original is untouched.
        let rest = call("rest", vec![Object::Array(arr.clone())]).unwrap();
        match &rest {
            Object::Array(rest_arr) => {
                assert_eq!(rest_arr.len(), 2);
                assert_eq!(rest_arr.first(), Some(Object::Integer(2)));
            }
            other => panic!("expected array, got {:?}", other),
        }
        assert_eq!(arr.len(), 3);

        let empty = int_array(&[]);
        assert_eq!(call("first", vec![Object::Array(empty.clone())]), Ok(Object::Null));
        assert_eq!(call("last", vec![Object::Array(empty.clone())]), Ok(Object::Null));
        assert_eq!(call("rest", vec![Object::Array(empty)]), Ok(Object::Null));
    }

    #[test]
    fn test_push_pop_mutate_in_place() {
        let arr = int_array(&[1]);
        let result = call(
            "push",
            vec![Object::Array(arr.clone()), Object::Integer(2)],
        )
        .unwrap();

        // The same array comes back, mutated.
        assert_eq!(result, Object::Array(arr.clone()));
        assert_eq!(arr.len(), 2);

        assert_eq!(
            call("pop", vec![Object::Array(arr.clone())]),
            Ok(Object::Integer(2))
        );
        assert_eq!(arr.len(), 1);

        let empty = int_array(&[]);
        assert_eq!(call("pop", vec![Object::Array(empty)]), Ok(Object::Null));
    }

    #[test]
    fn test_replace() {
        let arr = int_array(&[1, 2, 3]);
        call(
            "replace",
            vec![
                Object::Array(arr.clone()),
                Object::Integer(1),
                Object::Integer(9),
            ],
        )
        .unwrap();
        assert_eq!(arr.get(1), Some(Object::Integer(9)));

        let err = call(
            "replace",
            vec![
                Object::Array(arr.clone()),
                Object::Integer(3),
                Object::Integer(0),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid index for given array, got=3, array length=3"
        );

        let err = call(
            "replace",
            vec![
                Object::Array(arr),
                Object::Integer(-1),
                Object::Integer(0),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid index"));
    }

    #[test]
    fn test_bool() {
        assert_eq!(call("bool", vec![Object::Integer(0)]), Ok(Object::Boolean(false)));
        assert_eq!(call("bool", vec![Object::Null]), Ok(Object::Boolean(false)));
        assert_eq!(
            call("bool", vec![Object::String("".to_owned())]),
            Ok(Object::Boolean(true))
        );
    }

    #[test]
    fn test_puts_output() {
        let mut sink = Vec::new();
        let result = lookup("puts").unwrap().execute(
            vec![
                Object::Integer(1),
                Object::String("two".to_owned()),
                Object::Null,
            ],
            &mut sink,
        );
        assert_eq!(result, Ok(Object::Null));
        assert_eq!(String::from_utf8(sink).unwrap(), "1 two null\n");
    }

    #[test]
    fn test_random_bounds() {
        for _ in 0..50 {
            match call("random", vec![Object::Integer(3)]).unwrap() {
                Object::Integer(n) => assert!((0..3).contains(&n)),
                other => panic!("expected integer, got {:?}", other),
            }
        }

        // A cap of 1 only ever yields 0.
        assert_eq!(call("random", vec![Object::Integer(1)]), Ok(Object::Integer(0)));

        let err = call("random", vec![Object::Integer(0)]).unwrap_err();
        assert_eq!(err.to_string(), "cap value must be at least 1, got=0");
    }
}
