use tusk::frontend::errors::ParserError;
use tusk::frontend::Parser;
use tusk::interpreter::{Interpreter, Object};

use std::io::Write;
use std::{env, fs, io, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => run_prompt(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Usage: tusk [script]");
            process::exit(64);
        }
    }
}

fn run_prompt() {
    let mut interpreter = Interpreter::new();

    loop {
        let mut input = String::new();

        print!(">> ");
        io::stdout().flush().expect("Failed to flush stdout.");
        let bytes_read = io::stdin()
            .read_line(&mut input)
            .expect("Failed to read line.");

        // Clean EOF ends the session.
        if bytes_read == 0 {
            break;
        }

        let line = input.trim_end();
        if line == "exit" {
            break;
        }

        run_line(line, &mut interpreter);
    }
}

fn run_line(line: &str, interpreter: &mut Interpreter<io::Stdout>) {
    let program = match Parser::new(line).parse() {
        Ok(program) => program,
        Err(errors) => {
            report_parser_errors(&errors);
            return;
        }
    };

    match interpreter.eval_program(&program) {
        Ok(Object::Null) => {}
        Ok(value) => println!("{}", value.inspect()),
        Err(e) => println!("Error: {}", e),
    }
}

fn report_parser_errors(errors: &[ParserError]) {
    println!("parser errors:");
    for error in errors.iter() {
        println!("\t{}", error);
    }
}

fn run_file(filename: &str) {
    let source = match fs::read_to_string(filename) {
        Ok(source) => source,
        Err(_) => {
            eprintln!("Failed to read file '{}'.", filename);
            process::exit(1);
        }
    };

    let program = match Parser::new(&source).parse() {
        Ok(program) => program,
        Err(errors) => {
            eprintln!("parser errors:");
            for error in errors.iter() {
                eprintln!("\t{}", error);
            }
            process::exit(1);
        }
    };

    let mut interpreter = Interpreter::new();
    if let Err(e) = interpreter.eval_program(&program) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
