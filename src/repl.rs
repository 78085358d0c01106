use crate::ast::{Program, Statement};
use crate::evaluator;
use crate::object::Environment;
use crate::parser;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::rc::Rc;

pub fn run() {
    let stdin = io::stdin();

    // One global environment for the whole session, carried across lines.
    let env = Environment::new_global();

    loop {
        print!(">> ");
        io::stdout().flush().expect("Error flushing stdout");

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .expect("Error reading from stdin");
        if read == 0 {
            return;
        }

        let (program, errors) = parser::parse(&line);

        if !errors.is_empty() {
            print_parser_errors(&errors);
            continue;
        }

        match evaluator::eval(&program, Rc::clone(&env)) {
            Ok(evaluated) if echoes_result(&program) => println!("{}", evaluated),
            Ok(_) => {}
            Err(err) => println!("ERROR: {}", err),
        }
    }
}

/// A line ending in a `let` binds a name rather than producing a value, so
/// its result is not echoed. Everything else prints, `null` included.
fn echoes_result(program: &Program) -> bool {
    match program.statements.last() {
        None | Some(Statement::Let(..)) => false,
        Some(_) => true,
    }
}

fn print_parser_errors(errors: &[String]) {
    println!("Woops! Parsing that line didn't go so well:");
    for error in errors {
        println!("\t{}", error);
    }
}
