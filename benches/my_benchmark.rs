use criterion::{criterion_group, criterion_main, Criterion};
use sprig::{
    ast::Program,
    evaluator,
    object::{Environment, Object},
    parser::parse,
};

fn fibonacci_program() -> Program {
    let (program, errors) = parse(
        "
    let fibonacci = fn(x) {
		if (x == 0) {
			0
		} else {
			if (x == 1) {
				return 1;
			} else {
				fibonacci(x - 1) + fibonacci(x - 2);
			}
		}
	};
    fibonacci(18);
    ",
    );
    assert!(errors.is_empty(), "Parser errors: {:?}", errors);
    program
}

fn criterion_benchmark(c: &mut Criterion) {
    let program = fibonacci_program();

    c.bench_function("fib 18", |b| {
        b.iter(|| {
            let env = Environment::new_global();

            match evaluator::eval(&program, env) {
                Ok(Object::Integer(2584)) => {}
                Ok(obj) => println!("Unexpected result: {}", obj),
                Err(e) => println!("Unexpected error: {}", e),
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
