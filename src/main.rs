use sprig::repl;

fn main() {
    println!("This is the sprig programming language!");
    println!("Feel free to type in commands");
    repl::run();
}
