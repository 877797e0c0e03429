use colored::Colorize;
use std::process;

fn main() {
    println!(
        "{} {}",
        "plateflow: load and transform flow-cytometry plate data.\n Version:"
            .cyan()
            .bold(),
        env!("CARGO_PKG_VERSION").cyan().bold()
    );
    if let Err(e) = plateflow::run() {
        eprintln!("Application error: {}", e.to_string().red().bold());
        process::exit(1);
    }
}
