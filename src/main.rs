use colored::Colorize;

fn main() {
    if let Err(err) = kindred::run() {
        eprintln!("{} {}", "Error:".bright_red().bold(), err);
        std::process::exit(1);
    }
}
