use clap::Parser;
use sticky::cli::commands::Cli;
use sticky::cli::handlers;
use sticky::logging;

fn main() {
    let cli = Cli::parse();

    // The TUI sets up its own file logger once it owns the terminal
    if cli.command.is_some() {
        logging::init_stderr();
    }

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
