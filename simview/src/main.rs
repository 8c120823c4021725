mod commands;
mod handlers;
mod output;

use clap::Parser;
use commands::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    if let Err(err) = handlers::handle_command(cli.command) {
        output::print_error(&err.to_string());
        std::process::exit(1);
    }
}
