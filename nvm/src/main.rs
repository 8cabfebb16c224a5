use std::io;
use std::process;

use clap::Parser;
use env_logger::Env;

use nvm::cli::Cli;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.default_log_filter())).init();

    let stdout = io::stdout();
    if let Err(e) = cli.execute(&mut stdout.lock()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
