use std::env;

use clap::Parser;
use marketcopilot::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,marketcopilot=info".to_string()),
        )
        .init();

    run(Cli::parse())
}
