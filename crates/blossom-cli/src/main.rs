//! # blossom CLI entry point
//!
//! Parses arguments, sets up logging and dispatches to the library.

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use blossom_cli::{render_error, run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = cli.settings().and_then(|config| run(cli, &config));
    match result {
        Ok(Value::Null) => ExitCode::SUCCESS,
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("encoding output: {e}");
                ExitCode::from(1)
            }
        },
        Err(err) => {
            let (body, status) = render_error(&err);
            match serde_json::to_string(&body) {
                Ok(text) => eprintln!("{text}"),
                Err(_) => eprintln!("{err:#}"),
            }
            ExitCode::from(status)
        }
    }
}
