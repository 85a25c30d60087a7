//! piggin - command line utility for AWS S3
//!
//! Lists, copies, creates, and removes S3 objects and buckets.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use piggin::commands::{self, Cli};
use piggin::exit_code::ExitCode;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::UsageError
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;
    tracing::debug!(%exit_code, "command finished");

    std::process::exit(exit_code.as_i32());
}
