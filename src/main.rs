use std::process::ExitCode;

use clap::Parser;
use diagnosa_lib::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    diagnosa_lib::init_tracing();
    tracing::info!("Diagnosa starting v{}", diagnosa_lib::config::APP_VERSION);

    let result = cli::run(Cli::parse())
        .await
        .and_then(|session| cli::render(&session));

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Diagnosis failed");
            eprintln!("diagnosa: {e}");
            ExitCode::FAILURE
        }
    }
}
