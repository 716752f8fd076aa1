//! Command-line front end: one diagnosis session per invocation.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::catalog::{CatalogError, SqliteCatalog};
use crate::config;
use crate::models::PredictionInput;
use crate::pipeline::ai::{ChatCompletionClient, LlmClient, LlmError, LlmScorer};
use crate::pipeline::rules::RuleBasedScorer;
use crate::pipeline::session::DiagnosisSession;

#[derive(Parser, Debug)]
#[command(name = "diagnosa")]
#[command(version)]
#[command(about = "Score reported symptoms against the disease catalog", long_about = None)]
pub struct Cli {
    /// PredictionInput JSON document (stdin if not specified)
    pub input: Option<PathBuf>,

    /// Catalog database (defaults to ~/Diagnosa/catalog.db)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Do not store the session's predictions
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input document: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to render session: {0}")]
    Render(serde_json::Error),
}

/// Run one session with the hosted model configured from the environment.
pub async fn run(cli: Cli) -> Result<DiagnosisSession, CliError> {
    let client = ChatCompletionClient::from_env()?;
    if client.settings().api_key.is_none() {
        tracing::warn!(
            "{} not set, the model endpoint will likely reject requests",
            config::ENV_API_KEY
        );
    }
    let timeout = client.settings().timeout;
    run_with(cli, client, timeout).await
}

/// Run one session against `client`.
pub async fn run_with<L: LlmClient>(
    cli: Cli,
    client: L,
    timeout: Duration,
) -> Result<DiagnosisSession, CliError> {
    let input = read_input(cli.input.as_deref())?;

    let db_path = cli.db.unwrap_or_else(config::catalog_db_path);
    tracing::debug!(path = %db_path.display(), "Opening catalog database");
    let catalog = Arc::new(SqliteCatalog::open(&db_path)?);

    let rules = Arc::new(RuleBasedScorer::new(catalog.clone()));
    let llm = LlmScorer::new(client, catalog.clone()).with_timeout(timeout);

    let session = DiagnosisSession::run(&rules, &llm, input).await;

    if !cli.no_save {
        catalog.with_connection(|conn| session.persist(conn))?;
        tracing::info!(session = %session.id, "Session predictions saved");
    }
    Ok(session)
}

/// Read a [`PredictionInput`] from `path`, or from stdin when `None`.
pub fn read_input(path: Option<&Path>) -> Result<PredictionInput, CliError> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn render(session: &DiagnosisSession) -> Result<String, CliError> {
    serde_json::to_string_pretty(session).map_err(CliError::Render)
}
