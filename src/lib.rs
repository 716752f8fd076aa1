pub mod config;
pub mod models;
pub mod db;
pub mod catalog; // Disease catalog: SQLite store + embedded failover
pub mod pipeline; // Rule-based and LLM scorers, diagnosis sessions
pub mod cli;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Logs go to stderr so stdout stays
/// reserved for results. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
