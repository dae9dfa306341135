//! Gradebook HTTP server entry point.
//!
//! # Responsibility
//! - Resolve process configuration from the environment.
//! - Initialize logging, provision the grade book file, and serve the API.

use gradebook_core::{core_version, default_log_level, init_logging, GradeService, JsonGradeStore};
use gradebook_server::serve;
use log::info;
use std::process::ExitCode;
use std::sync::Arc;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_BOOK_FILE: &str = "grades.json";

/// Process configuration resolved from environment variables.
struct ServerConfig {
    /// Bind address, from `GRADEBOOK_ADDR`.
    addr: String,
    /// Grade book file path, from `GRADEBOOK_FILE`.
    book_file: String,
    /// Log directory, from `GRADEBOOK_LOG_DIR`; logging is skipped when
    /// unset.
    log_dir: Option<String>,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            addr: std::env::var("GRADEBOOK_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string()),
            book_file: std::env::var("GRADEBOOK_FILE")
                .unwrap_or_else(|_| DEFAULT_BOOK_FILE.to_string()),
            log_dir: std::env::var("GRADEBOOK_LOG_DIR").ok(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::from_env();

    if let Some(log_dir) = &config.log_dir {
        if let Err(message) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging setup failed: {message}");
            return ExitCode::FAILURE;
        }
    }

    let store = JsonGradeStore::new(&config.book_file);
    if let Err(err) = store.provision() {
        eprintln!(
            "cannot provision grade book file `{}`: {err}",
            config.book_file
        );
        return ExitCode::FAILURE;
    }

    info!(
        "event=server_start module=server status=ok addr={} book_file={} version={}",
        config.addr,
        config.book_file,
        core_version()
    );

    let service = Arc::new(GradeService::new(store));
    if let Err(err) = serve(service, &config.addr).await {
        eprintln!("server failed: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
