pub mod analytics;
pub mod commands;
pub mod config;
mod error;
pub mod jobs;
pub mod server;

pub use error::WeldError;
pub use jobs::{Job, JobRegistry};
pub use server::{build_router, AppState};

/// Install the global tracing subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}
