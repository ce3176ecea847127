//! Electoral information service layer
//!
//! Account lifecycle (pre-registration, email binding, activation, login),
//! voter rolls and polling stations, candidates with their public records,
//! and moderated community content, all behind transactional services over
//! a pluggable record store.

pub mod auth;
pub mod config;
pub mod errors;
pub mod integrity;
pub mod model;
pub mod notify;
pub mod patch;
pub mod response;
pub mod services;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use errors::{Error, Result};
pub use notify::{Notifier, TracingNotifier};
pub use patch::Patch;
pub use response::ServiceResponse;
pub use services::Services;
pub use store::{MemoryStore, RecordStore};
pub use types::{Id, Role};

use config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with defaults; `RUST_LOG` overrides the filter
pub fn init() -> Result<()> {
    init_with(&LoggingConfig {
        level: "info".to_string(),
        format: "pretty".to_string(),
    })
}

/// Initialize logging from configuration
pub fn init_with(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("electoral={}", logging.level)));

    let installed = match logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };
    installed.map_err(|e| Error::internal(format!("Failed to install log subscriber: {}", e)))?;

    tracing::info!("🗳️  Electoral service layer v{} initialized", VERSION);
    Ok(())
}
