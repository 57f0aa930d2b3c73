//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::line::{LineClient, LineError, assistant::AssistantClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the database pool,
/// and the outbound clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    line: LineClient,
    assistant: Option<AssistantClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the LINE client cannot be built from the
    /// configured channel token.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, LineError> {
        let line = LineClient::new(&config.line)?;
        let assistant = config.assistant.as_ref().map(AssistantClient::new);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                line,
                assistant,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the LINE Messaging API client.
    #[must_use]
    pub fn line(&self) -> &LineClient {
        &self.inner.line
    }

    /// Get the product assistant client, when configured.
    #[must_use]
    pub fn assistant(&self) -> Option<&AssistantClient> {
        self.inner.assistant.as_ref()
    }
}
