//! Client-facing configuration.
//!
//! The web client bootstraps its LINE SDK from here instead of baking the
//! LIFF app ID into the bundle. Only values safe to hand to a browser belong
//! in this response.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

/// The configuration the web client needs at startup.
pub async fn show(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "liffId": state.config().line.liff_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use sqlx::postgres::PgPool;

    use crate::config::{ApiConfig, LineConfig};

    fn test_state(liff_id: Option<String>) -> AppState {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().expect("valid addr"),
            port: 3000,
            line: LineConfig {
                channel_access_token: SecretString::from("token"),
                liff_id,
                notify_target: None,
            },
            assistant: None,
            sentry_dsn: None,
        };
        // Lazy pool: no connection is made unless a query runs.
        let pool = PgPool::connect_lazy("postgres://localhost/test").expect("lazy pool");
        AppState::new(config, pool).expect("state")
    }

    #[tokio::test]
    async fn echoes_the_configured_liff_id() {
        let state = test_state(Some("1234567890-abcdefgh".to_owned()));
        let Json(body) = show(State(state)).await;
        assert_eq!(body["liffId"], "1234567890-abcdefgh");
    }

    #[tokio::test]
    async fn liff_id_is_null_when_unset() {
        let state = test_state(None);
        let Json(body) = show(State(state)).await;
        assert!(body["liffId"].is_null());
    }
}
