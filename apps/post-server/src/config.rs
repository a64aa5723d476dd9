//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use post_infra::MongoConfig;

const DEFAULT_DATABASE: &str = "posts";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Document store settings; `None` runs on the in-memory store.
    pub store: Option<MongoConfig>,
    /// Deadline after which an in-flight request is cancelled.
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let store = lookup("POST_MONGO_URL").map(|url| {
            let database =
                lookup("POST_MONGO_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
            // One value named both database and collection in earlier deployments
            let collection = lookup("POST_MONGO_COLLECTION").unwrap_or_else(|| database.clone());

            MongoConfig {
                url,
                database,
                collection,
                max_pool_size: lookup("POST_MONGO_MAX_POOL_SIZE")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(100),
                app_name: lookup("OTEL_SERVICE_NAME").or_else(|| Some("post-server".to_string())),
            }
        });

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            store,
            request_timeout: Duration::from_secs(
                lookup("REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
