//! Server configuration.

use std::path::PathBuf;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Environment variable holding the allowed CORS origins, comma-separated.
pub const CORS_ORIGINS_ENV: &str = "PROJECT_BOARD_CORS_ORIGINS";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Database file. `None` uses the platform data directory.
    pub database: Option<PathBuf>,
    /// Allowed CORS origins. `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        cors_layer(self.cors_origins.as_deref())
    }
}

/// Read the origin list from [`CORS_ORIGINS_ENV`]. Blank entries are dropped.
pub fn cors_origins_from_env() -> Option<Vec<String>> {
    std::env::var(CORS_ORIGINS_ENV)
        .ok()
        .map(|s| parse_origins(&s))
        .filter(|origins| !origins.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Build the CORS layer: permissive without an origin list, restricted otherwise.
pub fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
