use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token issuer URL, e.g. https://my-tenant.us.auth0.com/
    pub issuer: String,
    /// Expected audience identifier, e.g. "drinks"
    pub audience: String,
    /// Accepted signing algorithms, e.g. ["RS256"]
    pub algorithms: Vec<String>,
    /// Explicit JWKS endpoint. When None, derived from the issuer as
    /// {issuer}/.well-known/jwks.json
    pub jwks_url: Option<String>,
}

impl AuthConfig {
    /// Resolve the key-set endpoint for this issuer.
    pub fn jwks_endpoint(&self) -> String {
        match &self.jwks_url {
            Some(url) => url.clone(),
            None => format!(
                "{}/.well-known/jwks.json",
                self.issuer.trim_end_matches('/')
            ),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment-specific defaults, then explicit env var overrides
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("BARISTA_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
        {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_ISSUER") {
            self.auth.issuer = v;
        }
        if let Ok(v) = env::var("AUTH_AUDIENCE") {
            self.auth.audience = v;
        }
        if let Ok(v) = env::var("AUTH_ALGORITHMS") {
            self.auth.algorithms = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("AUTH_JWKS_URL") {
            self.auth.jwks_url = Some(v);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: "sqlite:drinks.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            auth: AuthConfig {
                issuer: "https://dev-coffeeshop.us.auth0.com/".to_string(),
                audience: "drinks".to_string(),
                algorithms: vec!["RS256".to_string()],
                jwks_url: None,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: "sqlite:drinks.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                issuer: "https://staging-coffeeshop.us.auth0.com/".to_string(),
                audience: "drinks".to_string(),
                algorithms: vec!["RS256".to_string()],
                jwks_url: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: "sqlite:drinks.db?mode=rwc".to_string(),
                max_connections: 20,
            },
            auth: AuthConfig {
                issuer: "https://coffeeshop.us.auth0.com/".to_string(),
                audience: "drinks".to_string(),
                algorithms: vec!["RS256".to_string()],
                jwks_url: None,
            },
        }
    }
}
