//! Server configuration

/// Server configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    /// Postgres connection URL. Absent → the process runs in no-database
    /// mode and store-backed endpoints fail per request.
    pub database_url: Option<String>,
    /// OpenAI API key. Absent → chat generation is disabled.
    pub openai_api_key: Option<String>,
    pub bind_address: String,
    /// Deployment-environment tag, echoed by the status route.
    pub environment: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables, read once at startup
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);

        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            bind_address: format!("0.0.0.0:{port}"),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        }
    }
}
