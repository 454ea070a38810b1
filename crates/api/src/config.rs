use crate::auth::jwt::JwtConfig;

/// Where project rows and uploaded images live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// The hosted provider (Supabase REST + Storage).
    Hosted { url: String, anon_key: String },
    /// In-process rows, lost on restart. Local development only.
    Memory,
}

/// Completion provider settings.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Server configuration loaded from environment variables.
///
/// Defaults suit local development; credentials have no defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`). Must exceed
    /// `upstream_timeout_secs`.
    pub request_timeout_secs: u64,
    /// Timeout for outbound provider and store calls (default: `45`).
    pub upstream_timeout_secs: u64,
    pub openai: OpenAiConfig,
    pub store: StoreConfig,
    /// Session token verification.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                      |
    /// |-------------------------|------------------------------|
    /// | `HOST`                  | `0.0.0.0`                    |
    /// | `PORT`                  | `3000`                       |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`      |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                         |
    /// | `UPSTREAM_TIMEOUT_SECS` | `45`                         |
    /// | `OPENAI_API_KEY`        | **required**                 |
    /// | `OPENAI_BASE_URL`       | `https://api.openai.com/v1`  |
    /// | `STORE_BACKEND`         | `hosted` (`hosted`/`memory`) |
    /// | `SUPABASE_URL`          | required when hosted         |
    /// | `SUPABASE_ANON_KEY`     | required when hosted         |
    ///
    /// # Panics
    ///
    /// Panics on missing credentials or unparseable values.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upstream_timeout_secs: u64 = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "45".into())
            .parse()
            .expect("UPSTREAM_TIMEOUT_SECS must be a valid u64");

        let openai = OpenAiConfig {
            api_key: required("OPENAI_API_KEY"),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| fixio_ai::api::DEFAULT_BASE_URL.into()),
        };

        let store = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "hosted".into())
            .as_str()
        {
            "memory" => StoreConfig::Memory,
            "hosted" => StoreConfig::Hosted {
                url: required("SUPABASE_URL"),
                anon_key: required("SUPABASE_ANON_KEY"),
            },
            other => panic!("STORE_BACKEND must be 'hosted' or 'memory' (got '{other}')"),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upstream_timeout_secs,
            openai,
            store,
            jwt,
        }
    }
}

fn required(name: &str) -> String {
    let value =
        std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set in the environment"));
    assert!(!value.is_empty(), "{name} must not be empty");
    value
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://localhost:3000, ,https://fixio.app,"),
            vec!["http://localhost:3000", "https://fixio.app"]
        );
    }
}
