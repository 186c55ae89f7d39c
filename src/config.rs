use serde::Deserialize;

pub const GOOGLE_PROFILE_URL: &str = "https://www.googleapis.com/plus/v1/people/me";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Outbound identity provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub profile_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub google: GoogleConfig,
    pub reset_code_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cms".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cms-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60 * 24),
        };
        let google = GoogleConfig {
            profile_url: std::env::var("GOOGLE_PROFILE_URL")
                .unwrap_or_else(|_| GOOGLE_PROFILE_URL.into()),
            timeout_secs: env_or("GOOGLE_TIMEOUT_SECS", 5),
        };
        Ok(Self {
            database_url,
            jwt,
            google,
            reset_code_ttl_minutes: env_or("RESET_CODE_TTL_MINUTES", 30),
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
