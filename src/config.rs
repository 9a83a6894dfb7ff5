use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` keeps everything in process memory.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub calorie_goal: u32,
    pub chat_reply_delay_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fitcraft".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fitcraft-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        Ok(Self {
            database_url,
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            calorie_goal: env_or("CALORIE_GOAL", 2500),
            chat_reply_delay_ms: env_or("CHAT_REPLY_DELAY_MS", 900),
        })
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_bad_values() {
        assert_eq!(env_or::<u32>("FITCRAFT_TEST_UNSET_VAR", 7), 7);
        std::env::set_var("FITCRAFT_TEST_BAD_NUMBER", "seven");
        assert_eq!(env_or::<u32>("FITCRAFT_TEST_BAD_NUMBER", 7), 7);
        std::env::set_var("FITCRAFT_TEST_GOOD_NUMBER", "2000");
        assert_eq!(env_or::<u32>("FITCRAFT_TEST_GOOD_NUMBER", 7), 2000);
    }
}
