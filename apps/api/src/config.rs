use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Font used for every request. Loaded once at startup.
    pub default_font_path: String,
    pub background_timeout_secs: u64,
    pub background_max_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            default_font_path: std::env::var("DEFAULT_FONT_PATH")
                .unwrap_or_else(|_| "./font.otf".to_string()),
            background_timeout_secs: parse_env("BACKGROUND_TIMEOUT_SECS", 10)?,
            background_max_bytes: parse_env("BACKGROUND_MAX_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u16 = parse_env("TEXTCARD_TEST_UNSET_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("TEXTCARD_TEST_BAD_PORT", "eighty");
        let err = parse_env::<u16>("TEXTCARD_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("TEXTCARD_TEST_BAD_PORT"));
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("TEXTCARD_TEST_TIMEOUT", "3");
        let value: u64 = parse_env("TEXTCARD_TEST_TIMEOUT", 10).unwrap();
        assert_eq!(value, 3);
    }
}
