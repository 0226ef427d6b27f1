use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

/// Default token lifetime: seven days.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format `{other}`; expected compact or json")),
        }
    }
}

impl LogFormat {
    /// Format named by `LOG_FORMAT`, compact when unset or unrecognised.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT").ok().and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub run_migrations: bool,
}

/// Secret material for the credential hasher and the token signer.
///
/// Loaded once at startup and handed to the auth service; `Debug` output
/// never shows the secrets.
#[derive(Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub password_key: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

fn default_token_ttl() -> u64 { DEFAULT_TOKEN_TTL_SECS }

impl Default for AuthSettings {
    fn default() -> Self {
        Self { password_key: String::new(), jwt_secret: String::new(), token_ttl_secs: DEFAULT_TOKEN_TTL_SECS }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("password_key", &redact(&self.password_key))
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then fill gaps from the environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Fill empty values from the environment. `lookup` is injected so tests
    /// need not touch the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if self.database.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.database.url = url;
            }
        }
        if self.auth.password_key.is_empty() {
            if let Some(key) = lookup("PASSWORD_KEY") {
                self.auth.password_key = key;
            }
        }
        if self.auth.jwt_secret.is_empty() {
            if let Some(secret) = lookup("JWT_SECRET") {
                self.auth.jwt_secret = secret;
            }
        }
        if let Some(ttl) = lookup("TOKEN_TTL_SECS").and_then(|v| v.parse::<u64>().ok()) {
            self.auth.token_ttl_secs = ttl;
        }
        if let Some(format) = lookup("LOG_FORMAT").and_then(|v| v.parse::<LogFormat>().ok()) {
            self.log.format = format;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        Ok(())
    }
}

impl AuthSettings {
    pub fn validate(&self) -> Result<()> {
        if self.password_key.is_empty() {
            return Err(anyhow!("auth.password_key is empty; set it in config.toml or PASSWORD_KEY"));
        }
        if self.jwt_secret.is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.token_ttl_secs == 0 {
            return Err(anyhow!("auth.token_ttl_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const FULL: &str = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [database]
        url = "postgres://localhost/accounts"

        [auth]
        password_key = "pw-key"
        jwt_secret = "jwt-key"
        token_ttl_secs = 3600
    "#;

    #[test]
    fn parses_full_file() {
        let mut cfg = from_toml_str(FULL).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.auth.token_ttl_secs, 3600);
        assert!(!cfg.database.run_migrations);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = from_toml_str("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.auth.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn env_fills_missing_values() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgresql://db/accounts"),
            ("PASSWORD_KEY", "from-env"),
            ("JWT_SECRET", "jwt-from-env"),
            ("SERVER_PORT", "8181"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 8181);
        assert_eq!(cfg.auth.password_key, "from-env");
        assert_eq!(cfg.database.url, "postgresql://db/accounts");
    }

    #[test]
    fn file_values_win_over_env_secrets() {
        let mut cfg = from_toml_str(FULL).unwrap();
        cfg.apply_env(|k| (k == "PASSWORD_KEY").then(|| "other".to_string()));
        assert_eq!(cfg.auth.password_key, "pw-key");
    }

    #[test]
    fn missing_secrets_are_rejected() {
        let mut cfg = from_toml_str("[database]\nurl = \"postgres://x/y\"").unwrap();
        let err = cfg.normalize_and_validate().unwrap_err();
        assert!(err.to_string().contains("password_key"));
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        let db = DatabaseConfig { url: "mysql://x/y".into(), run_migrations: false };
        assert!(db.validate().is_err());
    }

    #[test]
    fn partial_server_section_keeps_defaults() {
        let cfg = from_toml_str("[server]\nport = 9000").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9000);
        let cfg = from_toml_str("[server]\nhost = \"0.0.0.0\"").unwrap();
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn log_format_from_file_and_env() {
        assert_eq!(from_toml_str("").unwrap().log.format, LogFormat::Compact);
        let mut cfg = from_toml_str("[log]\nformat = \"json\"").unwrap();
        assert_eq!(cfg.log.format, LogFormat::Json);
        cfg.apply_env(|k| (k == "LOG_FORMAT").then(|| "compact".to_string()));
        assert_eq!(cfg.log.format, LogFormat::Compact);
        cfg.apply_env(|k| (k == "LOG_FORMAT").then(|| "yaml".to_string()));
        assert_eq!(cfg.log.format, LogFormat::Compact);
        assert!(from_toml_str("[log]\nformat = \"yaml\"").is_err());
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cfg = from_toml_str(FULL).unwrap();
        let printed = format!("{:?}", cfg.auth);
        assert!(!printed.contains("pw-key"));
        assert!(!printed.contains("jwt-key"));
        assert!(printed.contains("<redacted>"));
    }
}
