use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "inkwell.toml",
    "config/inkwell.toml",
    "crates/config/inkwell.toml",
    "../inkwell.toml",
    "../config/inkwell.toml",
    "../crates/config/inkwell.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://inkwell.db".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_session_ttl")]
    pub session_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_email_token_ttl")]
    pub email_token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: Self::default_session_ttl(),
            email_token_ttl_seconds: Self::default_email_token_ttl(),
        }
    }
}

impl AuthConfig {
    fn default_session_ttl() -> u64 {
        86_400
    }

    fn default_email_token_ttl() -> u64 {
        3_600
    }
}

/// Settings for the outbound mail transport and the confirmation links it
/// embeds. When `smtp_host` is empty the server falls back to a logging
/// notifier instead of a real SMTP connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "EmailConfig::default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default = "EmailConfig::default_from_address")]
    pub from_address: String,
    #[serde(default = "EmailConfig::default_frontend_url")]
    pub frontend_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: Self::default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from_address: Self::default_from_address(),
            frontend_url: Self::default_frontend_url(),
        }
    }
}

impl EmailConfig {
    const fn default_smtp_port() -> u16 {
        587
    }

    fn default_from_address() -> String {
        "no-reply@inkwell.local".to_string()
    }

    fn default_frontend_url() -> String {
        "http://localhost:3000".to_string()
    }

    pub fn smtp_configured(&self) -> bool {
        !self.smtp_host.is_empty()
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use inkwell_config::load;
///
/// std::env::remove_var("INKWELL_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let db_max = defaults.database.max_connections as i64;
    let session_ttl = clamp_to_i64(defaults.auth.session_ttl_seconds);
    let token_ttl = clamp_to_i64(defaults.auth.email_token_ttl_seconds);

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default("database.url", defaults.database.url.clone())
        .unwrap()
        .set_default("database.max_connections", db_max)
        .unwrap()
        .set_default("auth.session_ttl_seconds", session_ttl)
        .unwrap()
        .set_default("auth.email_token_ttl_seconds", token_ttl)
        .unwrap()
        .set_default("email.smtp_host", defaults.email.smtp_host.clone())
        .unwrap()
        .set_default("email.smtp_port", i64::from(defaults.email.smtp_port))
        .unwrap()
        .set_default("email.from_address", defaults.email.from_address.clone())
        .unwrap()
        .set_default("email.frontend_url", defaults.email.frontend_url.clone())
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("INKWELL").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("INKWELL_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via INKWELL_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.session_ttl_seconds > i64::MAX as u64 {
        config.auth.session_ttl_seconds = i64::MAX as u64;
    }
    if config.auth.email_token_ttl_seconds > i64::MAX as u64 {
        config.auth.email_token_ttl_seconds = i64::MAX as u64;
    }

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

fn clamp_to_i64(value: u64) -> i64 {
    if value > i64::MAX as u64 {
        i64::MAX
    } else {
        value as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.http.port, 7080);
        assert_eq!(config.auth.email_token_ttl_seconds, 3_600);
        assert_eq!(config.auth.session_ttl_seconds, 86_400);
        assert!(!config.email.smtp_configured());
        assert!(config.database.url.starts_with("sqlite://"));
    }

    #[test]
    fn smtp_configured_requires_a_host() {
        let mut email = EmailConfig::default();
        assert!(!email.smtp_configured());

        email.smtp_host = "mail.example.com".to_string();
        assert!(email.smtp_configured());
    }
}
