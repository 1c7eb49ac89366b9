use crate::error::{AppError, Result};

pub const TARGET_URL: &str = "https://loteriasbr.com/";
pub const BROWSERLESS_URL: &str = "http://localhost:3001";

/// Card container; its presence marks the page as rendered.
pub const CARD_SELECTOR: &str = ".results__card";

/// How long the browser waits for `CARD_SELECTOR` before giving up.
pub const SELECTOR_TIMEOUT_MS: u64 = 10_000;

/// HTTP timeout for the render call. Must exceed the selector wait plus page load.
pub const RENDER_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Field fallbacks used when a selector matches nothing inside a card.
pub mod placeholders {
    pub const TITLE: &str = "Título não encontrado";
    pub const TIME: &str = "Hora não encontrada";
    pub const PRIZE: &str = "Prêmio não encontrado";
    pub const RESULT: &str = "(sem dados)";
    pub const GROUP: &str = "Grupo não encontrado";
}

/// Connection settings for the results store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Full connection URL (DATABASE_URL). Takes precedence over the parts above.
    pub url: Option<String>,
}

impl DbConfig {
    /// Connection URL for the `Any` driver. Built URLs always require TLS but
    /// do not verify the server certificate, so self-signed certs are accepted.
    pub fn connection_url(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let mut url = url::Url::parse(&format!("postgres://{}:{}", self.host, self.port))
            .map_err(|e| AppError::Config(format!("DB_HOST is not a valid host: {e}")))?;
        url.set_username(&self.user)
            .map_err(|_| AppError::Config("DB_USER cannot be used in a URL".to_string()))?;
        url.set_password(Some(&self.password))
            .map_err(|_| AppError::Config("DB_PASSWORD cannot be used in a URL".to_string()))?;
        url.set_path(&format!("/{}", self.name));
        url.query_pairs_mut().append_pair("sslmode", "require");
        Ok(url.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target_url: String,
    pub browserless_url: String,
    pub browserless_token: Option<String>,
    pub log_level: String,
    pub port: u16,
    pub static_dir: String,
    /// Run one scrape at startup (SCRAPE_ON_STARTUP). Disable for serve-only mode.
    pub scrape_on_startup: bool,
    pub db: DbConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Set-but-empty counts as unset.
        let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());
        let required = |key: &str| -> Result<String> {
            non_empty(key).ok_or_else(|| AppError::Config(format!("{key} must be set")))
        };

        let url = non_empty("DATABASE_URL");
        let db = match url {
            Some(url) => DbConfig {
                user: var("DB_USER").unwrap_or_default(),
                password: var("DB_PASSWORD").unwrap_or_default(),
                host: var("DB_HOST").unwrap_or_default(),
                port: DEFAULT_DB_PORT,
                name: var("DB_NAME").unwrap_or_default(),
                url: Some(url),
            },
            None => DbConfig {
                user: required("DB_USER")?,
                password: required("DB_PASSWORD")?,
                host: required("DB_HOST")?,
                port: var("DB_PORT")
                    .map(|p| p.parse::<u16>())
                    .transpose()
                    .map_err(|_| AppError::Config("DB_PORT must be a valid port number".to_string()))?
                    .unwrap_or(DEFAULT_DB_PORT),
                name: required("DB_NAME")?,
                url: None,
            },
        };

        Ok(Self {
            target_url: non_empty("TARGET_URL").unwrap_or_else(|| TARGET_URL.to_string()),
            browserless_url: non_empty("BROWSERLESS_URL")
                .unwrap_or_else(|| BROWSERLESS_URL.to_string()),
            browserless_token: non_empty("BROWSERLESS_TOKEN"),
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            port: non_empty("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?,
            static_dir: non_empty("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
            scrape_on_startup: var("SCRAPE_ON_STARTUP")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
            db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const DB_VARS: &[(&str, &str)] = &[
        ("DB_USER", "loteria"),
        ("DB_PASSWORD", "s3cret"),
        ("DB_HOST", "db.example.com"),
        ("DB_NAME", "resultados"),
    ];

    #[test]
    fn defaults_apply_when_only_db_vars_set() {
        let cfg = Config::from_lookup(lookup(DB_VARS)).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.target_url, TARGET_URL);
        assert_eq!(cfg.static_dir, "public");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.scrape_on_startup);
        assert!(cfg.browserless_token.is_none());
        assert_eq!(cfg.db.port, 5432);
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let mut vars = DB_VARS.to_vec();
        vars.extend([
            ("PORT", ""),
            ("TARGET_URL", ""),
            ("BROWSERLESS_URL", ""),
            ("STATIC_DIR", ""),
        ]);
        let cfg = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.target_url, TARGET_URL);
        assert_eq!(cfg.browserless_url, BROWSERLESS_URL);
        assert_eq!(cfg.static_dir, "public");
    }

    #[test]
    fn missing_db_var_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[("DB_USER", "x"), ("DB_HOST", "h")])).unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("DB_PASSWORD")), "{err}");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut vars = DB_VARS.to_vec();
        vars.push(("PORT", "not-a-port"));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn built_url_requires_tls_and_escapes_password() {
        let mut vars = DB_VARS.to_vec();
        vars.push(("DB_PASSWORD", "p@ss/word"));
        let cfg = Config::from_lookup(lookup(&vars)).unwrap();
        let url = cfg.db.connection_url().unwrap();
        assert!(url.starts_with("postgres://loteria:"), "{url}");
        assert!(url.contains("@db.example.com:5432/resultados"), "{url}");
        assert!(url.ends_with("?sslmode=require"), "{url}");
        assert!(!url.contains("p@ss/word"), "password must be percent-encoded: {url}");
    }

    #[test]
    fn database_url_overrides_parts() {
        let cfg = Config::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(cfg.db.connection_url().unwrap(), "sqlite::memory:");
    }

    #[test]
    fn scrape_on_startup_can_be_disabled() {
        let mut vars = DB_VARS.to_vec();
        vars.push(("SCRAPE_ON_STARTUP", "false"));
        let cfg = Config::from_lookup(lookup(&vars)).unwrap();
        assert!(!cfg.scrape_on_startup);
    }
}
