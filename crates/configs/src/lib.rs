use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Environment tag reported by /readyz (e.g. "dev", "staging", "prod").
    #[serde(default = "default_env")]
    pub env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub object_store: ObjectStoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub selftest: SelfTestConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_env() -> String {
    "dev".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), log_format: default_log_format() }
    }
}

fn default_log_format() -> String {
    "compact".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. When empty it is assembled from the discrete
    /// DB_* parts or taken from DATABASE_URL.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_boot_retries")]
    pub boot_retries: u32,
    #[serde(default = "default_boot_retry_delay")]
    pub boot_retry_delay_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: default_db_host(),
            port: default_db_port(),
            user: String::new(),
            password: String::new(),
            name: String::new(),
            sslmode: default_sslmode(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            boot_retries: default_boot_retries(),
            boot_retry_delay_secs: default_boot_retry_delay(),
            sqlx_logging: false,
        }
    }
}

fn default_db_host() -> String { "localhost".to_string() }
fn default_db_port() -> u16 { 5432 }
fn default_sslmode() -> String { "prefer".to_string() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_boot_retries() -> u32 { 10 }
fn default_boot_retry_delay() -> u64 { 3 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub tls: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 6379, password: String::new(), tls: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStoreConfig {
    /// Bucket name; object storage is considered unconfigured when empty.
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Key namespace prefix inside the bucket.
    #[serde(default = "default_object_prefix")]
    pub prefix: String,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self { bucket: None, region: None, prefix: default_object_prefix() }
    }
}

fn default_object_prefix() -> String {
    "conncheck".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { secret: "dev-secret-change-me".into() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SelfTestConfig {
    #[serde(default)]
    pub run_on_boot: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub headers: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load config.toml when present, fall back to pure-env config otherwise,
    /// then normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        if let Ok(env) = std::env::var("APP_ENV") {
            if !env.trim().is_empty() {
                self.env = env;
            }
        }
        if self.env.trim().is_empty() {
            self.env = default_env();
        }
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.cache.normalize_from_env();
        self.object_store.normalize_from_env();
        self.auth.normalize_from_env();
        self.selftest.normalize_from_env();
        self.telemetry.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        let port_var = std::env::var("SERVER_PORT").or_else(|_| std::env::var("PORT"));
        if let Some(port) = port_var.ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Ok(fmt) = std::env::var("LOG_FORMAT") {
            if !fmt.trim().is_empty() {
                self.log_format = fmt;
            }
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.log_format.as_str() {
            "compact" | "json" => {}
            other => return Err(anyhow!("server.log_format must be \"compact\" or \"json\", got {other:?}")),
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.url = url;
            }
        }
        for (var, field) in [
            ("DB_HOST", &mut self.host as &mut String),
            ("DB_USER", &mut self.user),
            ("DB_PASSWORD", &mut self.password),
            ("DB_NAME", &mut self.name),
            ("DB_SSLMODE", &mut self.sslmode),
        ] {
            if let Ok(v) = std::env::var(var) {
                if !v.trim().is_empty() {
                    *field = v;
                }
            }
        }
        if let Some(port) = std::env::var("DB_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        // Assemble a URL from the discrete parts when none was given directly.
        if self.url.trim().is_empty() && !self.user.trim().is_empty() && !self.name.trim().is_empty() {
            self.url = format!(
                "postgres://{}:{}@{}:{}/{}?sslmode={}",
                self.user, self.password, self.host, self.port, self.name, self.sslmode
            );
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!(
                "database.url is empty; provide DATABASE_URL, the DB_* variables, or config.toml"
            ));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        if self.boot_retries == 0 {
            return Err(anyhow!("database.boot_retries must be >= 1"));
        }
        Ok(())
    }
}

impl CacheConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("REDIS_HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if let Some(port) = std::env::var("REDIS_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Ok(pw) = std::env::var("REDIS_PASSWORD") {
            self.password = pw;
        }
        if let Ok(tls) = std::env::var("REDIS_TLS") {
            self.tls = matches!(tls.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    /// Connection URL for the redis client; rediss:// when TLS is enabled.
    pub fn url(&self) -> String {
        let scheme = if self.tls { "rediss" } else { "redis" };
        if self.password.is_empty() {
            format!("{}://{}:{}/", scheme, self.host, self.port)
        } else {
            format!("{}://:{}@{}:{}/", scheme, self.password, self.host, self.port)
        }
    }
}

impl ObjectStoreConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(bucket) = std::env::var("S3_BUCKET") {
            if !bucket.trim().is_empty() {
                self.bucket = Some(bucket);
            }
        }
        if let Ok(region) = std::env::var("AWS_REGION") {
            if !region.trim().is_empty() {
                self.region = Some(region);
            }
        }
        if let Some(b) = &self.bucket {
            if b.trim().is_empty() {
                self.bucket = None;
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.bucket.is_some()
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(secret) = std::env::var("AUTH_SECRET") {
            if !secret.trim().is_empty() {
                self.secret = secret;
            }
        }
    }
}

impl SelfTestConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(v) = std::env::var("SELFTEST_ON_BOOT") {
            self.run_on_boot = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }
}

impl TelemetryConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(v) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
            if !v.trim().is_empty() {
                self.endpoint = Some(v);
            }
        }
        if let Ok(v) = std::env::var("OTEL_EXPORTER_OTLP_HEADERS") {
            if !v.trim().is_empty() {
                self.headers = Some(v);
            }
        }
        if let Ok(v) = std::env::var("OTEL_SERVICE_NAME") {
            if !v.trim().is_empty() {
                self.service_name = Some(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_url_assembled_from_parts() {
        let mut db = DatabaseConfig {
            user: "demo".into(),
            password: "pw".into(),
            name: "appdb".into(),
            ..Default::default()
        };
        db.host = "db.internal".into();
        db.port = 5433;
        db.sslmode = "require".into();
        // Bypass env lookup: assemble directly the way normalize does.
        db.url = format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            db.user, db.password, db.host, db.port, db.name, db.sslmode
        );
        assert!(db.validate().is_ok());
        assert_eq!(db.url, "postgres://demo:pw@db.internal:5433/appdb?sslmode=require");
    }

    #[test]
    fn db_url_scheme_rejected() {
        let db = DatabaseConfig { url: "mysql://x/y".into(), ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn cache_url_schemes() {
        let mut cache = CacheConfig::default();
        assert_eq!(cache.url(), "redis://127.0.0.1:6379/");
        cache.tls = true;
        cache.password = "s3cret".into();
        assert_eq!(cache.url(), "rediss://:s3cret@127.0.0.1:6379/");
    }

    #[test]
    fn object_store_unconfigured_when_bucket_blank() {
        let mut os = ObjectStoreConfig { bucket: Some("  ".into()), ..Default::default() };
        os.normalize_from_env();
        // Blank bucket collapses to unconfigured unless S3_BUCKET overrides it.
        if std::env::var("S3_BUCKET").is_err() {
            assert!(!os.is_configured());
        }
    }

    #[test]
    fn toml_roundtrip_minimal() {
        let cfg: AppConfig = toml::from_str(
            r#"
            env = "staging"

            [server]
            host = "0.0.0.0"
            port = 9090

            [database]
            url = "postgres://u:p@h:5432/d"

            [selftest]
            run_on_boot = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.env, "staging");
        assert_eq!(cfg.server.port, 9090);
        assert!(cfg.selftest.run_on_boot);
        assert_eq!(cfg.cache.port, 6379);
    }
}
