use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub assets: AssetStoreConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub pricing: PricingDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
}

// Sessions mirror the 7-day guest tokens of the original flow.
fn default_session_ttl() -> u64 {
    7 * 24 * 60 * 60
}

/// Static shared secret for the admin surface plus the inbox that
/// receives verification alerts.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub token: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// SMTP relay host; mail is disabled (log-only) when unset.
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_mail_from")]
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from: default_mail_from(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_mail_from() -> String {
    "noreply@sawaari.local".to_owned()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetStoreConfig {
    /// Image-host API base URL; uploads stay in memory when unset.
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_asset_folder")]
    pub folder: String,
}

impl Default for AssetStoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: String::new(),
            folder: default_asset_folder(),
        }
    }
}

fn default_asset_folder() -> String {
    "sawaari-proofs".to_owned()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Operator contact details shown on tracking pages and in e-tickets.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Default per-deck seat prices in paise, used when seeding a slot.
/// Read from configuration per request, never cached at startup.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PricingDefaults {
    pub base_price_upper: i32,
    pub base_price_lower: i32,
}

impl Default for PricingDefaults {
    fn default() -> Self {
        Self {
            base_price_upper: 59900,
            base_price_lower: 69900,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of SAWAARI)
            // E.g. `SAWAARI_SERVER__PORT=8080` sets `server.port`
            .add_source(config::Environment::with_prefix("SAWAARI").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
