use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Runtime configuration, loaded once at startup.
///
/// Field names map one-to-one onto the environment variables the deployment
/// already uses (`PORT`, `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`,
/// `DB_NAME`, `JWT_SECRET`, `NODE_ENV`), so the existing `.env` file keeps
/// working.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub port: u16,
    pub node_env: String,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    // Secrets are skipped when serializing, so the defaults source built
    // from `Config::default()` omits them; the serde defaults below fill
    // the gap when the environment does not provide a value.
    #[serde(skip_serializing, default = "default_db_password")]
    pub db_password: SecretString,
    pub db_name: String,
    #[serde(skip_serializing, default = "default_jwt_secret")]
    pub jwt_secret: SecretString,
    pub admin_email: String,
    #[serde(skip_serializing, default = "default_admin_password")]
    pub admin_password: SecretString,
    pub uploads_dir: String,
}

fn default_db_password() -> SecretString {
    "".to_string().into()
}

// Fallback signing key, kept for drop-in compatibility with the previous
// deployment. Override JWT_SECRET in any real environment.
fn default_jwt_secret() -> SecretString {
    "salon_sandra_secret_key".to_string().into()
}

fn default_admin_password() -> SecretString {
    "password".to_string().into()
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Flat mapping: DB_HOST overrides `db_host`, PORT overrides
            // `port`, and so on. `try_parsing` turns "4000" into a number
            // so the numeric fields deserialize.
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    /// Constructs the MySQL connection string.
    pub fn database_url(&self) -> SecretString {
        SecretString::from(format!(
            "mysql://{}:{}@{}:{}/{}",
            self.db_user,
            self.db_password.expose_secret(),
            self.db_host,
            self.db_port,
            self.db_name
        ))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4000,
            node_env: "development".to_string(),
            db_host: "localhost".to_string(),
            db_port: 3306,
            db_user: "root".to_string(),
            db_password: default_db_password(),
            db_name: "salon".to_string(),
            jwt_secret: default_jwt_secret(),
            admin_email: "admin@nuevatienda.com".to_string(),
            admin_password: default_admin_password(),
            uploads_dir: "uploads".to_string(),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets are skipped by serde, so this is safe to log.
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
