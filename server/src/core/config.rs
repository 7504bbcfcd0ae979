use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    CONFIG_FILE_NAME, DEFAULT_DB_NAME, DEFAULT_HOST, DEFAULT_MEDIA_PUBLIC_BASE_URL, DEFAULT_PORT,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Authentication configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub enabled: Option<bool>,
    pub jwt_secret: Option<String>,
    pub jwt_audience: Option<String>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// MongoDB connection string (or use DB_CONNECTION_STRING env var)
    pub url: Option<String>,
    /// Database name (default: "foodtomake")
    pub name: Option<String>,
}

/// Media storage configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MediaFileConfig {
    pub recipe_bucket: Option<String>,
    pub user_bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub public_base_url: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub media: Option<MediaFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    pub jwt_secret: String,
    pub jwt_audience: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
}

/// Media storage configuration (only present when buckets are configured)
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub recipe_bucket: String,
    pub user_bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub public_base_url: String,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub media: Option<MediaConfig>,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();

        let overlay_path = if let Some(ref path) = cli.config {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.clone())
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            file_config = FileConfig::load_from_file(&path)?;
            file_config.warn_unknown_fields();
            tracing::debug!(path = %path.display(), "Config file loaded");
        }

        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_media = file_config.media.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        // auth.enabled: file config sets default, --no-auth CLI flag disables
        let auth_enabled = if cli.no_auth {
            false
        } else {
            file_auth.enabled.unwrap_or(true)
        };

        let jwt_secret = cli
            .jwt_secret
            .clone()
            .or(file_auth.jwt_secret)
            .unwrap_or_default();
        let jwt_audience = cli
            .jwt_audience
            .clone()
            .or(file_auth.jwt_audience)
            .unwrap_or_default();

        let db_url = cli
            .db_url
            .clone()
            .or(file_database.url)
            .unwrap_or_default();
        let db_name = cli
            .db_name
            .clone()
            .or(file_database.name)
            .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        // Media storage is optional: enabled when both buckets are configured
        let recipe_bucket = cli
            .media_recipe_bucket
            .clone()
            .or(file_media.recipe_bucket);
        let user_bucket = cli.media_user_bucket.clone().or(file_media.user_bucket);
        let media = match (recipe_bucket, user_bucket) {
            (Some(recipe_bucket), Some(user_bucket))
                if !recipe_bucket.is_empty() && !user_bucket.is_empty() =>
            {
                Some(MediaConfig {
                    recipe_bucket,
                    user_bucket,
                    region: cli.media_region.clone().or(file_media.region),
                    endpoint: cli.media_endpoint.clone().or(file_media.endpoint),
                    public_base_url: cli
                        .media_public_base_url
                        .clone()
                        .or(file_media.public_base_url)
                        .unwrap_or_else(|| DEFAULT_MEDIA_PUBLIC_BASE_URL.to_string())
                        .trim_end_matches('/')
                        .to_string(),
                })
            }
            _ => None,
        };

        let debug = cli.debug || file_config.debug.unwrap_or(false);

        let config = Self {
            server: ServerConfig { host, port },
            auth: AuthConfig {
                enabled: auth_enabled,
                jwt_secret,
                jwt_audience,
            },
            database: DatabaseConfig {
                url: db_url,
                name: db_name,
            },
            media,
            debug,
        };

        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            auth_enabled = config.auth.enabled,
            db_name = %config.database.name,
            media_enabled = config.media.is_some(),
            debug = config.debug,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }
        if self.database.url.is_empty() {
            anyhow::bail!(
                "Configuration error: database.url is required (set DB_CONNECTION_STRING)"
            );
        }
        // Tokens are issued at login even when enforcement is off, so a secret
        // is always required.
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("Configuration error: auth.jwt_secret is required (set JWT_SECRET)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> CliConfig {
        CliConfig {
            host: None,
            port: None,
            no_auth: false,
            debug: false,
            config: None,
            db_url: Some("mongodb://localhost:27017".to_string()),
            db_name: None,
            jwt_secret: Some("test-secret".to_string()),
            jwt_audience: Some("foodtomake-web".to_string()),
            media_recipe_bucket: None,
            media_user_bucket: None,
            media_region: None,
            media_endpoint: None,
            media_public_base_url: None,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::load(&base_cli()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.name, DEFAULT_DB_NAME);
        assert!(config.auth.enabled);
        assert!(config.media.is_none());
    }

    #[test]
    fn test_missing_db_url_rejected() {
        let mut cli = base_cli();
        cli.db_url = None;
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let mut cli = base_cli();
        cli.jwt_secret = None;
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_no_auth_flag_disables_enforcement() {
        let mut cli = base_cli();
        cli.no_auth = true;
        let config = AppConfig::load(&cli).unwrap();
        assert!(!config.auth.enabled);
    }

    #[test]
    fn test_media_requires_both_buckets() {
        let mut cli = base_cli();
        cli.media_recipe_bucket = Some("recipe-photos".to_string());
        let config = AppConfig::load(&cli).unwrap();
        assert!(config.media.is_none());

        cli.media_user_bucket = Some("user-storage".to_string());
        let config = AppConfig::load(&cli).unwrap();
        let media = config.media.unwrap();
        assert_eq!(media.recipe_bucket, "recipe-photos");
        assert_eq!(media.public_base_url, DEFAULT_MEDIA_PUBLIC_BASE_URL);
    }

    #[test]
    fn test_config_file_overlay_and_cli_priority() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{"server": {"host": "0.0.0.0", "port": 9000}, "database": {"name": "fromfile"}}"#,
        )
        .unwrap();

        let mut cli = base_cli();
        cli.config = Some(path);
        cli.port = Some(9001);
        let config = AppConfig::load(&cli).unwrap();
        // CLI beats file, file beats defaults
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.name, "fromfile");
    }

    #[test]
    fn test_missing_config_file_rejected() {
        let mut cli = base_cli();
        cli.config = Some(PathBuf::from("/nonexistent/foodtomake.json"));
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_config_file_parse() {
        let json = r#"{
            "server": {"port": 8080},
            "auth": {"enabled": false},
            "database": {"url": "mongodb://db:27017", "name": "foodtomaketest"}
        }"#;
        let file: FileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(file.server.unwrap().port, Some(8080));
        assert_eq!(file.auth.unwrap().enabled, Some(false));
        assert_eq!(file.database.unwrap().name.as_deref(), Some("foodtomaketest"));
    }
}
