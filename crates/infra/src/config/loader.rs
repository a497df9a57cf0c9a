//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If a required variable is missing, falls back to a config file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `ACELAB_DB_PATH`: Database file path
//! - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`: OAuth client credentials
//!
//! Optional:
//! - `ACELAB_DB_POOL_SIZE`: Connection pool size (default 8)
//! - `ACELAB_DB_ENCRYPTION_KEY`: SQLCipher key
//! - `GOOGLE_REDIRECT_URI`: defaults to `{APP_URL}/api/google/callback`
//! - `APP_URL`: public base URL of this server (default `http://localhost:8080`)
//! - `GOOGLE_STATE_SECRET`: enables HMAC-signed OAuth state
//! - `GOOGLE_REQUEST_TIMEOUT_SECS`: HTTP timeout for Google calls (default 30)
//! - `APP_NAME`: application name sent to Google (default `Acelab Tutors`)
//! - `FRONTEND_URL`: where the OAuth callback redirects to
//! - `ACELAB_BIND_ADDR`: server listen address
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `acelab.{json,toml}` in the
//! working directory, its parents (up to 2 levels) and next to the
//! executable.

use std::path::{Path, PathBuf};

use acelab_domain::{AcelabError, Config, DatabaseConfig, GoogleConfig, Result, ServerConfig};

const DEFAULT_APP_URL: &str = "http://localhost:8080";
const DEFAULT_POOL_SIZE: u32 = 8;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `AcelabError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `AcelabError::Config` if required variables are missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("ACELAB_DB_PATH")?;
    let pool_size = env_parse("ACELAB_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?;
    let encryption_key = env_opt("ACELAB_DB_ENCRYPTION_KEY");

    let client_id = env_var("GOOGLE_CLIENT_ID")?;
    let client_secret = env_var("GOOGLE_CLIENT_SECRET")?;
    let redirect_uri = env_opt("GOOGLE_REDIRECT_URI").unwrap_or_else(|| {
        let app_url = env_opt("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string());
        format!("{}/api/google/callback", app_url.trim_end_matches('/'))
    });

    let mut google = GoogleConfig::new(client_id, client_secret, redirect_uri);
    google.state_secret = env_opt("GOOGLE_STATE_SECRET");
    google.request_timeout_secs =
        env_parse("GOOGLE_REQUEST_TIMEOUT_SECS", google.request_timeout_secs)?;
    if let Some(name) = env_opt("APP_NAME") {
        google.application_name = name;
    }

    let defaults = ServerConfig::default();
    let server = ServerConfig {
        bind_address: env_opt("ACELAB_BIND_ADDR").unwrap_or(defaults.bind_address),
        frontend_url: env_opt("FRONTEND_URL").unwrap_or(defaults.frontend_url),
    };

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size, encryption_key },
        google,
        server,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by file extension.
///
/// # Errors
/// Returns `AcelabError::Config` if the file is missing, unreadable, or
/// invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AcelabError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AcelabError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AcelabError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, by `path` extension.
pub(crate) fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AcelabError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AcelabError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AcelabError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut bases = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        bases.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        bases.push(exe_dir);
    }

    bases.iter().flat_map(|base| candidates_in(base)).find(|path| path.exists())
}

fn candidates_in(base: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for name in ["config", "acelab"] {
        for ext in ["json", "toml"] {
            paths.push(base.join(format!("{name}.{ext}")));
        }
    }
    for parent in ["..", "../.."] {
        for ext in ["json", "toml"] {
            paths.push(base.join(parent).join(format!("config.{ext}")));
        }
    }
    paths
}

/// Required environment variable; blank counts as missing.
fn env_var(key: &str) -> Result<String> {
    env_opt(key)
        .ok_or_else(|| AcelabError::Config(format!("Missing required environment variable: {key}")))
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| AcelabError::Config(format!("Invalid value for {key}: {e}"))),
        None => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`
/// (case-insensitive); anything else is `false`.
pub fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map_or(default, |s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: &[&str] = &[
        "ACELAB_DB_PATH",
        "ACELAB_DB_POOL_SIZE",
        "ACELAB_DB_ENCRYPTION_KEY",
        "GOOGLE_CLIENT_ID",
        "GOOGLE_CLIENT_SECRET",
        "GOOGLE_REDIRECT_URI",
        "GOOGLE_STATE_SECRET",
        "GOOGLE_REQUEST_TIMEOUT_SECS",
        "APP_URL",
        "APP_NAME",
        "FRONTEND_URL",
        "ACELAB_BIND_ADDR",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    fn set_required() {
        std::env::set_var("ACELAB_DB_PATH", "/tmp/acelab-test.db");
        std::env::set_var("GOOGLE_CLIENT_ID", "client-id");
        std::env::set_var("GOOGLE_CLIENT_SECRET", "client-secret");
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for value in ["1", "true", "YES", "on"] {
            std::env::set_var("ACELAB_TEST_BOOL", value);
            assert!(env_bool("ACELAB_TEST_BOOL", false), "{value} should be true");
        }
        for value in ["0", "false", "no", "off", "maybe"] {
            std::env::set_var("ACELAB_TEST_BOOL", value);
            assert!(!env_bool("ACELAB_TEST_BOOL", true), "{value} should be false");
        }

        std::env::remove_var("ACELAB_TEST_BOOL");
        assert!(env_bool("ACELAB_TEST_BOOL", true));
    }

    #[test]
    fn test_load_from_env_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        set_required();

        let config = load_from_env().expect("required vars are set");
        assert_eq!(config.database.path, "/tmp/acelab-test.db");
        assert_eq!(config.database.pool_size, DEFAULT_POOL_SIZE);
        assert!(config.database.encryption_key.is_none());
        assert_eq!(config.google.redirect_uri, "http://localhost:8080/api/google/callback");
        assert!(config.google.state_secret.is_none());
        assert_eq!(config.google.application_name, "Acelab Tutors");
        assert_eq!(config.server.frontend_url, "http://localhost:3000");

        clear_env();
    }

    #[test]
    fn test_load_from_env_overrides() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        set_required();
        std::env::set_var("ACELAB_DB_POOL_SIZE", "3");
        std::env::set_var("ACELAB_DB_ENCRYPTION_KEY", "db-key");
        std::env::set_var("APP_URL", "https://api.acelab.test/");
        std::env::set_var("GOOGLE_STATE_SECRET", "state-secret");
        std::env::set_var("GOOGLE_REQUEST_TIMEOUT_SECS", "10");
        std::env::set_var("APP_NAME", "Acelab Staging");
        std::env::set_var("FRONTEND_URL", "https://acelab.test");
        std::env::set_var("ACELAB_BIND_ADDR", "0.0.0.0:9000");

        let config = load_from_env().expect("config loads");
        assert_eq!(config.database.pool_size, 3);
        assert_eq!(config.database.encryption_key.as_deref(), Some("db-key"));
        assert_eq!(config.google.redirect_uri, "https://api.acelab.test/api/google/callback");
        assert_eq!(config.google.state_secret.as_deref(), Some("state-secret"));
        assert_eq!(config.google.request_timeout_secs, 10);
        assert_eq!(config.google.application_name, "Acelab Staging");
        assert_eq!(config.server.frontend_url, "https://acelab.test");
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");

        std::env::set_var("GOOGLE_REDIRECT_URI", "https://cb.acelab.test/google");
        let config = load_from_env().expect("config loads");
        assert_eq!(config.google.redirect_uri, "https://cb.acelab.test/google");

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("ACELAB_DB_PATH", "/tmp/acelab-test.db");
        std::env::set_var("GOOGLE_CLIENT_ID", "client-id");
        std::env::set_var("GOOGLE_CLIENT_SECRET", "   ");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, AcelabError::Config(ref msg) if msg.contains("GOOGLE_CLIENT_SECRET")));

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        set_required();
        std::env::set_var("ACELAB_DB_POOL_SIZE", "lots");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, AcelabError::Config(_)));

        clear_env();
    }

    #[test]
    fn test_parse_config_json() {
        let json = r#"{
            "database": { "path": "acelab.db", "pool_size": 4 },
            "google": {
                "client_id": "id",
                "client_secret": "secret",
                "redirect_uri": "http://localhost:8080/api/google/callback"
            }
        }"#;

        let config = parse_config(json, Path::new("config.json")).expect("valid JSON");
        assert_eq!(config.database.pool_size, 4);
        assert_eq!(config.google.client_secret, "secret");
        assert_eq!(config.google.calendar_id, "primary");
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_config_toml() {
        let toml = r#"
[database]
path = "acelab.db"
pool_size = 2
encryption_key = "db-key"

[google]
client_id = "id"
client_secret = "secret"
redirect_uri = "https://api.acelab.test/api/google/callback"
state_secret = "state"

[server]
bind_address = "0.0.0.0:8080"
frontend_url = "https://acelab.test"
"#;

        let config = parse_config(toml, Path::new("acelab.toml")).expect("valid TOML");
        assert_eq!(config.database.encryption_key.as_deref(), Some("db-key"));
        assert_eq!(config.google.state_secret.as_deref(), Some("state"));
        assert_eq!(config.server.frontend_url, "https://acelab.test");
    }

    #[test]
    fn test_parse_config_rejects_bad_input() {
        assert!(parse_config("{ not json", Path::new("config.json")).is_err());
        assert!(parse_config("a: b", Path::new("config.yaml")).is_err());
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/acelab.toml"))).unwrap_err();
        assert!(matches!(err, AcelabError::Config(_)));
    }
}
