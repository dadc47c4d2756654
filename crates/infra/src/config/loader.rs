//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variables are missing, falls back to a config file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. With neither, returns the built-in defaults
//!
//! ## Environment Variables
//! Required:
//! - `DOCPULSE_CLIENT_ID`: OAuth client identifier
//! - `DOCPULSE_CLIENT_SECRET`: OAuth client secret
//!
//! Optional overrides (defaults otherwise):
//! - `DOCPULSE_TOKEN_ENDPOINT`, `DOCPULSE_DRIVE_API_BASE`,
//!   `DOCPULSE_ACTIVITY_API_BASE`, `DOCPULSE_PEOPLE_API_BASE`
//! - `DOCPULSE_REQUEST_TIMEOUT_SECS`, `DOCPULSE_MAX_ATTEMPTS`
//! - `DOCPULSE_BACKFILL_LIMIT`, `DOCPULSE_SOURCE_TIMEOUT_SECS`
//! - `DOCPULSE_CLEANUP_DAYS`, `DOCPULSE_STALE_DAYS`, `DOCPULSE_LARGE_FILE_BYTES`
//! - `DOCPULSE_IGNORE_TTL_HOURS`, `DOCPULSE_IGNORE_PATTERNS` (comma separated),
//!   `DOCPULSE_IGNORE_PATTERNS_FILE`
//! - `DOCPULSE_LOG_LEVEL`, `DOCPULSE_LOG_JSON` (true/false)
//!
//! ## File Locations
//! The loader checks the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./docpulse.json` or `./docpulse.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use docpulse_domain::{Config, DocPulseError, LogFormat, Result};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `DocPulseError::Config` if an environment value or a found config
/// file is invalid.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            match probe_config_paths() {
                Some(path) => load_from_file(Some(path)),
                None => {
                    tracing::warn!("No configuration found; using built-in defaults");
                    Ok(Config::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// The OAuth client credentials must be present; every other section
/// starts from its defaults and applies whichever overrides are set.
///
/// # Errors
/// Returns `DocPulseError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.provider.client_id = Some(env_var("DOCPULSE_CLIENT_ID")?);
    config.provider.client_secret = Some(env_var("DOCPULSE_CLIENT_SECRET")?);

    if let Some(value) = env_opt("DOCPULSE_TOKEN_ENDPOINT") {
        config.provider.token_endpoint = value;
    }
    if let Some(value) = env_opt("DOCPULSE_DRIVE_API_BASE") {
        config.provider.drive_api_base = value;
    }
    if let Some(value) = env_opt("DOCPULSE_ACTIVITY_API_BASE") {
        config.provider.activity_api_base = value;
    }
    if let Some(value) = env_opt("DOCPULSE_PEOPLE_API_BASE") {
        config.provider.people_api_base = value;
    }
    if let Some(value) = env_parse("DOCPULSE_REQUEST_TIMEOUT_SECS")? {
        config.provider.request_timeout_secs = value;
    }
    if let Some(value) = env_parse("DOCPULSE_MAX_ATTEMPTS")? {
        config.provider.max_attempts = value;
    }

    if let Some(value) = env_parse("DOCPULSE_BACKFILL_LIMIT")? {
        config.fetch.backfill_limit = value;
    }
    if let Some(value) = env_parse("DOCPULSE_SOURCE_TIMEOUT_SECS")? {
        config.fetch.source_timeout_secs = value;
    }

    if let Some(value) = env_parse("DOCPULSE_CLEANUP_DAYS")? {
        config.classifier.cleanup_inactive_days = value;
    }
    if let Some(value) = env_parse("DOCPULSE_STALE_DAYS")? {
        config.classifier.stale_inactive_days = value;
    }
    if let Some(value) = env_parse("DOCPULSE_LARGE_FILE_BYTES")? {
        config.classifier.large_file_bytes = value;
    }

    if let Some(value) = env_parse("DOCPULSE_IGNORE_TTL_HOURS")? {
        config.ignore.cache_ttl_hours = value;
    }
    if let Some(value) = env_opt("DOCPULSE_IGNORE_PATTERNS") {
        config.ignore.patterns = value
            .split(',')
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_string)
            .collect();
    }
    config.ignore.patterns_file = env_opt("DOCPULSE_IGNORE_PATTERNS_FILE");

    if let Some(value) = env_opt("DOCPULSE_LOG_LEVEL") {
        config.logging.level = value;
    }
    if env_bool("DOCPULSE_LOG_JSON", false) {
        config.logging.format = LogFormat::Json;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, checks multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DocPulseError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DocPulseError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DocPulseError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DocPulseError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `DocPulseError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DocPulseError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DocPulseError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DocPulseError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "config.json",
        "config.toml",
        "docpulse.json",
        "docpulse.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `DocPulseError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        DocPulseError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty environment variable, if set.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

/// Parse an optional environment variable.
///
/// # Errors
/// Returns `DocPulseError::Config` if the variable is set but unparsable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| DocPulseError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const OVERRIDE_VARS: [&str; 8] = [
        "DOCPULSE_CLIENT_ID",
        "DOCPULSE_CLIENT_SECRET",
        "DOCPULSE_BACKFILL_LIMIT",
        "DOCPULSE_STALE_DAYS",
        "DOCPULSE_IGNORE_PATTERNS",
        "DOCPULSE_LOG_JSON",
        "DOCPULSE_DRIVE_API_BASE",
        "DOCPULSE_MAX_ATTEMPTS",
    ];

    fn clear_env() {
        for key in OVERRIDE_VARS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_DP_BOOL_TRUE", "yes");
        std::env::set_var("TEST_DP_BOOL_UPPER", "TRUE");
        std::env::set_var("TEST_DP_BOOL_FALSE", "off");

        assert!(env_bool("TEST_DP_BOOL_TRUE", false));
        assert!(env_bool("TEST_DP_BOOL_UPPER", false));
        assert!(!env_bool("TEST_DP_BOOL_FALSE", true));

        std::env::remove_var("TEST_DP_BOOL_MISSING");
        assert!(env_bool("TEST_DP_BOOL_MISSING", true));
        assert!(!env_bool("TEST_DP_BOOL_MISSING", false));

        std::env::remove_var("TEST_DP_BOOL_TRUE");
        std::env::remove_var("TEST_DP_BOOL_UPPER");
        std::env::remove_var("TEST_DP_BOOL_FALSE");
    }

    #[test]
    fn test_load_from_env_applies_overrides() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("DOCPULSE_CLIENT_ID", "client-123");
        std::env::set_var("DOCPULSE_CLIENT_SECRET", "shh");
        std::env::set_var("DOCPULSE_BACKFILL_LIMIT", "25");
        std::env::set_var("DOCPULSE_STALE_DAYS", "365");
        std::env::set_var("DOCPULSE_IGNORE_PATTERNS", "Archive, Photos ,,");
        std::env::set_var("DOCPULSE_LOG_JSON", "1");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.provider.client_id.as_deref(), Some("client-123"));
        assert_eq!(config.provider.client_secret.as_deref(), Some("shh"));
        assert_eq!(config.fetch.backfill_limit, 25);
        assert_eq!(config.classifier.stale_inactive_days, 365);
        assert_eq!(config.classifier.cleanup_inactive_days, 90);
        assert_eq!(config.ignore.patterns, vec!["Archive".to_string(), "Photos".to_string()]);
        assert_eq!(config.logging.format, LogFormat::Json);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_client_credentials() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("DOCPULSE_CLIENT_ID", "client-123");

        let err = load_from_env().unwrap_err();
        match err {
            DocPulseError::Config(msg) => assert!(msg.contains("DOCPULSE_CLIENT_SECRET")),
            other => panic!("expected config error, got {other:?}"),
        }

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("DOCPULSE_CLIENT_ID", "client-123");
        std::env::set_var("DOCPULSE_CLIENT_SECRET", "shh");
        std::env::set_var("DOCPULSE_MAX_ATTEMPTS", "lots");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, DocPulseError::Config(_)), "Should be a Config error");

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = temp_config(
            r#"{
                "provider": { "client_id": "json-client", "max_attempts": 3 },
                "fetch": { "backfill_limit": 5 },
                "ignore": { "patterns": ["Old Projects"] }
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("config from JSON file");
        assert_eq!(config.provider.client_id.as_deref(), Some("json-client"));
        assert_eq!(config.provider.max_attempts, 3);
        assert_eq!(config.fetch.backfill_limit, 5);
        assert_eq!(config.ignore.patterns, vec!["Old Projects".to_string()]);
        assert_eq!(config.classifier.stale_inactive_days, 180);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = temp_config(
            r#"
[classifier]
cleanup_inactive_days = 60
extra_sensitive_keywords = ["payslip"]

[logging]
level = "debug"
format = "json"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("config from TOML file");
        assert_eq!(config.classifier.cleanup_inactive_days, 60);
        assert_eq!(config.classifier.extra_sensitive_keywords, vec!["payslip".to_string()]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/docpulse.json")));
        assert!(matches!(result, Err(DocPulseError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = temp_config(r#"{ "fetch": { "backfill_limit": "ten" } "#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(matches!(result, Err(DocPulseError::Config(_))));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("a: b", &PathBuf::from("docpulse.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
