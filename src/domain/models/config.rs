//! Runtime configuration model.

use serde::{Deserialize, Serialize};

/// Main configuration structure for issuesync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Remote tracker API configuration.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Controller loop configuration.
    #[serde(default)]
    pub controller: ControllerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Admission logger configuration.
    #[serde(default)]
    pub admission: AdmissionConfig,
}

/// Remote tracker API and credential-source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Base URL of the tracker REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// User agent sent on every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Directory holding mounted secrets. When set, the bearer token is
    /// read from `{secret_dir}/{secret_name}/{secret_key}`; otherwise it
    /// comes from the `token_env` environment variable.
    #[serde(default)]
    pub secret_dir: Option<String>,

    /// Name of the secret holding the tracker token.
    #[serde(default = "default_secret_name")]
    pub secret_name: String,

    /// Key within the secret holding the token.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Environment variable consulted when no secret directory is set.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "issuesync".to_string()
}

fn default_secret_name() -> String {
    "github-token".to_string()
}

fn default_secret_key() -> String {
    "token".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            user_agent: default_user_agent(),
            secret_dir: None,
            secret_name: default_secret_name(),
            secret_key: default_secret_key(),
            token_env: default_token_env(),
        }
    }
}

/// Controller loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ControllerConfig {
    /// Seconds between reconcile passes over the store. Drift introduced
    /// upstream (e.g. an issue closed by hand) is detected on this cadence.
    #[serde(default = "default_requeue_after_secs")]
    pub requeue_after_secs: u64,
}

const fn default_requeue_after_secs() -> u64 {
    60
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            requeue_after_secs: default_requeue_after_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Admission logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdmissionConfig {
    /// Path the namespace admission logger appends JSON lines to.
    #[serde(default = "default_admission_log_path")]
    pub log_path: String,
}

fn default_admission_log_path() -> String {
    ".issuesync/admission.log".to_string()
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            log_path: default_admission_log_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.github.secret_name, "github-token");
        assert_eq!(config.github.secret_key, "token");
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.controller.requeue_after_secs, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("controller:\n  requeue_after_secs: 5\n").unwrap();
        assert_eq!(config.controller.requeue_after_secs, 5);
        assert_eq!(config.github.api_base, "https://api.github.com");
    }
}
