//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. notify-router.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the router listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL of this deployment.
    /// OAuth redirect URIs are derived from it.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

/// LINE Notify provider application credentials.
///
/// Both fields are optional: a missing value is a configuration gap the
/// authorization flow reports as HTTP 501, not a startup failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineNotifyConfig {
    /// OAuth client id of the registered LINE Notify application
    pub client_id: Option<String>,

    /// OAuth client secret of the registered LINE Notify application
    pub client_secret: Option<String>,
}

/// Main configuration for the notification router
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE Notify channel configuration
    #[serde(default)]
    pub line_notify: LineNotifyConfig,
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(c);
                    chars.next();
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// # 環境変数展開
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換されます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let expanded_content = Self::expand_env_vars(&toml_content);

        let mut config: Config = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        // Explicitly set environment variables win over the file
        config.apply_env_overrides();

        Ok(config)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// 1. `./notify-router.toml`
    /// 2. 見つからない場合は環境変数のみ
    pub fn load() -> crate::Result<Self> {
        if Path::new("notify-router.toml").exists() {
            return Self::from_toml_file("notify-router.toml");
        }

        Ok(Self::from_env())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("SERVER_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(url) = std::env::var("PUBLIC_URL") {
            if !url.is_empty() {
                self.server.public_url = url;
            }
        }
        if let Ok(id) = std::env::var("LINE_NOTIFY_CLIENT_ID") {
            if !id.is_empty() {
                self.line_notify.client_id = Some(id);
            }
        }
        if let Ok(secret) = std::env::var("LINE_NOTIFY_CLIENT_SECRET") {
            if !secret.is_empty() {
                self.line_notify.client_secret = Some(secret);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_url, "http://localhost:8080");
    }

    #[test]
    fn test_line_notify_config_default() {
        let config = LineNotifyConfig::default();
        assert!(config.client_id.is_none());
        assert!(config.client_secret.is_none());
    }

    #[test]
    fn test_expand_env_vars() {
        // テスト用環境変数を設定
        unsafe {
            std::env::set_var("NR_TEST_VAR", "test_value");
        }

        let result = Config::expand_env_vars("prefix_${NR_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_test_value_suffix");

        // 存在しない環境変数
        let result = Config::expand_env_vars("prefix_${NR_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix__suffix");

        unsafe {
            std::env::remove_var("NR_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_no_braces() {
        let result = Config::expand_env_vars("no_vars_here");
        assert_eq!(result, "no_vars_here");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[server]
port = 9000
public_url = "https://notify.example.com"

[line_notify]
client_id = "line_client_id"
client_secret = "line_client_secret"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.public_url, "https://notify.example.com");
        assert_eq!(config.line_notify.client_id.as_deref(), Some("line_client_id"));
        assert_eq!(
            config.line_notify.client_secret.as_deref(),
            Some("line_client_secret")
        );
    }

    #[test]
    fn test_toml_config_partial() {
        // Missing sections fall back to defaults
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.line_notify.client_id.is_none());
    }
}
