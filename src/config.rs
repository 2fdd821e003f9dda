use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub sites: HashMap<String, SiteConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

/// Per-site overrides, keyed by source key in `[sites.<key>]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    pub base_url: Option<String>,
    /// Secondary API host for sources that split pages and AJAX endpoints.
    pub api_url: Option<String>,
    pub user_agent: Option<String>,
    pub headers: Option<HashMap<String, String>>,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_preferences_path() -> String {
    "preferences.toml".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

impl Config {
    /// Layers the optional TOML file at `path` with `SOURCEKIT__*` variables,
    /// e.g. `SOURCEKIT__HTTP__TIMEOUT_SECS=60`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("SOURCEKIT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn get_site_config(&self, site_name: &str) -> SiteConfig {
        self.sites.get(site_name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load("/nonexistent/sourcekit.toml").unwrap();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.preferences.path, "preferences.toml");
        assert!(config.get_site_config("gogoanime").base_url.is_none());
    }

    #[test]
    fn site_overrides_are_read_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[http]
timeout_secs = 5

[sites.gogoanime]
base_url = "https://mirror.example"

[sites.gogoanime.headers]
referer = "https://mirror.example/"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        let site = config.get_site_config("gogoanime");
        assert_eq!(site.base_url.as_deref(), Some("https://mirror.example"));
        assert_eq!(
            site.headers.unwrap().get("referer").map(String::as_str),
            Some("https://mirror.example/")
        );
    }
}
