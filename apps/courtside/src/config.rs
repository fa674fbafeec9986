use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shared::domain::UserKey;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "courtside.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub user_id: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".into(),
            user_id: "demo-user".into(),
            poll_interval_secs: 30,
            request_timeout_secs: 10,
            log_filter: "info".into(),
        }
    }
}

impl ClientSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn user(&self) -> UserKey {
        UserKey::new(self.user_id.clone())
    }

    fn apply_file(&mut self, raw: &str) -> Result<()> {
        let file: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.user_id {
            self.user_id = v;
        }
        if let Some(v) = file.poll_interval_secs {
            self.poll_interval_secs = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.log_filter {
            self.log_filter = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = var("COURTSIDE_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = var("APP__API_BASE_URL") {
            self.api_base_url = v;
        }

        if let Some(v) = var("COURTSIDE_USER_ID") {
            self.user_id = v;
        }

        if let Some(v) = var("COURTSIDE_POLL_SECS") {
            self.poll_interval_secs = parse_secs("COURTSIDE_POLL_SECS", &v)?;
        }
        if let Some(v) = var("COURTSIDE_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_secs("COURTSIDE_TIMEOUT_SECS", &v)?;
        }

        if let Some(v) = var("COURTSIDE_LOG") {
            self.log_filter = v;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("api base url '{}' is not a valid url", self.api_base_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            bail!("api base url '{}' must use http or https", self.api_base_url);
        }
        if self.user_id.trim().is_empty() {
            bail!("user id must not be empty");
        }
        if self.poll_interval_secs == 0 {
            bail!("poll interval must be at least one second");
        }
        if self.request_timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_base_url: Option<String>,
    user_id: Option<String>,
    poll_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub api_base_url: Option<String>,
    pub user_id: Option<String>,
}

/// Defaults, then the config file, then the environment, then the command
/// line. A missing default config file is fine; a missing explicit one is not.
pub fn load_settings(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<ClientSettings> {
    resolve_settings(config_path, overrides, |key| std::env::var(key).ok())
}

fn resolve_settings(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    var: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => settings
            .apply_file(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && config_path.is_none() => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    settings.apply_env(var)?;

    if let Some(v) = &overrides.api_base_url {
        settings.api_base_url = v.clone();
    }
    if let Some(v) = &overrides.user_id {
        settings.user_id = v.clone();
    }

    settings.validate()?;
    Ok(settings)
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'"))
}
