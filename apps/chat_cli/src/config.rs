use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::DEFAULT_ERROR_HINT;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "chat_cli.toml";

const WELCOME_TEXT: &str = "I generate tailored job applications in English based on Tarek Lein's \
experience in cybersecurity, DevOps, and AI development.
✦ Customized for Norwegian job postings
✦ Professional tone and structure
✦ Based on real experience and projects
Paste the job posting below to get started →
(end a line with \\ to continue it, /help for commands)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: Option<u64>,
    pub error_hint: String,
    pub indicator_text: String,
    pub welcome_title: String,
    pub welcome_text: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: None,
            error_hint: DEFAULT_ERROR_HINT.into(),
            indicator_text: "Generating application".into(),
            welcome_title: "Welcome to Application AI".into(),
            welcome_text: WELCOME_TEXT.into(),
            log_level: "warn".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    error_hint: Option<String>,
    indicator_text: Option<String>,
    welcome_title: Option<String>,
    welcome_text: Option<String>,
    log_level: Option<String>,
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: FileSettings = toml::from_str(raw).context("invalid settings file")?;
        if let Some(v) = file.server_url {
            self.server_url = v;
        }
        if file.request_timeout_secs.is_some() {
            self.request_timeout_secs = file.request_timeout_secs;
        }
        if let Some(v) = file.error_hint {
            self.error_hint = v;
        }
        if let Some(v) = file.indicator_text {
            self.indicator_text = v;
        }
        if let Some(v) = file.welcome_title {
            self.welcome_title = v;
        }
        if let Some(v) = file.welcome_text {
            self.welcome_text = v;
        }
        if let Some(v) = file.log_level {
            self.log_level = v;
        }
        Ok(())
    }

    /// Later keys in each pair win, so `APP__*` overrides the short names.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ["CHAT_SERVER_URL", "APP__SERVER_URL"] {
            if let Some(v) = lookup(key) {
                self.server_url = v;
            }
        }
        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.request_timeout_secs = Some(parsed);
            }
        }
        if let Some(v) = lookup("APP__ERROR_HINT") {
            self.error_hint = v;
        }
        if let Some(v) = lookup("APP__INDICATOR_TEXT") {
            self.indicator_text = v;
        }
        if let Some(v) = lookup("APP__LOG_LEVEL") {
            self.log_level = v;
        }
    }
}

/// Defaults, then the optional settings file, then the environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => settings
            .apply_file(&raw)
            .with_context(|| format!("failed to load settings from '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

pub fn normalize_server_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("server url must not be empty");
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let parsed = Url::parse(&candidate).with_context(|| format!("invalid server url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("unsupported server url scheme '{}'", parsed.scheme());
    }

    Ok(candidate)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
