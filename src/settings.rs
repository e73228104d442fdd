use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

/// Process-wide settings, read once at start from an optional `summarizer.*`
/// file and `SUMMARIZER_*` environment variables.
#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub system_instruction: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default = "default_fallback_summary")]
    pub fallback_summary: String,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_fallback_summary() -> String {
    "Dummy Summary".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("summary.docx")
}

fn default_timeout_secs() -> u64 {
    60
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn from_config(config: Config) -> Result<Self> {
        config
            .try_deserialize()
            .context("Invalid summarizer configuration")
    }
}

// Keeps the key out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("system_instruction", &self.system_instruction)
            .field("context", &self.context)
            .field("fallback_summary", &self.fallback_summary)
            .field("output_path", &self.output_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

pub fn load() -> Result<Settings> {
    let config = Config::builder()
        .add_source(config::File::with_name("summarizer").required(false))
        .add_source(config::Environment::with_prefix("SUMMARIZER"))
        .build()
        .context("Failed to read summarizer configuration")?;
    Settings::from_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_configured() {
        let s = Settings::from_config(Config::builder().build().unwrap()).unwrap();
        assert_eq!(s.api_key, None);
        assert_eq!(s.endpoint, "https://api.openai.com/v1/chat/completions");
        assert_eq!(s.model, "gpt-3.5-turbo");
        assert_eq!(s.system_instruction, None);
        assert_eq!(s.context, None);
        assert_eq!(s.fallback_summary, "Dummy Summary");
        assert_eq!(s.output_path, PathBuf::from("summary.docx"));
        assert_eq!(s.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn overrides_apply() {
        let config = Config::builder()
            .set_override("api_key", "sk-live")
            .unwrap()
            .set_override("timeout_secs", "5")
            .unwrap()
            .set_override("fallback_summary", "No summary available")
            .unwrap()
            .build()
            .unwrap();
        let s = Settings::from_config(config).unwrap();
        assert_eq!(s.api_key.as_deref(), Some("sk-live"));
        assert_eq!(s.timeout(), Duration::from_secs(5));
        assert_eq!(s.fallback_summary, "No summary available");
    }

    #[test]
    fn debug_redacts_key() {
        let config = Config::builder()
            .set_override("api_key", "sk-secret")
            .unwrap()
            .build()
            .unwrap();
        let s = Settings::from_config(config).unwrap();
        let shown = format!("{:?}", s);
        assert!(!shown.contains("sk-secret"));
        assert!(shown.contains("<redacted>"));
    }
}
