//! Widget configuration from the environment

use crate::attachment::DEFAULT_MAX_ATTACHMENT_BYTES;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://backend-api-nambi.onrender.com";
pub const DEFAULT_TITLE: &str = "Nambi";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Chat answering service base URL; `/api/chat` is appended
    pub base_url: String,
    /// Header title
    pub title: String,
    /// No timeout when unset
    pub request_timeout: Option<Duration>,
    /// `None` disables the attachment size bound
    pub max_attachment_bytes: Option<u64>,
    pub log_path: PathBuf,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            title: DEFAULT_TITLE.to_string(),
            request_timeout: None,
            max_attachment_bytes: Some(DEFAULT_MAX_ATTACHMENT_BYTES),
            log_path: default_log_path(None),
        }
    }
}

impl WidgetConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparseable numbers fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let request_timeout = lookup("CHAT_WIDGET_TIMEOUT_SECS")
            .and_then(|raw| parse_or_warn::<u64>("CHAT_WIDGET_TIMEOUT_SECS", &raw))
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let max_attachment_bytes = match lookup("CHAT_WIDGET_MAX_ATTACHMENT_BYTES") {
            Some(raw) => match parse_or_warn::<u64>("CHAT_WIDGET_MAX_ATTACHMENT_BYTES", &raw) {
                Some(0) => None,
                Some(limit) => Some(limit),
                None => defaults.max_attachment_bytes,
            },
            None => defaults.max_attachment_bytes,
        };

        let log_path = lookup("CHAT_WIDGET_LOG_PATH")
            .map_or_else(|| default_log_path(lookup("HOME")), PathBuf::from);

        Self {
            base_url: lookup("CHAT_WIDGET_BASE_URL").unwrap_or(defaults.base_url),
            title: lookup("CHAT_WIDGET_TITLE").unwrap_or(defaults.title),
            request_timeout,
            max_attachment_bytes,
            log_path,
        }
    }
}

fn default_log_path(home: Option<String>) -> PathBuf {
    let home = home.unwrap_or_else(|| "/tmp".to_string());
    PathBuf::from(format!("{home}/.chat-widget/widget.log"))
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
    }
    parsed
}
