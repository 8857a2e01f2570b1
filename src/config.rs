use std::time::Duration;

use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Origin the `/activities` endpoints are resolved against.
    pub base_url: Url,
    /// How long a signup status message stays visible.
    pub message_timeout: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url"),
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
        }
    }
}
