//! Widget Configuration
//!
//! Defaults reproduce the deployed widget; any field can be overridden from JSON
//! or passed to `DeadlinesBlock` directly.

use std::time::Duration;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeadlinesConfig {
    /// Where the deadlines document is fetched from
    pub source_url: String,
    /// Refresh period, polls land on wall-clock multiples of it
    pub poll_period_secs: u64,
    /// `details` text of generated calendar events
    pub calendar_description: String,
    pub heading: String,
    pub loading_text: String,
    pub empty_text: String,
    /// Shown in place of the time when a record has none
    pub missing_time_text: String,
    pub submit_link: String,
    pub submit_label: String,
}

impl Default for DeadlinesConfig {
    fn default() -> Self {
        Self {
            source_url: "/DEADLINES.json".to_string(),
            poll_period_secs: 60,
            calendar_description: "Дедлайн добавлен с сайта m3202.nawinds.dev".to_string(),
            heading: "Дедлайны".to_string(),
            loading_text: "Загрузка дедлайнов...".to_string(),
            empty_text: "Нет предстоящих дедлайнов.".to_string(),
            missing_time_text: "не указано".to_string(),
            submit_link: "/deadlines-editing-instructions".to_string(),
            submit_label: "Добавить дедлайн".to_string(),
        }
    }
}

impl DeadlinesConfig {
    /// Poll period, never shorter than one second
    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_period_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(text: &str) -> Result<DeadlinesConfig, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = from_json(r#"{"source_url":"/other.json"}"#).unwrap();
        assert_eq!(config.source_url, "/other.json");
        assert_eq!(config.poll_period(), Duration::from_secs(60));
        assert_eq!(config.submit_link, "/deadlines-editing-instructions");
    }

    #[test]
    fn test_zero_period_clamped() {
        let config = DeadlinesConfig { poll_period_secs: 0, ..Default::default() };
        assert_eq!(config.poll_period(), Duration::from_secs(1));
    }

    #[test]
    fn test_bad_config_reports_error() {
        assert!(from_json(r#"{"poll_period_secs":"soon"}"#).is_err());
    }
}
