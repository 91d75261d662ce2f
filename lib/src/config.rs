use crate::debounce::DEFAULT_DELAY;
use crate::LanguageCode;
use anyhow::{anyhow, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct SessionConfig {
    /// 防抖间隔（毫秒）
    pub debounce_ms: u64,
    /// 初始源语言
    pub source_language: LanguageCode,
    /// 初始目标语言
    pub target_language: LanguageCode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DELAY.as_millis() as u64,
            source_language: LanguageCode("en".to_string()),
            target_language: LanguageCode("ru".to_string()),
        }
    }
}

impl SessionConfig {
    pub fn from_value(config: Value) -> Result<Self> {
        serde_json::from_value(config).map_err(|e| anyhow!(e))
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() -> Result<()> {
        let config = SessionConfig::from_value(json!({}))?;

        assert_eq!(config.debounce_delay(), Duration::from_millis(300));
        assert_eq!(config.source_language.as_str(), "en");
        assert_eq!(config.target_language.as_str(), "ru");
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Result<()> {
        let config = SessionConfig::from_value(json!({
            "debounce_ms": 50,
            "target_language": "es",
        }))?;

        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.source_language.as_str(), "en");
        assert_eq!(config.target_language.as_str(), "es");
        Ok(())
    }

    #[test]
    fn test_builder() -> Result<()> {
        let config = SessionConfigBuilder::default()
            .debounce_ms(10u64)
            .build()?;

        assert_eq!(config.debounce_delay(), Duration::from_millis(10));
        assert_eq!(config.target_language.as_str(), "ru");
        Ok(())
    }

    #[test]
    fn test_empty_language_rejected() {
        assert!(SessionConfig::from_value(json!({ "source_language": "" })).is_err());
    }
}
