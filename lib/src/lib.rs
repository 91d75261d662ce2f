pub mod config;
pub mod debounce;
pub mod error;
pub mod language;
pub mod session;
pub mod utils;

use async_trait::async_trait;
use derive_builder::Builder;
use language_tags::LanguageTag;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

pub use error::TranslationError;

/// 语言代码，如 "en"、"ru"
///
/// 只要求非空，未知代码原样交给远端服务判断。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> anyhow::Result<Self> {
        let code = code.into();
        if code.is_empty() {
            anyhow::bail!("Language code must not be empty");
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 按 BCP 47 解析，不合法时返回 None
    pub fn tag(&self) -> Option<LanguageTag> {
        self.0.parse().ok()
    }
}

impl Display for LanguageCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = anyhow::Error;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl TryFrom<&str> for LanguageCode {
    type Error = anyhow::Error;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// 语言选择器的槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageSlot {
    Source,
    Destination,
}

#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct TranslationRequest {
    /// 源语言
    pub source_language: LanguageCode,
    /// 目标语言
    pub destination_language: LanguageCode,
    /// 原文，保持调度时的原样，不做 trim
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// 译文
    #[serde(rename = "destinationText", alias = "destination-text")]
    pub destination_text: String,
    /// 服务端返回的其余字段，原样透传
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranslationResponse {
    pub fn new(destination_text: impl Into<String>) -> Self {
        Self {
            destination_text: destination_text.into(),
            extra: Map::new(),
        }
    }
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// 翻译器名称
    fn name(&self) -> &str;

    /// 翻译，每次调用恰好发出一次请求
    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, TranslationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn test_language_code_rejects_empty() {
        assert!(LanguageCode::new("").is_err());
        assert!(serde_json::from_value::<LanguageCode>(json!("")).is_err());
    }

    #[test]
    fn test_language_code_passes_unknown_codes_through() -> Result<()> {
        let code = LanguageCode::new("xx-not-a-language-at-all")?;
        assert_eq!(code.as_str(), "xx-not-a-language-at-all");
        Ok(())
    }

    #[test]
    fn test_language_code_tag() -> Result<()> {
        let tag = LanguageCode::new("en-US")?.tag().unwrap();
        assert_eq!(tag.primary_language(), "en");
        Ok(())
    }

    #[test]
    fn test_request_builder_keeps_text_untrimmed() -> Result<()> {
        let request = TranslationRequestBuilder::default()
            .source_language(LanguageCode::new("en")?)
            .destination_language(LanguageCode::new("es")?)
            .text("  hello ")
            .build()?;

        assert_eq!(request.text, "  hello ");
        Ok(())
    }

    #[test]
    fn test_response_passes_extra_fields_through() -> Result<()> {
        let response: TranslationResponse = serde_json::from_value(json!({
            "destination-text": "привет",
            "pronunciation": { "source-text-phonetic": "həˈloʊ" },
            "translations": { "all-translations": [] }
        }))?;

        assert_eq!(response.destination_text, "привет");
        assert!(response.extra.contains_key("pronunciation"));
        assert!(response.extra.contains_key("translations"));
        Ok(())
    }

    #[test]
    fn test_response_requires_destination_text() {
        let result = serde_json::from_value::<TranslationResponse>(json!({ "text": "hi" }));
        assert!(result.is_err());
    }
}
