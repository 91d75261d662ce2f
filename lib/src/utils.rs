use crate::{LanguageCode, TranslationRequest, TranslationResponse, Translator};
use anyhow::{anyhow, Result};
use tracing::debug;

pub fn make_request(source: &str, destination: &str, text: &str) -> Result<TranslationRequest> {
    Ok(TranslationRequest {
        source_language: LanguageCode::new(source)?,
        destination_language: LanguageCode::new(destination)?,
        text: text.to_string(),
    })
}

/// 插件测试共用：翻译一段固定文本
pub async fn test_translate<T: Translator>(translator: T) -> Result<TranslationResponse> {
    let request = make_request("en", "ru", "Hello, world!")?;

    let response = translator
        .translate(request)
        .await
        .map_err(|e| anyhow!("{} failed: {}", translator.name(), e))?;

    debug!("{} -> {:?}", translator.name(), response);

    Ok(response)
}

#[test]
fn test_make_request() -> Result<()> {
    let request = make_request("en", "ru", " spaced ")?;

    assert_eq!(request.source_language.as_str(), "en");
    assert_eq!(request.destination_language.as_str(), "ru");
    assert_eq!(request.text, " spaced ");
    assert!(make_request("", "ru", "x").is_err());

    Ok(())
}

#[cfg(test)]
struct EchoTranslator;

#[cfg(test)]
#[async_trait::async_trait]
impl Translator for EchoTranslator {
    fn name(&self) -> &str {
        "echo"
    }

    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, crate::TranslationError> {
        Ok(TranslationResponse::new(format!(
            "{}>{}: {}",
            request.source_language, request.destination_language, request.text
        )))
    }
}

#[tokio::test]
async fn test_translate_helper_returns_response() -> Result<()> {
    let response = test_translate(EchoTranslator).await?;

    assert_eq!(response.destination_text, "en>ru: Hello, world!");
    Ok(())
}
