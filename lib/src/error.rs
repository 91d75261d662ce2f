use thiserror::Error;

/// 翻译调用的错误集合
///
/// `Display` 即展示给用户的提示文本。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Could not build translation request: {0}")]
    MalformedRequest(String),

    #[error("Network request failed: {0}")]
    TransportFailure(String),

    #[error("Translation service returned no data")]
    EmptyOrMissingBody,

    #[error("Could not read translation service response: {0}")]
    DecodeFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        let err = TranslationError::TransportFailure("connection refused".to_string());
        assert_eq!(err.to_string(), "Network request failed: connection refused");

        let err = TranslationError::EmptyOrMissingBody;
        assert_eq!(err.to_string(), "Translation service returned no data");
    }
}
