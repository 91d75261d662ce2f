#[cfg(test)]
use lib::utils::{make_request, test_translate};
use lib::{TranslationError, TranslationRequest, TranslationResponse, Translator};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://ftapi.pythonanywhere.com";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FtApiConfig {
    /// 服务地址，请求发往 `{base_url}/translate`
    pub base_url: String,
    /// 请求超时（毫秒）
    pub timeout_ms: u64,
}

impl Default for FtApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug)]
pub struct FtApiTranslator {
    config: FtApiConfig,
    client: Client,
}

impl FtApiTranslator {
    pub fn new(config: Value) -> Result<Self> {
        let config: FtApiConfig = serde_json::from_value(config).map_err(|e| anyhow!(e))?;
        Self::with_config(config)
    }

    pub fn with_config(config: FtApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FtApiConfig {
        &self.config
    }

    fn build_url(&self, request: &TranslationRequest) -> Result<Url, TranslationError> {
        let endpoint = format!("{}/translate", self.config.base_url.trim_end_matches('/'));

        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("sl", request.source_language.as_str()),
                ("dl", request.destination_language.as_str()),
                ("text", request.text.as_str()),
            ],
        )
        .map_err(|e| TranslationError::MalformedRequest(format!("{}: {}", endpoint, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TranslationError::MalformedRequest(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }

        Ok(url)
    }
}

#[async_trait]
impl Translator for FtApiTranslator {
    fn name(&self) -> &str {
        "ftapi"
    }

    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, TranslationError> {
        let url = self.build_url(&request)?;

        debug!("GET {}", url);

        let resp = self.client.get(url).send().await.map_err(|e| {
            warn!("Translation request failed: {}", e);
            TranslationError::TransportFailure(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Translation service responded with {}", status);
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| TranslationError::TransportFailure(e.to_string()))?;

        if body.is_empty() {
            return Err(TranslationError::EmptyOrMissingBody);
        }

        serde_json::from_slice::<TranslationResponse>(&body).map_err(|e| {
            warn!("Could not decode translation response: {}", e);
            TranslationError::DecodeFailure(e.to_string())
        })
    }
}

#[cfg(test)]
async fn serve(router: axum::Router) -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://{}", addr))
}

#[cfg(test)]
fn translator_for(base_url: &str, timeout_ms: u64) -> Result<FtApiTranslator> {
    FtApiTranslator::new(serde_json::json!({
        "base_url": base_url,
        "timeout_ms": timeout_ms,
    }))
}

#[cfg(test)]
fn echo_router() -> axum::Router {
    use axum::extract::Query;
    use axum::routing::get;
    use axum::Json;
    use serde_json::json;
    use std::collections::HashMap;

    axum::Router::new().route(
        "/translate",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let param = |k: &str| params.get(k).cloned().unwrap_or_default();
            Json(json!({
                "source-language": param("sl"),
                "destination-language": param("dl"),
                "destination-text": format!("[{}>{}] {}", param("sl"), param("dl"), param("text")),
                "pronunciation": { "source-text-phonetic": null },
            }))
        }),
    )
}

#[test]
fn test_default_config() -> Result<()> {
    let translator = FtApiTranslator::new(serde_json::json!({}))?;

    assert_eq!(translator.config().base_url, DEFAULT_BASE_URL);
    assert_eq!(translator.config().timeout_ms, DEFAULT_TIMEOUT_MS);
    Ok(())
}

#[test]
fn test_build_url_encodes_text() -> Result<()> {
    let translator = translator_for("https://example.com/", 1000)?;
    let request = make_request("en", "ru", "fish & chips?")?;

    let url = translator.build_url(&request)?;

    assert_eq!(url.path(), "/translate");
    let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
    assert_eq!(
        pairs,
        vec![
            ("sl".to_string(), "en".to_string()),
            ("dl".to_string(), "ru".to_string()),
            ("text".to_string(), "fish & chips?".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_ftapi_translate() -> Result<()> {
    let base = serve(echo_router()).await?;
    let translator = translator_for(&base, 2000)?;

    let response = translator
        .translate(make_request("en", "es", "hello world & more?")?)
        .await?;

    assert_eq!(response.destination_text, "[en>es] hello world & more?");
    assert_eq!(response.extra["source-language"], "en");
    assert!(response.extra.contains_key("pronunciation"));
    Ok(())
}

#[tokio::test]
async fn test_ftapi_shared_helper() -> Result<()> {
    let base = serve(echo_router()).await?;

    let response = test_translate(translator_for(&base, 2000)?).await?;

    assert_eq!(response.destination_text, "[en>ru] Hello, world!");
    Ok(())
}

#[tokio::test]
async fn test_ftapi_non_success_status_is_decoded() -> Result<()> {
    use axum::http::StatusCode;
    use axum::routing::get;

    let router = axum::Router::new().route(
        "/translate",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(serde_json::json!({ "destinationText": "still here" })),
            )
        }),
    );
    let base = serve(router).await?;

    let response = translator_for(&base, 2000)?
        .translate(make_request("en", "ru", "x")?)
        .await?;

    assert_eq!(response.destination_text, "still here");
    Ok(())
}

#[tokio::test]
async fn test_ftapi_empty_body() -> Result<()> {
    use axum::routing::get;

    let router = axum::Router::new().route("/translate", get(|| async { "" }));
    let base = serve(router).await?;

    let result = translator_for(&base, 2000)?
        .translate(make_request("en", "ru", "hello")?)
        .await;

    assert_eq!(result, Err(TranslationError::EmptyOrMissingBody));
    Ok(())
}

#[tokio::test]
async fn test_ftapi_decode_failure() -> Result<()> {
    use axum::routing::get;

    let router = axum::Router::new()
        .route("/translate", get(|| async { "<html>oops</html>" }))
        .route(
            "/other/translate",
            get(|| async { axum::Json(serde_json::json!({ "text": "no translation" })) }),
        );
    let base = serve(router).await?;

    for base_url in [base.clone(), format!("{}/other", base)] {
        let result = translator_for(&base_url, 2000)?
            .translate(make_request("en", "ru", "hello")?)
            .await;

        assert!(matches!(result, Err(TranslationError::DecodeFailure(_))));
    }
    Ok(())
}

#[tokio::test]
async fn test_ftapi_malformed_request() -> Result<()> {
    for base_url in ["not a url", "mailto:someone@example.com"] {
        let result = translator_for(base_url, 2000)?
            .translate(make_request("en", "ru", "hello")?)
            .await;

        assert!(matches!(result, Err(TranslationError::MalformedRequest(_))));
    }
    Ok(())
}

#[tokio::test]
async fn test_ftapi_connection_refused() -> Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let result = translator_for(&format!("http://{}", addr), 2000)?
        .translate(make_request("en", "ru", "hello")?)
        .await;

    assert!(matches!(result, Err(TranslationError::TransportFailure(_))));
    Ok(())
}

#[tokio::test]
async fn test_ftapi_timeout() -> Result<()> {
    use axum::routing::get;

    let router = axum::Router::new().route(
        "/translate",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            axum::Json(serde_json::json!({ "destinationText": "too late" }))
        }),
    );
    let base = serve(router).await?;

    let started = std::time::Instant::now();
    let result = translator_for(&base, 100)?
        .translate(make_request("en", "ru", "hello")?)
        .await;

    assert!(matches!(result, Err(TranslationError::TransportFailure(_))));
    assert!(started.elapsed() < Duration::from_secs(5));
    Ok(())
}
