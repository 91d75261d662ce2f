#![allow(unused_imports, unused_variables)]
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
pub use lib::*;

use lib::config::SessionConfig;
use lib::language::LanguageCatalog;
use lib::session::{Session, SessionObserver};

pub fn create_translator(name: &str, config: Value) -> Result<Arc<dyn Translator>> {
    match name {
        #[cfg(feature = "plugin-ftapi")]
        "ftapi" => {
            use plugin_ftapi::translator::FtApiTranslator;
            let trans = FtApiTranslator::new(config)?;
            Ok(Arc::new(trans))
        }
        _ => bail!("Translator not found: {}", name),
    }
}

pub async fn translate(
    name: &str,
    config: Value,
    request: TranslationRequest,
) -> Result<TranslationResponse> {
    let trans = create_translator(name, config)?;
    trans.translate(request).await.map_err(|e| anyhow!(e))
}

/// 应用配置文件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 翻译器名称
    pub translator: String,
    /// 交给翻译器的配置
    pub translator_config: Value,
    pub session: SessionConfig,
    /// 语言列表文件，缺省时使用内置列表
    pub languages: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            translator: "ftapi".to_string(),
            translator_config: json!({}),
            session: SessionConfig::default(),
            languages: None,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| anyhow!("Invalid config: {}", e))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        Self::from_json_str(&json)
    }
}

pub fn build_session(config: &AppConfig, observer: Box<dyn SessionObserver>) -> Result<Session> {
    let translator = create_translator(&config.translator, config.translator_config.clone())?;

    info!(
        "Using translator {} ({} -> {})",
        translator.name(),
        config.session.source_language,
        config.session.target_language
    );

    Ok(Session::new(translator, &config.session, observer))
}

pub fn load_catalog(config: &AppConfig) -> Result<LanguageCatalog> {
    match &config.languages {
        Some(path) => LanguageCatalog::from_path(path),
        None => LanguageCatalog::bundled(),
    }
}
