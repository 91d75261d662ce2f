use crate::LanguageCode;
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::Path;

const BUNDLED: &str = include_str!("../languages.json");

/// 语言代码到显示名称的映射，由外部数据文件提供
#[derive(Debug, Clone, Default)]
pub struct LanguageCatalog {
    names: HashMap<String, String>,
}

impl LanguageCatalog {
    /// 随 crate 一起发布的 languages.json
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let names: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| anyhow!("Invalid language list: {}", e))?;

        if names.keys().any(|code| code.is_empty()) {
            return Err(anyhow!("Invalid language list: empty language code"));
        }

        Ok(Self { names })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read language list {}", path.display()))?;

        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.lookup(code).is_some()
    }

    /// 显示名称，找不到时退回到大写的语言代码
    pub fn display_name(&self, code: &LanguageCode) -> String {
        self.lookup(code)
            .map(capitalize)
            .unwrap_or_else(|| code.as_str().to_uppercase())
    }

    /// 按名称排序的 (代码, 名称) 列表，供语言选择器使用
    pub fn sorted(&self) -> Vec<(LanguageCode, String)> {
        let mut list = self
            .names
            .iter()
            .filter_map(|(code, name)| {
                LanguageCode::new(code.as_str())
                    .ok()
                    .map(|code| (code, capitalize(name)))
            })
            .collect::<Vec<_>>();

        list.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        list
    }

    fn lookup(&self, code: &LanguageCode) -> Option<&str> {
        if let Some(name) = self.names.get(code.as_str()) {
            return Some(name.as_str());
        }

        // en-US -> en
        let tag = code.tag()?;
        self.names
            .get(tag.primary_language())
            .or_else(|| self.names.get(&tag.primary_language().to_ascii_lowercase()))
            .map(|s| s.as_str())
    }
}

/// 每个单词首字母大写，其余小写
fn capitalize(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> LanguageCode {
        LanguageCode::new(s).unwrap()
    }

    #[test]
    fn test_bundled_catalog() -> Result<()> {
        let catalog = LanguageCatalog::bundled()?;

        assert!(!catalog.is_empty());
        assert!(catalog.contains(&code("en")));
        assert!(catalog.contains(&code("ru")));
        Ok(())
    }

    #[test]
    fn test_display_name_fallbacks() -> Result<()> {
        let catalog = LanguageCatalog::from_json_str(r#"{ "en": "english", "ru": "russian" }"#)?;

        assert_eq!(catalog.display_name(&code("en")), "English");
        assert_eq!(catalog.display_name(&code("en-US")), "English");
        assert_eq!(catalog.display_name(&code("eo")), "EO");
        Ok(())
    }

    #[test]
    fn test_multi_word_names_are_capitalized() -> Result<()> {
        let catalog = LanguageCatalog::from_json_str(
            r#"{ "ht": "haitian creole", "sr": "SERBIAN  latin" }"#,
        )?;

        assert_eq!(catalog.display_name(&code("ht")), "Haitian Creole");
        assert_eq!(catalog.display_name(&code("sr")), "Serbian Latin");
        assert_eq!(
            catalog.sorted(),
            vec![
                (code("ht"), "Haitian Creole".to_string()),
                (code("sr"), "Serbian Latin".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_sorted_by_name() -> Result<()> {
        let catalog = LanguageCatalog::from_json_str(
            r#"{ "ru": "russian", "de": "german", "en": "english" }"#,
        )?;

        let codes = catalog
            .sorted()
            .into_iter()
            .map(|(code, _)| code.to_string())
            .collect::<Vec<_>>();

        assert_eq!(codes, vec!["en", "de", "ru"]);
        Ok(())
    }

    #[test]
    fn test_invalid_catalog() {
        assert!(LanguageCatalog::from_json_str("[1, 2]").is_err());
        assert!(LanguageCatalog::from_json_str(r#"{ "": "nothing" }"#).is_err());
        assert!(LanguageCatalog::from_path("/definitely/not/here.json").is_err());
    }
}
