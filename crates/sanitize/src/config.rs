//! TOML allow-list configuration.
//!
//! ```toml
//! omit_comments = true
//!
//! [[element]]
//! name = "a"
//! attributes = ["href", "target", "rel"]
//! omit_js_protocol = true
//! omit_data_protocol = true
//! secure_target_blank_links = true
//! ```
//!
//! A config without any `[[element]]` table uses the built-in allow-list.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::defaults::default_allowlist;
use crate::element::Element;
use crate::error::ConfigError;
use crate::filter::AllowlistFilter;
use crate::sanitizer::HtmlSanitizer;

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SanitizerConfig {
    #[serde(default = "default_true")]
    pub omit_comments: bool,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ElementConfig {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default = "default_true")]
    pub omit_js_protocol: bool,
    #[serde(default = "default_true")]
    pub omit_data_protocol: bool,
    #[serde(default = "default_true")]
    pub secure_target_blank_links: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            omit_comments: true,
            elements: Vec::new(),
        }
    }
}

impl SanitizerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SanitizerConfig = toml::from_str(content)?;
        if let Some(index) = config.elements.iter().position(|e| e.name.trim().is_empty()) {
            return Err(ConfigError::EmptyElementName { index });
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn build_filter(&self) -> AllowlistFilter {
        if self.elements.is_empty() {
            return AllowlistFilter::with_elements(default_allowlist());
        }
        AllowlistFilter::with_elements(self.elements.iter().cloned().map(Element::from))
    }

    pub fn build_sanitizer(&self) -> HtmlSanitizer {
        HtmlSanitizer::new(self.build_filter()).omit_comments(self.omit_comments)
    }
}

impl From<ElementConfig> for Element {
    fn from(config: ElementConfig) -> Self {
        Element::create(config.name, config.attributes)
            .set_omit_js_protocol(config.omit_js_protocol)
            .set_omit_data_protocol(config.omit_data_protocol)
            .set_secure_target_blank_links(config.secure_target_blank_links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = SanitizerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SanitizerConfig::default());
        let filter = config.build_filter();
        assert_eq!(filter.len(), default_allowlist().len());
    }

    #[test]
    fn elements_and_flags_are_read() {
        let config = SanitizerConfig::from_toml_str(
            r#"
            omit_comments = false

            [[element]]
            name = "a"
            attributes = ["href", "target"]
            secure_target_blank_links = false

            [[element]]
            name = "img"
            attributes = ["src"]
            omit_data_protocol = false
            "#,
        )
        .unwrap();

        assert!(!config.omit_comments);
        let filter = config.build_filter();
        assert_eq!(filter.len(), 2);
        assert_eq!(
            filter.element("a"),
            Some(&Element::create("a", ["href", "target"]).set_secure_target_blank_links(false))
        );
        let img = filter.element("img").unwrap();
        assert!(img.omit_js_protocol());
        assert!(!img.omit_data_protocol());
    }

    #[test]
    fn later_duplicate_element_wins() {
        let config = SanitizerConfig::from_toml_str(
            r#"
            [[element]]
            name = "a"
            attributes = ["href"]

            [[element]]
            name = "a"
            attributes = ["title"]
            "#,
        )
        .unwrap();
        let filter = config.build_filter();
        let a = filter.element("a").unwrap();
        assert!(a.allows_attribute("title"));
        assert!(!a.allows_attribute("href"));
    }

    #[test]
    fn empty_element_name_is_rejected() {
        let err = SanitizerConfig::from_toml_str("[[element]]\nname = \" \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyElementName { index: 0 }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SanitizerConfig::from_toml_str("strip_everything = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SanitizerConfig::load(Path::new("/nonexistent/allowlist.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/allowlist.toml"));
    }
}
