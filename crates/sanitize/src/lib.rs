//! Allow-list HTML sanitization.
//!
//! [`AllowlistFilter`] prunes a parsed [`html::Node`] tree down to registered elements and
//! attributes, blanks `javascript:` / `data:` URLs, and hardens `target="_blank"` links.
//! [`HtmlSanitizer`] wraps parsing, filtering, and serialization for callers holding HTML text.

mod config;
mod defaults;
mod element;
mod error;
mod filter;
mod normalizer;
mod sanitizer;

pub use crate::config::{ElementConfig, SanitizerConfig};
pub use crate::defaults::default_allowlist;
pub use crate::element::Element;
pub use crate::error::{ConfigError, FilterError, NormalizationError};
pub use crate::filter::{AllowlistFilter, WhitelistFilter};
pub use crate::normalizer::{CharacterReferenceNormalizer, ValueNormalizer};
pub use crate::sanitizer::HtmlSanitizer;
