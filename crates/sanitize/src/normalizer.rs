use crate::error::NormalizationError;

/// Decodes an attribute value before it is screened for unsafe URL schemes.
///
/// Implementations must be `Send + Sync` so a built filter can be shared between threads.
pub trait ValueNormalizer: Send + Sync {
    fn normalize(&self, value: &str) -> Result<String, NormalizationError>;
}

/// Default normalizer: strict character reference decoding.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharacterReferenceNormalizer;

impl ValueNormalizer for CharacterReferenceNormalizer {
    fn normalize(&self, value: &str) -> Result<String, NormalizationError> {
        Ok(html::normalize_character_references(value)?)
    }
}
