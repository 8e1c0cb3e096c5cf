use std::collections::BTreeSet;

/// One allow-list entry: a tag name and the attributes it may keep.
///
/// The protocol and link flags default to `true` and are set with the fluent `set_*` methods.
/// Equality and hashing are structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Element {
    name: String,
    attributes: BTreeSet<String>,
    omit_js_protocol: bool,
    omit_data_protocol: bool,
    secure_target_blank_links: bool,
}

impl Element {
    pub fn create<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            omit_js_protocol: true,
            omit_data_protocol: true,
            secure_target_blank_links: true,
        }
    }

    /// An element that keeps no attributes.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::create(name, std::iter::empty::<String>())
    }

    pub fn set_omit_js_protocol(mut self, omit: bool) -> Self {
        self.omit_js_protocol = omit;
        self
    }

    pub fn set_omit_data_protocol(mut self, omit: bool) -> Self {
        self.omit_data_protocol = omit;
        self
    }

    pub fn set_secure_target_blank_links(mut self, secure: bool) -> Self {
        self.secure_target_blank_links = secure;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }

    pub fn allows_attribute(&self, attribute: &str) -> bool {
        self.attributes.contains(attribute)
    }

    pub fn omit_js_protocol(&self) -> bool {
        self.omit_js_protocol
    }

    pub fn omit_data_protocol(&self) -> bool {
        self.omit_data_protocol
    }

    pub fn secure_target_blank_links(&self) -> bool {
        self.secure_target_blank_links
    }
}
