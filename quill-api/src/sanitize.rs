//! Sanitization policies - which payload fields may carry HTML, and which tags.
//!
//! A policy is consumed by the host's output renderer. It serializes to the
//! shape hosts expect: `false` for a trusted field, otherwise a map of allowed
//! tag names to `true` or to a map of allowed attributes.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Rule for one allowed tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRule {
    /// Tag allowed, all attributes stripped.
    Bare,
    /// Tag allowed with the listed attributes.
    Attributes(Vec<String>),
}

/// Policy for one payload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Plain scalar, passed through without HTML sanitization.
    Trusted,
    /// Rich text, filtered down to the allowed tags.
    Allow(IndexMap<String, TagRule>),
}

impl FieldPolicy {
    /// Inline rich text: basic emphasis, paragraphs, line breaks and links.
    pub fn rich_text() -> Self {
        let mut tags = IndexMap::new();
        tags.insert("b".to_string(), TagRule::Bare);
        tags.insert("a".to_string(), TagRule::Attributes(vec!["href".to_string()]));
        for tag in ["i", "br", "strong", "em", "p"] {
            tags.insert(tag.to_string(), TagRule::Bare);
        }
        FieldPolicy::Allow(tags)
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        match self {
            FieldPolicy::Trusted => true,
            FieldPolicy::Allow(tags) => tags.contains_key(tag),
        }
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        match self {
            FieldPolicy::Trusted => true,
            FieldPolicy::Allow(tags) => match tags.get(tag) {
                Some(TagRule::Attributes(attrs)) => attrs.iter().any(|a| a == attribute),
                _ => false,
            },
        }
    }
}

/// Per-field sanitization policy of a block type. Field order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizePolicy {
    fields: IndexMap<String, FieldPolicy>,
}

impl SanitizePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, policy: FieldPolicy) -> Self {
        self.fields.insert(name.into(), policy);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldPolicy> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldPolicy)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for TagRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TagRule::Bare => serializer.serialize_bool(true),
            TagRule::Attributes(attrs) => {
                let mut map = serializer.serialize_map(Some(attrs.len()))?;
                for attr in attrs {
                    map.serialize_entry(attr, &true)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for FieldPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldPolicy::Trusted => serializer.serialize_bool(false),
            FieldPolicy::Allow(tags) => tags.serialize(serializer),
        }
    }
}

impl Serialize for SanitizePolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
