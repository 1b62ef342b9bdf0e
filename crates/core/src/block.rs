//! Block kinds and block-level validation.
//!
//! A block's kind is stored as a free-form TEXT tag. The known kinds are
//! modeled as enum variants, but the set is open: tags we do not recognize
//! deserialize to [`BlockKind::Unknown`] and round-trip losslessly, so a
//! newer editor can introduce kinds without breaking older services.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Type tag of a content block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Hero,
    Features,
    Testimonial,
    Pricing,
    Contact,
    Text,
    Image,
    Video,
    Button,
    Form,
    Custom,
    /// A tag this build does not recognize. The original tag is preserved.
    Unknown(String),
}

/// All tags this build recognizes, in no particular order.
pub const KNOWN_KINDS: &[&str] = &[
    "hero",
    "features",
    "testimonial",
    "pricing",
    "contact",
    "text",
    "image",
    "video",
    "button",
    "form",
    "custom",
];

impl BlockKind {
    /// The stored tag for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hero => "hero",
            Self::Features => "features",
            Self::Testimonial => "testimonial",
            Self::Pricing => "pricing",
            Self::Contact => "contact",
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Button => "button",
            Self::Form => "form",
            Self::Custom => "custom",
            Self::Unknown(tag) => tag,
        }
    }

    /// Map a stored tag to a kind. Never fails; unrecognized tags become
    /// [`BlockKind::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "hero" => Self::Hero,
            "features" => Self::Features,
            "testimonial" => Self::Testimonial,
            "pricing" => Self::Pricing,
            "contact" => Self::Contact,
            "text" => Self::Text,
            "image" => Self::Image,
            "video" => Self::Video,
            "button" => Self::Button,
            "form" => Self::Form,
            "custom" => Self::Custom,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Whether this build recognizes the kind.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BlockKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/* --------------------------------------------------------------------------
   Validation
   -------------------------------------------------------------------------- */

/// Validate a stored block tag: non-empty and of sane length.
///
/// Unknown tags are accepted (forward compatibility); this only rejects
/// tags that could not possibly be valid.
pub fn validate_tag(tag: &str) -> Result<(), CoreError> {
    if tag.trim().is_empty() {
        return Err(CoreError::Validation(
            "Block type must not be empty".to_string(),
        ));
    }
    if tag.len() > 64 {
        return Err(CoreError::Validation(format!(
            "Block type too long: {} chars (max 64)",
            tag.len()
        )));
    }
    Ok(())
}

/// Validate a block data payload: must be a JSON object.
///
/// The payload shape is otherwise opaque to the server; per-kind field
/// checks happen in the render registry, which degrades gracefully.
pub fn validate_data(data: &serde_json::Value) -> Result<(), CoreError> {
    if !data.is_object() {
        return Err(CoreError::Validation(
            "Block data must be a JSON object".to_string(),
        ));
    }
    Ok(())
}

/// Validate optional style overrides: if present, must be a JSON object.
pub fn validate_styles(styles: Option<&serde_json::Value>) -> Result<(), CoreError> {
    if let Some(s) = styles {
        if !s.is_object() {
            return Err(CoreError::Validation(
                "Block styles must be a JSON object".to_string(),
            ));
        }
    }
    Ok(())
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */
