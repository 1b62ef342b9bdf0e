//! Page status/template enums and page-level validation rules.
//!
//! Pages are CMS documents composed of ordered blocks. Status controls
//! public visibility; the template is a layout hint only and has no effect
//! on the block model.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Validation limits
   -------------------------------------------------------------------------- */

/// Maximum length for a page slug.
pub const MAX_SLUG_LEN: usize = 120;

/// Maximum length for a page title.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length for description and meta text fields.
pub const MAX_META_LEN: usize = 1000;

/* --------------------------------------------------------------------------
   Status
   -------------------------------------------------------------------------- */

/// Publication status of a page. Stored as TEXT.
///
/// Only `published` pages are publicly renderable. `archived` pages are
/// excluded from slug uniqueness so a slug can be reused after archival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Draft,
    Published,
    Archived,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    /// Parse a stored status string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(CoreError::Validation(format!(
                "Invalid page status '{other}'. Must be one of: draft, published, archived"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
   Template
   -------------------------------------------------------------------------- */

/// Layout hint for a page. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTemplate {
    Default,
    Landing,
    FullWidth,
}

impl PageTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Landing => "landing",
            Self::FullWidth => "full_width",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "default" => Ok(Self::Default),
            "landing" => Ok(Self::Landing),
            "full_width" => Ok(Self::FullWidth),
            other => Err(CoreError::Validation(format!(
                "Invalid page template '{other}'. Must be one of: default, landing, full_width"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
   Validation functions
   -------------------------------------------------------------------------- */

/// Validate a slug: non-empty, within length limit, lowercase alphanumeric
/// and hyphens only, no leading/trailing/double hyphen.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".to_string()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug too long: {} chars (max {MAX_SLUG_LEN})",
            slug.len()
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "Slug '{slug}' may only contain lowercase letters, digits, and hyphens"
        )));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(CoreError::Validation(format!(
            "Slug '{slug}' must not start/end with a hyphen or contain consecutive hyphens"
        )));
    }
    Ok(())
}

/// Validate a page title: non-empty and within length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Page title must not be empty".to_string(),
        ));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Page title too long: {} chars (max {MAX_TITLE_LEN})",
            title.len()
        )));
    }
    Ok(())
}

/// Validate an optional meta/description field against the shared limit.
pub fn validate_meta_field(name: &str, value: &str) -> Result<(), CoreError> {
    if value.len() > MAX_META_LEN {
        return Err(CoreError::Validation(format!(
            "{name} too long: {} chars (max {MAX_META_LEN})",
            value.len()
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for s in ["draft", "published", "archived"] {
            assert_eq!(PageStatus::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn status_rejects_unknown() {
        assert!(PageStatus::parse("live").is_err());
    }

    #[test]
    fn template_round_trips() {
        for t in ["default", "landing", "full_width"] {
            assert_eq!(PageTemplate::parse(t).unwrap().as_str(), t);
        }
    }

    #[test]
    fn slug_accepts_valid() {
        assert!(validate_slug("home").is_ok());
        assert!(validate_slug("corporate-wellness-2024").is_ok());
    }

    #[test]
    fn slug_rejects_invalid() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Home").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }

    #[test]
    fn title_rejects_empty_and_oversized() {
        assert!(validate_title("Home").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
    }
}
