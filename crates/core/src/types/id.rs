//! Product identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
}

/// A product identifier as assigned by the Product Store.
///
/// Identifiers are opaque strings. The store owns their format; the only
/// rule enforced here is that an identifier typed in by a user is not blank.
///
/// ## Examples
///
/// ```
/// use shopfront_core::ProductId;
///
/// assert!(ProductId::parse("sku-001").is_ok());
/// assert!(ProductId::parse("  ").is_err());
/// assert_eq!(ProductId::parse(" sku-001 ").unwrap().as_str(), "sku-001");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Parse a `ProductId` from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap an identifier received from the Product Store as-is.
    #[must_use]
    pub fn from_store(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let id = ProductId::parse("  p-42\t").unwrap();
        assert_eq!(id.as_str(), "p-42");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
        assert_eq!(ProductId::parse("   "), Err(ProductIdError::Empty));
    }

    #[test]
    fn test_from_store_keeps_value() {
        let id = ProductId::from_store("64f0c2");
        assert_eq!(id.to_string(), "64f0c2");
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::parse("p-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p-1\"");
        let parsed: ProductId = serde_json::from_str("\"p-1\"").unwrap();
        assert_eq!(parsed, id);
    }
}
