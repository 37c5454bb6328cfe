//! Strongly-typed product identifier.
//!
//! The service emits identifiers as JSON numbers while routes carry them as
//! text. Both are normalized into a single canonical `u64` so lookups compare
//! like with like: `"042"`, `" 42 "` and `42` are the same product.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product (and of the product a recommendation points at).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ProductId> for u64 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("ProductId: empty"));
        }
        // Reject signs explicitly; `u64::from_str` accepts a leading '+'.
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_id(format!("ProductId: {trimmed:?} is not numeric")));
        }
        let raw = trimmed
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("ProductId: {e}")))?;
        Ok(Self(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_text() {
        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId::new(42));
        assert_eq!(" 42\n".parse::<ProductId>().unwrap(), ProductId::new(42));
        assert_eq!("0042".parse::<ProductId>().unwrap(), ProductId::new(42));
    }

    #[test]
    fn rejects_non_numeric_text() {
        for raw in ["", "  ", "abc", "4x2", "-1", "+7", "1.5"] {
            match raw.parse::<ProductId>() {
                Err(DomainError::InvalidId(_)) => {}
                other => panic!("expected InvalidId for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!("99999999999999999999999".parse::<ProductId>().is_err());
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&ProductId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(back, ProductId::new(7));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let id = ProductId::new(1234);
        assert_eq!(id.to_string().parse::<ProductId>().unwrap(), id);
    }
}
