//! Data access failures.

use thiserror::Error;

/// Failure of a single read against the service.
///
/// Every variant except [`ApiError::NotFound`] is a transport failure: the
/// caller leaves the affected state unresolved and shows a "could not load"
/// message. `NotFound` means the service does not know the product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Status(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("product not found")]
    NotFound,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    pub fn is_transport(&self) -> bool {
        !self.is_not_found()
    }

    /// Short user-facing message.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::NotFound => "Product not found.",
            _ => "Could not load data. Please try again later.",
        }
    }
}
