//! Unified error handling.
//!
//! Provides a unified `StorefrontError` type. Every fallible storefront
//! operation returns `Result<T, StorefrontError>`; front ends turn the error
//! into a [`Notice`] with [`StorefrontError::notice`], which logs backend and
//! storage failures and never exposes their details to the user.

use shopfront_core::{PriceError, ProductId, ProductIdError, QuantityError};
use thiserror::Error;

use crate::admin::ValidationError;
use crate::api::ApiError;
use crate::config::ConfigError;
use crate::notice::Notice;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The environment holds an unusable setting.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Loading from the Product Store failed.
    #[error("Product Store error: {0}")]
    Api(#[from] ApiError),

    /// Creating a product failed; the editor form is kept.
    #[error("Create failed: {0}")]
    CreateFailed(#[source] ApiError),

    /// Updating a product failed; the editor form is kept.
    #[error("Update failed: {0}")]
    UpdateFailed(#[source] ApiError),

    /// Deleting a product failed; the local list is unchanged.
    #[error("Delete failed: {0}")]
    DeleteFailed(#[source] ApiError),

    /// Local storage read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Editor input rejected before any network call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    #[error("Invalid product id: {0}")]
    ProductId(#[from] ProductIdError),

    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    /// The product already has a cart entry.
    #[error("Already in cart: {0}")]
    AlreadyInCart(ProductId),

    /// The action needs a session token.
    #[error("Login required")]
    LoginRequired,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input that is not an editor field (e.g. an empty token).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl StorefrontError {
    /// The notice to show for this error.
    ///
    /// Backend and storage failures are logged here; callers only display
    /// the returned notice.
    #[must_use]
    pub fn notice(&self) -> Notice {
        if matches!(
            self,
            Self::Api(_)
                | Self::CreateFailed(_)
                | Self::UpdateFailed(_)
                | Self::DeleteFailed(_)
                | Self::Storage(_)
        ) {
            tracing::error!(error = %self, "Storefront operation failed");
        }

        match self {
            Self::Config(err) => Notice::BadInput(err.to_string()),
            Self::Api(_) => Notice::LoadFailed,
            Self::CreateFailed(_) => Notice::ProductCreateFailed,
            Self::UpdateFailed(_) => Notice::ProductUpdateFailed,
            Self::DeleteFailed(_) => Notice::ProductDeleteFailed,
            Self::Storage(_) => Notice::StorageFailed,
            Self::Validation(err) => match err {
                ValidationError::MissingFields(_) => Notice::RequiredFields,
                ValidationError::InvalidNumber { field, .. } => Notice::InvalidNumber((*field).to_string()),
                ValidationError::NoSuchRecord(index) => Notice::NotFound(format!("record #{index}")),
            },
            Self::Price(_) => Notice::InvalidNumber("price".to_string()),
            Self::ProductId(err) => Notice::BadInput(err.to_string()),
            Self::Quantity(err) => Notice::BadInput(err.to_string()),
            Self::AlreadyInCart(_) => Notice::AlreadyInCart,
            Self::LoginRequired => Notice::LoginRequired,
            Self::NotFound(what) => Notice::NotFound(what.clone()),
            Self::BadRequest(msg) => Notice::BadInput(msg.clone()),
        }
    }

    /// Whether the user should be sent to the login flow.
    #[must_use]
    pub const fn redirects_to_login(&self) -> bool {
        matches!(self, Self::LoginRequired)
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::NotFound("product p-9".to_string());
        assert_eq!(err.to_string(), "Not found: product p-9");

        let err = StorefrontError::AlreadyInCart(ProductId::from_store("p-1"));
        assert_eq!(err.to_string(), "Already in cart: p-1");
    }

    #[test]
    fn test_error_notices() {
        assert_eq!(StorefrontError::LoginRequired.notice(), Notice::LoginRequired);
        assert_eq!(
            StorefrontError::AlreadyInCart(ProductId::from_store("p-1")).notice(),
            Notice::AlreadyInCart
        );
        assert_eq!(
            StorefrontError::Validation(ValidationError::MissingFields(vec!["name"])).notice(),
            Notice::RequiredFields
        );
        assert_eq!(
            StorefrontError::CreateFailed(ApiError::Status {
                status: 500,
                body: "boom".to_string()
            })
            .notice(),
            Notice::ProductCreateFailed
        );
    }

    #[test]
    fn test_backend_details_not_in_notice() {
        let err = StorefrontError::UpdateFailed(ApiError::Status {
            status: 500,
            body: "stack trace at line 42".to_string(),
        });
        assert!(!err.notice().to_string().contains("stack trace"));
    }

    #[test]
    fn test_config_and_core_errors_convert() {
        let err: StorefrontError =
            ConfigError::InvalidEnvVar("SHOPFRONT_API_SCHEMA".to_string(), "unknown schema".to_string()).into();
        assert!(matches!(err, StorefrontError::Config(_)));
        assert_eq!(
            err.notice().to_string(),
            "Invalid environment variable SHOPFRONT_API_SCHEMA: unknown schema"
        );

        let err: StorefrontError = PriceError::Negative.into();
        assert_eq!(err.notice(), Notice::InvalidNumber("price".to_string()));

        let err: StorefrontError = QuantityError::Zero.into();
        assert_eq!(err.notice().to_string(), "quantity must be at least 1");

        let err: StorefrontError = ProductIdError::Empty.into();
        assert_eq!(err.notice().to_string(), "product id cannot be empty");
    }

    #[test]
    fn test_redirects_to_login() {
        assert!(StorefrontError::LoginRequired.redirects_to_login());
        assert!(!StorefrontError::NotFound("x".to_string()).redirects_to_login());
    }
}
