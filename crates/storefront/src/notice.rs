//! User-facing notices.
//!
//! Everything the storefront tells the user (alerts, toasts) is a
//! [`Notice`]. Front ends decide how to show it.

use std::fmt;

/// Severity of a notice, used by front ends for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The product is already in the cart.
    AlreadyInCart,
    /// A product was added to the cart.
    AddedToCart,
    /// The action needs a session; the user is sent to the login flow.
    LoginRequired,
    /// Login succeeded.
    LoggedIn,
    /// Logout always reports success.
    LoggedOut,
    /// Checkout completed with this many entries.
    CheckedOut(usize),
    /// One or more required editor fields are empty.
    RequiredFields,
    /// A numeric editor field does not parse.
    InvalidNumber(String),
    ProductCreated,
    ProductCreateFailed,
    ProductUpdated,
    ProductUpdateFailed,
    ProductDeleted,
    ProductDeleteFailed,
    /// Loading data from the Product Store failed.
    LoadFailed,
    /// Local storage could not be read or written.
    StorageFailed,
    /// Nothing matches the request (e.g. unknown product id).
    NotFound(String),
    /// Input rejected outside the editor form (e.g. a blank token).
    BadInput(String),
}

impl Notice {
    #[must_use]
    pub const fn level(&self) -> NoticeLevel {
        match self {
            Self::AddedToCart
            | Self::LoggedIn
            | Self::LoggedOut
            | Self::CheckedOut(_)
            | Self::ProductCreated
            | Self::ProductUpdated
            | Self::ProductDeleted => NoticeLevel::Success,
            Self::AlreadyInCart | Self::LoginRequired | Self::NotFound(_) | Self::BadInput(_) => {
                NoticeLevel::Info
            }
            Self::RequiredFields
            | Self::InvalidNumber(_)
            | Self::ProductCreateFailed
            | Self::ProductUpdateFailed
            | Self::ProductDeleteFailed
            | Self::LoadFailed
            | Self::StorageFailed => NoticeLevel::Error,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInCart => write!(f, "It's already in the cart!"),
            Self::AddedToCart => write!(f, "Added to cart"),
            Self::LoginRequired => write!(f, "Please log in first"),
            Self::LoggedIn => write!(f, "Login successfully"),
            Self::LoggedOut => write!(f, "Logout successfully"),
            Self::CheckedOut(n) => write!(f, "Purchased {n} item(s)"),
            Self::RequiredFields => write!(f, "所有欄位均為必填！"),
            Self::InvalidNumber(field) => write!(f, "{field} must be a number"),
            Self::ProductCreated => write!(f, "商品新增成功!"),
            Self::ProductCreateFailed => write!(f, "商品新增失敗!"),
            Self::ProductUpdated => write!(f, "商品更新成功!"),
            Self::ProductUpdateFailed => write!(f, "商品更新失敗!"),
            Self::ProductDeleted => write!(f, "商品已刪除!"),
            Self::ProductDeleteFailed => write!(f, "刪除商品失敗!"),
            Self::LoadFailed => write!(f, "Failed to load products"),
            Self::StorageFailed => write!(f, "Failed to save local data"),
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::BadInput(msg) => write!(f, "{msg}"),
        }
    }
}
