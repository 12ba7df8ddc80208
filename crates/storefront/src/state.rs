//! The storefront context shared by every view.
//!
//! [`Storefront`] owns everything the views read and write. Access rules:
//!
//! | Field     | Written by                                   | Persisted as      |
//! |-----------|----------------------------------------------|-------------------|
//! | `session` | `login`, `login_with_token`, `logout`        | `userToken`       |
//! | `cart`    | cart operations (session required)           | `storedCartData`  |
//! | `catalog` | `open_catalog`, `search`, `filter_tag`       | `productData` (detail hand-off) |
//! | `admin`   | admin operations (session required)          | not persisted     |
//! | `loading` | raised for the duration of each request      | not persisted     |

use secrecy::{ExposeSecret, SecretString};
use shopfront_core::{CartEntry, ProductId, Quantity};
use tracing::instrument;

use crate::admin::{AdminEditor, ProductForm};
use crate::api::ProductStoreClient;
use crate::cart::CartLedger;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError};
use crate::notice::Notice;
use crate::session::Session;
use crate::storage::LocalStorage;

/// Storefront state: configuration, client, storage and the view models.
pub struct Storefront {
    config: StorefrontConfig,
    client: ProductStoreClient,
    storage: LocalStorage,
    session: Session,
    cart: CartLedger,
    catalog: Catalog,
    admin: AdminEditor,
    loading: bool,
}

impl Storefront {
    /// Open the storage under the configured data directory and restore the
    /// session and cart from it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the storage file exists but cannot be read.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let storage = LocalStorage::open(&config.data_dir)?;
        Ok(Self::with_storage(config, storage))
    }

    /// Build a context over an already opened storage.
    #[must_use]
    pub fn with_storage(config: StorefrontConfig, storage: LocalStorage) -> Self {
        let client = ProductStoreClient::new(&config.api);
        let session = Session::load(&storage);
        let cart = CartLedger::load(&storage);
        tracing::debug!(
            logged_in = session.is_logged_in(),
            cart_entries = cart.len(),
            "Storefront state restored"
        );

        Self {
            config,
            client,
            storage,
            session,
            cart,
            catalog: Catalog::new(),
            admin: AdminEditor::new(),
            loading: false,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn client(&self) -> &ProductStoreClient {
        &self.client
    }

    #[must_use]
    pub const fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn cart(&self) -> &CartLedger {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn admin(&self) -> &AdminEditor {
        &self.admin
    }

    /// Whether a Product Store request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the catalog.
    ///
    /// # Errors
    ///
    /// Returns the Product Store error; the previous list is kept.
    #[instrument(skip(self))]
    pub async fn open_catalog(&mut self) -> Result<usize> {
        self.loading = true;
        let result = self.catalog.load(&self.client, self.session.token()).await;
        self.loading = false;
        result
    }

    pub fn search(&mut self, text: &str) {
        self.catalog.search(text);
    }

    pub fn filter_tag(&mut self, tag: &str) {
        self.catalog.filter_tag(tag);
    }

    /// Hand the catalog product `id` to the detail view.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an id outside the catalog, or a storage error.
    pub fn open_detail(&mut self, id: &ProductId) -> Result<CartEntry> {
        self.catalog.open_detail(id, &mut self.storage)
    }

    /// The product last handed to the detail view.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the stored value is unreadable.
    pub fn detail(&self) -> Result<Option<CartEntry>> {
        Catalog::detail(&self.storage)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add the catalog product `id` to the cart.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, `NotFound` for an id
    /// outside the catalog, `AlreadyInCart`, or a storage error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<Notice> {
        self.session.require()?;
        let product = self
            .catalog
            .find(id)
            .ok_or_else(|| StorefrontError::NotFound(format!("product {id}")))?;
        self.cart.add(product, &mut self.storage)?;
        Ok(Notice::AddedToCart)
    }

    /// Remove the entry for `id`; returns whether one was removed.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, or a storage error.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<bool> {
        self.session.require()?;
        self.cart.remove(id, &mut self.storage)
    }

    /// Change the quantity of the entry for `id`.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, or a storage error.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: Quantity) -> Result<bool> {
        self.session.require()?;
        self.cart.set_quantity(id, quantity, &mut self.storage)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, or a storage error.
    pub fn clear_cart(&mut self) -> Result<()> {
        self.session.require()?;
        self.cart.clear(&mut self.storage)
    }

    /// Purchase everything in the cart.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, or a storage error.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<Notice> {
        self.session.require()?;
        let bought = self.cart.checkout(&mut self.storage)?;
        Ok(Notice::CheckedOut(bought.len()))
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Start a session with a token obtained elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a blank token, or a storage error.
    pub fn login_with_token(&mut self, token: SecretString) -> Result<Notice> {
        self.session.login(token, &mut self.storage)
    }

    /// Exchange credentials for a token at the Product Store and start a
    /// session with it.
    ///
    /// # Errors
    ///
    /// Returns the Product Store error, or a storage error.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &SecretString) -> Result<Notice> {
        self.loading = true;
        let result = self.client.login(username, password.expose_secret()).await;
        self.loading = false;

        self.session.login(result?, &mut self.storage)
    }

    /// End the session. Always confirms, see [`Session::logout`].
    pub fn logout(&mut self) -> Notice {
        self.session.logout(&mut self.storage)
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Enter the admin view and fetch its record list.
    ///
    /// A failed fetch is logged and leaves the list as it was.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session.
    #[instrument(skip(self))]
    pub async fn open_admin(&mut self) -> Result<usize> {
        let token = self.session.require()?;

        self.loading = true;
        let result = self.admin.load(&self.client, Some(token)).await;
        self.loading = false;

        match result {
            Ok(count) => Ok(count),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load admin records");
                Ok(self.admin.records().len())
            }
        }
    }

    /// The editor form, for typing into.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session.
    pub fn admin_form(&mut self) -> Result<&mut ProductForm> {
        self.session.require()?;
        Ok(self.admin.form_mut())
    }

    /// Load the record at `index` into the editor.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, or `NoSuchRecord`.
    pub fn admin_edit(&mut self, index: usize) -> Result<()> {
        self.session.require()?;
        Ok(self.admin.edit(index)?)
    }

    /// Cancel editing.
    pub fn admin_reset(&mut self) {
        self.admin.reset();
    }

    /// Submit the editor form.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, a validation error, or
    /// `CreateFailed` / `UpdateFailed`.
    pub async fn admin_submit(&mut self) -> Result<Notice> {
        let token = self.session.require()?;

        self.loading = true;
        let result = self.admin.submit(&self.client, Some(token)).await;
        self.loading = false;
        result
    }

    /// Delete a record once confirmed; `Ok(None)` when not confirmed.
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` without a session, or `DeleteFailed`.
    pub async fn admin_delete(&mut self, id: &ProductId, confirmed: bool) -> Result<Option<Notice>> {
        let token = self.session.require()?;

        self.loading = true;
        let result = self.admin.delete(id, confirmed, &self.client, Some(token)).await;
        self.loading = false;
        result
    }
}
