//! Admin editor: create, update and delete product records.
//!
//! The editor is a two-mode state machine over a raw string form:
//!
//! - **create** (initial): `submit` creates a record and appends it locally.
//! - **edit**: entered by [`AdminEditor::edit`]; `submit` patches the record
//!   being edited and replaces it locally.
//!
//! Modes only change on explicit calls (`edit`, `reset`, a successful
//! `submit`). A failed submit keeps both the form and the mode so the user
//! can retry.

use chrono::{SecondsFormat, Utc};
use secrecy::SecretString;
use shopfront_core::{Price, Product, ProductId, join_tags, parse_tags};
use thiserror::Error;
use tracing::instrument;

use crate::api::ProductStoreClient;
use crate::error::{Result, StorefrontError};
use crate::notice::Notice;

/// Editor input problems caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required fields left blank.
    #[error("required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A numeric field does not parse.
    #[error("{field} is not a valid number: {reason}")]
    InvalidNumber { field: &'static str, reason: String },

    /// `edit` was given an index outside the record list.
    #[error("no record at position {0}")]
    NoSuchRecord(usize),
}

/// Which submit the editor will perform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Create,
    /// Editing the record that had this id when `edit` was called.
    Edit(ProductId),
}

/// Raw editor fields, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub stock: String,
    /// Image URL.
    pub image: String,
    pub description: String,
    /// Comma-separated tags.
    pub tags: String,
    pub product_id: String,
    pub launch_date: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::blank()
    }
}

impl ProductForm {
    /// An empty form whose launch date defaults to now.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            stock: String::new(),
            image: String::new(),
            description: String::new(),
            tags: String::new(),
            product_id: String::new(),
            launch_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Fill the form from an existing record.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.amount().to_string(),
            stock: product.stock.to_string(),
            image: product.image.clone(),
            description: product.description.clone(),
            tags: join_tags(&product.tags),
            product_id: product.id.to_string(),
            launch_date: product.launched_at.clone(),
        }
    }

    /// Check required fields and parse the form into a record.
    ///
    /// Numbers are accepted in any notation their type can parse; no bounds
    /// or precision rules apply.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` listing every blank required field, or
    /// `InvalidNumber` for an unparsable price or stock.
    pub fn validate(&self) -> std::result::Result<Product, ValidationError> {
        let required = [
            ("name", &self.name),
            ("price", &self.price),
            ("stock", &self.stock),
            ("description", &self.description),
            ("image", &self.image),
            ("product_id", &self.product_id),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let price = Price::parse(&self.price).map_err(|e| ValidationError::InvalidNumber {
            field: "price",
            reason: e.to_string(),
        })?;
        let stock = self
            .stock
            .trim()
            .parse::<u32>()
            .map_err(|e| ValidationError::InvalidNumber {
                field: "stock",
                reason: e.to_string(),
            })?;
        let id = ProductId::parse(&self.product_id)
            .map_err(|_| ValidationError::MissingFields(vec!["product_id"]))?;

        Ok(Product {
            id,
            name: self.name.clone(),
            price,
            stock,
            image: self.image.clone(),
            description: self.description.clone(),
            tags: parse_tags(&self.tags),
            launched_at: self.launch_date.clone(),
        })
    }
}

/// The admin CRUD workflow.
#[derive(Debug, Default)]
pub struct AdminEditor {
    records: Vec<Product>,
    form: ProductForm,
    mode: EditorMode,
}

impl AdminEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the record list.
    ///
    /// # Errors
    ///
    /// Returns the Product Store error; the list is left unchanged.
    #[instrument(skip_all)]
    pub async fn load(
        &mut self,
        client: &ProductStoreClient,
        token: Option<&SecretString>,
    ) -> Result<usize> {
        let records = client.list_products(token).await?;
        self.records = records;
        tracing::info!(count = self.records.len(), "Admin records loaded");
        Ok(self.records.len())
    }

    #[must_use]
    pub fn records(&self) -> &[Product] {
        &self.records
    }

    #[must_use]
    pub const fn form(&self) -> &ProductForm {
        &self.form
    }

    /// Mutable access for typing into the form.
    pub const fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Load the record at `index` into the form and switch to edit mode.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchRecord` if `index` is out of range; nothing changes.
    pub fn edit(&mut self, index: usize) -> std::result::Result<(), ValidationError> {
        let record = self
            .records
            .get(index)
            .ok_or(ValidationError::NoSuchRecord(index))?;
        self.form = ProductForm::from_product(record);
        self.mode = EditorMode::Edit(record.id.clone());
        Ok(())
    }

    /// Clear the form and return to create mode.
    pub fn reset(&mut self) {
        self.form = ProductForm::blank();
        self.mode = EditorMode::Create;
    }

    /// Create or update, depending on the mode.
    ///
    /// In edit mode the update is sent to the id remembered by
    /// [`edit`](Self::edit), not to the form's `product_id` field, and the
    /// local record carrying that id is replaced. Changing the id field
    /// therefore renames the record instead of targeting another one.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error (no request sent), or `CreateFailed` /
    /// `UpdateFailed` when the store rejects the call. The form and mode
    /// are kept on every error.
    #[instrument(skip_all, fields(mode = ?self.mode))]
    pub async fn submit(
        &mut self,
        client: &ProductStoreClient,
        token: Option<&SecretString>,
    ) -> Result<Notice> {
        let product = self.form.validate()?;

        match self.mode.clone() {
            EditorMode::Create => {
                let created = client
                    .create_product(&product, token)
                    .await
                    .map_err(StorefrontError::CreateFailed)?;
                tracing::info!(product_id = %created.id, "Product created");
                self.records.push(created);
                self.reset();
                Ok(Notice::ProductCreated)
            }
            EditorMode::Edit(id) => {
                let updated = client
                    .update_product(&id, &product, token)
                    .await
                    .map_err(StorefrontError::UpdateFailed)?;
                tracing::info!(product_id = %id, "Product updated");
                for record in self.records.iter_mut().filter(|r| r.id == id) {
                    *record = updated.clone();
                }
                self.reset();
                Ok(Notice::ProductUpdated)
            }
        }
    }

    /// Delete the record `id` once the user has confirmed.
    ///
    /// Returns `Ok(None)` without a request when `confirmed` is false.
    ///
    /// # Errors
    ///
    /// Returns `DeleteFailed` when the store rejects the call; the list is
    /// unchanged.
    #[instrument(skip(self, client, token), fields(product_id = %id))]
    pub async fn delete(
        &mut self,
        id: &ProductId,
        confirmed: bool,
        client: &ProductStoreClient,
        token: Option<&SecretString>,
    ) -> Result<Option<Notice>> {
        if !confirmed {
            tracing::debug!("Delete not confirmed");
            return Ok(None);
        }

        client
            .delete_product(id, token)
            .await
            .map_err(StorefrontError::DeleteFailed)?;
        self.records.retain(|r| &r.id != id);
        tracing::info!("Product deleted");
        Ok(Some(Notice::ProductDeleted))
    }
}
