//! Cart ledger.
//!
//! An ordered list of [`CartEntry`] values, at most one per product,
//! mirrored to local storage under [`keys::CART`] after every mutation.
//! An empty cart is stored as an absent key, never as `[]`.
//!
//! A mutation only counts once the storage write succeeded; if the write
//! fails the in-memory change is undone and the error returned.

use shopfront_core::{CartEntry, Price, Product, ProductId, Quantity};

use crate::error::{Result, StorefrontError};
use crate::storage::{LocalStorage, StorageError, keys};

/// The user's cart plus the entries of the last checkout.
#[derive(Debug, Default, Clone)]
pub struct CartLedger {
    entries: Vec<CartEntry>,
    purchased: Vec<CartEntry>,
}

impl CartLedger {
    /// Restore the cart from local storage.
    ///
    /// A missing key yields an empty cart. An unreadable value is logged and
    /// also yields an empty cart; it is overwritten by the next mutation.
    #[must_use]
    pub fn load(storage: &LocalStorage) -> Self {
        let entries = match storage.get_json::<Vec<CartEntry>>(keys::CART) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored cart");
                Vec::new()
            }
        };
        Self {
            entries,
            purchased: Vec::new(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Number of entries (the cart badge count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.entries.iter().map(CartEntry::total).sum()
    }

    /// Entries moved out of the cart by the last [`checkout`](Self::checkout).
    #[must_use]
    pub fn purchased(&self) -> &[CartEntry] {
        &self.purchased
    }

    /// Append a single-unit entry for `product`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInCart` (cart untouched) if the product has an entry,
    /// or a storage error.
    pub fn add(&mut self, product: &Product, storage: &mut LocalStorage) -> Result<&CartEntry> {
        if self.contains(&product.id) {
            return Err(StorefrontError::AlreadyInCart(product.id.clone()));
        }

        self.entries.push(CartEntry::from_product(product));
        if let Err(e) = self.persist(storage) {
            self.entries.pop();
            return Err(e.into());
        }

        tracing::info!(product_id = %product.id, "Added to cart");
        self.entries
            .last()
            .ok_or_else(|| StorefrontError::NotFound(product.id.to_string()))
    }

    /// Remove the entry for `id`. Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn remove(&mut self, id: &ProductId, storage: &mut LocalStorage) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.entries.remove(index);
        if let Err(e) = self.persist(storage) {
            self.entries.insert(index, removed);
            return Err(e.into());
        }

        tracing::info!(product_id = %id, "Removed from cart");
        Ok(true)
    }

    /// Change the quantity of the entry for `id`. Returns whether an entry
    /// was updated.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn set_quantity(
        &mut self,
        id: &ProductId,
        quantity: Quantity,
        storage: &mut LocalStorage,
    ) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return Ok(false);
        };

        let previous = entry.quantity();
        entry.set_quantity(quantity);
        if let Err(e) = self.persist(storage) {
            if let Some(entry) = self.entries.get_mut(index) {
                entry.set_quantity(previous);
            }
            return Err(e.into());
        }
        Ok(true)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub fn clear(&mut self, storage: &mut LocalStorage) -> Result<()> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.persist(storage) {
            self.entries = previous;
            return Err(e.into());
        }
        Ok(())
    }

    /// Move every entry into the purchase list and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a storage error; the cart is left as it was.
    pub fn checkout(&mut self, storage: &mut LocalStorage) -> Result<&[CartEntry]> {
        let bought = std::mem::take(&mut self.entries);
        if let Err(e) = self.persist(storage) {
            self.entries = bought;
            return Err(e.into());
        }

        tracing::info!(entries = bought.len(), "Checked out cart");
        self.purchased = bought;
        Ok(&self.purchased)
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    fn persist(&self, storage: &mut LocalStorage) -> std::result::Result<(), StorageError> {
        if self.entries.is_empty() {
            storage.remove(keys::CART)
        } else {
            storage.set_json(keys::CART, &self.entries)
        }
    }
}
