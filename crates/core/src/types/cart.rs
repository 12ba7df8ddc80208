//! Cart entry types.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    Zero,
}

/// Number of units of a product in the cart (always at least one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for `0`.
    pub fn new(n: u32) -> Result<Self, QuantityError> {
        NonZeroU32::new(n).map(Self).ok_or(QuantityError::Zero)
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

/// A line in the cart.
///
/// Holds a snapshot of the product as it was when added; later catalog
/// changes do not affect it. `total` is always `price * quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: Price,
    pub category: Option<String>,
    pub description: String,
    quantity: Quantity,
    total_price: Price,
}

impl CartEntry {
    /// Snapshot a product into a single-unit cart entry.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.name.clone(),
            image: product.image.clone(),
            price: product.price,
            category: product.category().map(str::to_owned),
            description: product.description.clone(),
            quantity: Quantity::ONE,
            total_price: product.price,
        }
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Line total (`price * quantity`).
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total_price
    }

    /// Change the quantity and recompute the line total.
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
        self.total_price = self.price.times(quantity);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hat() -> Product {
        Product {
            id: ProductId::from_store("hat-1"),
            name: "Blue Hat".to_owned(),
            price: Price::parse("12.50").unwrap(),
            stock: 3,
            image: "https://img.example/hat.png".to_owned(),
            description: "A hat".to_owned(),
            tags: vec!["accessories".to_owned(), "sale".to_owned()],
            launched_at: "2024-01-01T00:00:00.000Z".to_owned(),
        }
    }

    #[test]
    fn test_quantity_rejects_zero() {
        assert_eq!(Quantity::new(0), Err(QuantityError::Zero));
        assert_eq!(Quantity::new(2).unwrap().get(), 2);
    }

    #[test]
    fn test_from_product_snapshot() {
        let entry = CartEntry::from_product(&hat());
        assert_eq!(entry.id.as_str(), "hat-1");
        assert_eq!(entry.title, "Blue Hat");
        assert_eq!(entry.category.as_deref(), Some("accessories"));
        assert_eq!(entry.quantity(), Quantity::ONE);
        assert_eq!(entry.total(), entry.price);
    }

    #[test]
    fn test_set_quantity_recomputes_total() {
        let mut entry = CartEntry::from_product(&hat());
        entry.set_quantity(Quantity::new(4).unwrap());
        assert_eq!(entry.total(), Price::parse("50").unwrap());
    }

    #[test]
    fn test_set_quantity_on_huge_price_saturates() {
        let mut product = hat();
        product.price = Price::parse("79228162514264337593543950335").unwrap();
        let mut entry = CartEntry::from_product(&product);
        entry.set_quantity(Quantity::new(2).unwrap());
        assert_eq!(entry.total(), product.price);
    }

    #[test]
    fn test_json_roundtrip_keeps_entry() {
        let mut entry = CartEntry::from_product(&hat());
        entry.set_quantity(Quantity::new(3).unwrap());
        let json = serde_json::to_string(&entry).unwrap();
        let back: CartEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.total(), Price::parse("37.5").unwrap());
    }

    #[test]
    fn test_storage_shape() {
        let entry = CartEntry::from_product(&hat());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "hat-1");
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["totalPrice"], 12.5);
    }
}
