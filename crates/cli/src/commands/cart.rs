//! Cart view.

use shopfront::error::Result;
use shopfront::{Storefront, StorefrontError};
use shopfront_core::{ProductId, Quantity};

use crate::output;

pub fn show(store: &Storefront) -> Result<()> {
    store.session().require()?;
    output::cart(store.cart());
    Ok(())
}

/// Add a catalog product. The catalog is fetched first so the entry
/// snapshots the current name and price.
pub async fn add(store: &mut Storefront, id: &ProductId) -> Result<()> {
    store.session().require()?;
    store.open_catalog().await?;
    let notice = store.add_to_cart(id)?;
    output::notice(&notice);
    Ok(())
}

pub fn remove(store: &mut Storefront, id: &ProductId) -> Result<()> {
    if store.remove_from_cart(id)? {
        output::cart(store.cart());
        Ok(())
    } else {
        Err(not_in_cart(id))
    }
}

pub fn set_quantity(store: &mut Storefront, id: &ProductId, quantity: Quantity) -> Result<()> {
    if store.set_quantity(id, quantity)? {
        output::cart(store.cart());
        Ok(())
    } else {
        Err(not_in_cart(id))
    }
}

pub fn clear(store: &mut Storefront) -> Result<()> {
    store.clear_cart()?;
    output::empty("Cart is empty");
    Ok(())
}

pub fn checkout(store: &mut Storefront) -> Result<()> {
    let notice = store.checkout()?;
    output::purchased(store.cart().purchased());
    output::notice(&notice);
    Ok(())
}

fn not_in_cart(id: &ProductId) -> StorefrontError {
    StorefrontError::NotFound(format!("{id} is not in the cart"))
}
