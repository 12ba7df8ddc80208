//! Catalog and product detail views.

use shopfront::Storefront;
use shopfront::catalog::{CATEGORY_TAGS, FEATURE_TAGS};
use shopfront::error::Result;
use shopfront_core::ProductId;

use crate::output;

/// Load the catalog and print the filtered view.
pub async fn list(store: &mut Storefront, search: Option<&str>, tag: Option<&str>) -> Result<()> {
    store.open_catalog().await?;

    if let Some(text) = search {
        store.search(text);
    }
    if let Some(tag) = tag {
        store.filter_tag(tag);
    }

    output::products(&store.catalog().visible());
    Ok(())
}

/// Open a product in the detail view.
pub async fn show(store: &mut Storefront, id: &ProductId) -> Result<()> {
    store.open_catalog().await?;
    let entry = store.open_detail(id)?;
    output::product_detail(&entry);
    Ok(())
}

/// Print the product last opened with [`show`].
pub fn last(store: &Storefront) -> Result<()> {
    match store.detail()? {
        Some(entry) => output::product_detail(&entry),
        None => output::empty("No product opened yet"),
    }
    Ok(())
}

pub fn tags() {
    output::tags("Features", FEATURE_TAGS);
    output::tags("Categories", CATEGORY_TAGS);
}
