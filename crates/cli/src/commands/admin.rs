//! Admin editor commands.
//!
//! Each invocation is one pass through the editor: optionally load the
//! records, fill the form, submit.

use shopfront::Storefront;
use shopfront::admin::ProductForm;
use shopfront::error::Result;
use shopfront_core::ProductId;

use crate::output;

/// Field values given on the command line. `None` leaves the form field as
/// it is (blank for `create`, the record's value for `edit`).
#[derive(Debug, Default)]
pub struct FormPatch {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub launch_date: Option<String>,
}

impl FormPatch {
    fn apply(self, form: &mut ProductForm) {
        let fields = [
            (self.product_id, &mut form.product_id),
            (self.name, &mut form.name),
            (self.price, &mut form.price),
            (self.stock, &mut form.stock),
            (self.image, &mut form.image),
            (self.description, &mut form.description),
            (self.tags, &mut form.tags),
            (self.launch_date, &mut form.launch_date),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

pub async fn list(store: &mut Storefront) -> Result<()> {
    store.open_admin().await?;
    output::records(store.admin().records());
    Ok(())
}

pub async fn create(store: &mut Storefront, patch: FormPatch) -> Result<()> {
    patch.apply(store.admin_form()?);
    let notice = store.admin_submit().await?;
    output::notice(&notice);
    Ok(())
}

/// Load the record at `index`, apply `patch` on top and submit.
pub async fn edit(store: &mut Storefront, index: usize, patch: FormPatch) -> Result<()> {
    store.open_admin().await?;
    store.admin_edit(index)?;
    patch.apply(store.admin_form()?);
    let notice = store.admin_submit().await?;
    output::notice(&notice);
    Ok(())
}

pub async fn delete(store: &mut Storefront, id: &ProductId, confirmed: bool) -> Result<()> {
    match store.admin_delete(id, confirmed).await? {
        Some(notice) => output::notice(&notice),
        None => output::empty("Not deleted; pass --yes to confirm"),
    }
    Ok(())
}
