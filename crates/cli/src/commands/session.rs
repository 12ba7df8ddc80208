//! Login and logout.

use secrecy::SecretString;
use shopfront::Storefront;
use shopfront::error::Result;

use crate::output;

pub fn login_with_token(store: &mut Storefront, token: SecretString) -> Result<()> {
    let notice = store.login_with_token(token)?;
    output::notice(&notice);
    Ok(())
}

/// Exchange credentials for a token at the Product Store.
pub async fn login(store: &mut Storefront, username: &str, password: &SecretString) -> Result<()> {
    let notice = store.login(username, password).await?;
    output::notice(&notice);
    Ok(())
}

pub fn logout(store: &mut Storefront) {
    output::notice(&store.logout());
}
