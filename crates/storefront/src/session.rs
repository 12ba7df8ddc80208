//! Session flag.
//!
//! The session is a single opaque token. Its presence means "logged in";
//! it is never validated, refreshed or expired on this side.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, StorefrontError};
use crate::notice::Notice;
use crate::storage::{LocalStorage, keys};

/// The current session token, if any.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<SecretString>,
}

impl Session {
    /// Restore the session from local storage. A blank stored token counts
    /// as no session.
    #[must_use]
    pub fn load(storage: &LocalStorage) -> Self {
        let token = storage
            .get(keys::TOKEN)
            .filter(|t| !t.trim().is_empty())
            .map(|t| SecretString::from(t.to_owned()));
        Self { token }
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// The token, or [`StorefrontError::LoginRequired`].
    ///
    /// # Errors
    ///
    /// Returns `LoginRequired` when there is no session.
    pub fn require(&self) -> Result<&SecretString> {
        self.token.as_ref().ok_or(StorefrontError::LoginRequired)
    }

    /// Start a session with `token` and persist it.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for a blank token, or a storage error.
    pub fn login(&mut self, token: SecretString, storage: &mut LocalStorage) -> Result<Notice> {
        if token.expose_secret().trim().is_empty() {
            return Err(StorefrontError::BadRequest("token cannot be empty".to_string()));
        }
        storage.set(keys::TOKEN, token.expose_secret())?;
        self.token = Some(token);
        tracing::info!("Session started");
        Ok(Notice::LoggedIn)
    }

    /// End the session.
    ///
    /// Reports [`Notice::LoggedOut`] whether or not a session existed, and
    /// even when the stored token cannot be deleted. The in-memory token is
    /// always cleared.
    pub fn logout(&mut self, storage: &mut LocalStorage) -> Notice {
        let had_session = self.token.take().is_some();
        if let Err(e) = storage.remove(keys::TOKEN) {
            tracing::error!(error = %e, "Failed to delete stored token");
        }
        tracing::info!(had_session, "Session ended");
        Notice::LoggedOut
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_token() {
        let storage = LocalStorage::in_memory();
        let session = Session::load(&storage);
        assert!(!session.is_logged_in());
        assert!(matches!(session.require(), Err(StorefrontError::LoginRequired)));
    }

    #[test]
    fn test_load_ignores_blank_token() {
        let mut storage = LocalStorage::in_memory();
        storage.set(keys::TOKEN, "  ").unwrap();
        assert!(!Session::load(&storage).is_logged_in());
    }

    #[test]
    fn test_login_persists_token() {
        let mut storage = LocalStorage::in_memory();
        let mut session = Session::default();
        let notice = session
            .login(SecretString::from("tok-1".to_string()), &mut storage)
            .unwrap();

        assert_eq!(notice, Notice::LoggedIn);
        assert!(session.is_logged_in());
        assert_eq!(storage.get(keys::TOKEN), Some("tok-1"));
        assert!(Session::load(&storage).is_logged_in());
    }

    #[test]
    fn test_login_rejects_blank_token() {
        let mut storage = LocalStorage::in_memory();
        let mut session = Session::default();
        let result = session.login(SecretString::from(String::new()), &mut storage);
        assert!(matches!(result, Err(StorefrontError::BadRequest(_))));
        assert!(!storage.contains(keys::TOKEN));
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let mut storage = LocalStorage::in_memory();
        let mut session = Session::default();
        session
            .login(SecretString::from("tok-1".to_string()), &mut storage)
            .unwrap();

        assert_eq!(session.logout(&mut storage), Notice::LoggedOut);
        assert!(!session.is_logged_in());
        assert!(!storage.contains(keys::TOKEN));
    }

    #[test]
    fn test_logout_without_session_still_confirms() {
        let mut storage = LocalStorage::in_memory();
        let mut session = Session::default();
        assert_eq!(session.logout(&mut storage), Notice::LoggedOut);
        assert!(!storage.contains(keys::TOKEN));
    }

    #[test]
    fn test_logout_confirms_when_token_cannot_be_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let mut storage = LocalStorage::open(&data_dir).unwrap();
        let mut session = Session::default();
        session
            .login(SecretString::from("tok-1".to_string()), &mut storage)
            .unwrap();

        // A plain file where the data directory should be
        std::fs::remove_dir_all(&data_dir).unwrap();
        std::fs::write(&data_dir, b"").unwrap();

        assert_eq!(session.logout(&mut storage), Notice::LoggedOut);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut storage = LocalStorage::in_memory();
        let mut session = Session::default();
        session
            .login(SecretString::from("very-secret".to_string()), &mut storage)
            .unwrap();
        assert!(!format!("{session:?}").contains("very-secret"));
    }
}
