//! Service token persistence via OS keyring
//!
//! The ProbModelSEED token is stored in the operating system's native
//! credential store (Keychain on macOS, Secret Service on Linux, Windows
//! Credential Manager on Windows), one entry per user id. Entries are JSON
//! so the save time survives alongside the token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProbModelSeedError, Result};
use crate::rpc::auth::TokenProvider;

/// Keyring service name under which all entries are filed.
const KEYRING_SERVICE: &str = "probmodelseed";

/// Account name used when no user id is configured.
pub const DEFAULT_ACCOUNT: &str = "default";

/// A token as persisted in the keyring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    /// The token sent in the `Authorization` header.
    pub token: String,
    /// User the token belongs to.
    pub user_id: String,
    /// When the token was saved.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub saved_at: DateTime<Utc>,
}

/// Stateless accessor for the keyring.
///
/// # Examples
///
/// ```no_run
/// use probmodelseed::rpc::token_store::TokenStore;
///
/// # fn example() -> probmodelseed::error::Result<()> {
/// let store = TokenStore;
/// store.save_token("alice", "un=alice|tokenid=1|sig=x")?;
/// let loaded = store.load_token("alice")?;
/// assert!(loaded.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenStore;

impl TokenStore {
    /// Keyring account for a user id; blank ids map to [`DEFAULT_ACCOUNT`].
    pub fn account_name(user_id: &str) -> &str {
        let trimmed = user_id.trim();
        if trimmed.is_empty() {
            DEFAULT_ACCOUNT
        } else {
            trimmed
        }
    }

    fn entry(user_id: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, Self::account_name(user_id))
            .map_err(|e| ProbModelSeedError::Keyring(e).into())
    }

    /// Persist `token` for `user_id`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProbModelSeedError::Authentication`] for an empty token,
    /// [`ProbModelSeedError::Keyring`] if the credential store rejects the
    /// write.
    pub fn save_token(&self, user_id: &str, token: &str) -> Result<StoredToken> {
        if token.trim().is_empty() {
            return Err(ProbModelSeedError::Authentication("token must not be empty".into()).into());
        }

        let stored = StoredToken {
            token: token.trim().to_string(),
            user_id: user_id.trim().to_string(),
            saved_at: Utc::now(),
        };
        let json_str = serde_json::to_string(&stored)?;
        Self::entry(user_id)?
            .set_password(&json_str)
            .map_err(ProbModelSeedError::Keyring)?;

        tracing::debug!(account = Self::account_name(user_id), "Saved ProbModelSEED token");
        Ok(stored)
    }

    /// Load the token stored for `user_id`.
    ///
    /// Returns `Ok(None)` when nothing was saved, so callers can tell "not
    /// logged in" apart from a keyring failure.
    pub fn load_token(&self, user_id: &str) -> Result<Option<StoredToken>> {
        match Self::entry(user_id)?.get_password() {
            Ok(json_str) => Ok(Some(serde_json::from_str(&json_str)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ProbModelSeedError::Keyring(e).into()),
        }
    }

    /// Delete the token stored for `user_id`. Missing entries are not an
    /// error.
    pub fn delete_token(&self, user_id: &str) -> Result<()> {
        match Self::entry(user_id)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ProbModelSeedError::Keyring(e).into()),
        }
    }
}

/// Token provider that reads the keyring on every request, so a token
/// refreshed with `probmodelseed auth login` is picked up by running clients.
#[derive(Debug, Clone)]
pub struct KeyringTokenProvider {
    user_id: String,
}

impl KeyringTokenProvider {
    /// Provider for the token stored under `user_id`.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl TokenProvider for KeyringTokenProvider {
    fn token(&self) -> Option<String> {
        match TokenStore.load_token(&self.user_id) {
            Ok(stored) => stored.map(|s| s.token),
            Err(e) => {
                tracing::warn!(
                    account = TokenStore::account_name(&self.user_id),
                    "Failed to read ProbModelSEED token from keyring: {}",
                    e
                );
                None
            }
        }
    }
}
