//! Authorization for ProbModelSEED requests
//!
//! A client carries a static [`AuthInfo`] pair and, optionally, a
//! [`TokenProvider`] consulted on every request. [`Authorization::resolve`]
//! is the single place that decides which value, if any, goes into the
//! `Authorization` header:
//!
//! 1. a configured provider always wins, whatever it returns;
//! 2. otherwise a non-empty static token is used;
//! 3. otherwise the header is omitted.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Static credentials: a bearer-style token and the user it belongs to.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    /// Token placed verbatim in the `Authorization` header.
    #[serde(default)]
    pub token: String,
    /// User the token was issued to.
    #[serde(default)]
    pub user_id: String,
}

impl fmt::Debug for AuthInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthInfo")
            .field("token", &redact(&self.token))
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Source of a fresh token, invoked once per request.
///
/// Returning `None` means "send no `Authorization` header"; it does not fall
/// back to the static token.
///
/// Any `Fn() -> Option<String>` closure is a provider:
///
/// ```
/// use probmodelseed::rpc::{Authorization, TokenProvider};
///
/// let auth = Authorization::anonymous().with_provider(|| Some("fresh".to_string()));
/// assert_eq!(auth.resolve().as_deref(), Some("fresh"));
/// ```
pub trait TokenProvider: Send + Sync {
    /// Produce the token for the next request.
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Authorization configuration of a client.
#[derive(Clone, Default)]
pub struct Authorization {
    info: AuthInfo,
    provider: Option<Arc<dyn TokenProvider>>,
}

impl Authorization {
    /// No token and no provider; requests carry no `Authorization` header.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Static token credentials.
    pub fn with_token(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::from_info(AuthInfo {
            token: token.into(),
            user_id: user_id.into(),
        })
    }

    /// Wrap an existing [`AuthInfo`] pair.
    pub fn from_info(info: AuthInfo) -> Self {
        Self {
            info,
            provider: None,
        }
    }

    /// Attach a per-request token provider. It takes precedence over the
    /// static token.
    pub fn with_provider(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// The static credentials.
    pub fn info(&self) -> &AuthInfo {
        &self.info
    }

    /// Whether a per-request provider is configured.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Decide the `Authorization` header value for one request.
    pub fn resolve(&self) -> Option<String> {
        if let Some(provider) = &self.provider {
            return provider.token();
        }
        if self.info.token.is_empty() {
            None
        } else {
            Some(self.info.token.clone())
        }
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("info", &self.info)
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

fn redact(token: &str) -> &'static str {
    if token.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_anonymous_resolves_to_no_header() {
        assert_eq!(Authorization::anonymous().resolve(), None);
    }

    #[test]
    fn test_empty_static_token_is_omitted() {
        let auth = Authorization::with_token("", "alice");
        assert_eq!(auth.resolve(), None);
    }

    #[test]
    fn test_static_token_is_used_verbatim() {
        let auth = Authorization::with_token("un=alice|tokenid=42|sig=abc", "alice");
        assert_eq!(auth.resolve().as_deref(), Some("un=alice|tokenid=42|sig=abc"));
    }

    #[test]
    fn test_provider_overrides_static_token() {
        let auth = Authorization::with_token("static", "alice")
            .with_provider(|| Some("from-provider".to_string()));
        assert_eq!(auth.resolve().as_deref(), Some("from-provider"));
    }

    #[test]
    fn test_provider_returning_none_does_not_fall_back() {
        let auth = Authorization::with_token("static", "alice").with_provider(|| None::<String>);
        assert_eq!(auth.resolve(), None);
    }

    #[test]
    fn test_provider_is_called_per_resolution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let auth = Authorization::anonymous().with_provider(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Some(format!("token-{n}"))
        });

        assert_eq!(auth.resolve().as_deref(), Some("token-0"));
        assert_eq!(auth.resolve().as_deref(), Some("token-1"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let auth = Authorization::with_token("secret-token", "alice");
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("alice"));
    }
}
