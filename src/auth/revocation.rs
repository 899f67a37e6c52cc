//! In-memory registry of revoked token ids.
//!
//! Revocations are not persisted: a process restart clears the registry and
//! silently re-activates revoked-but-unexpired tokens. See DESIGN.md.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Process-wide set of revoked token ids (`jti`), keyed with the token's
/// expiry timestamp so entries can be swept once the token would have
/// expired on its own.
///
/// Shared between request handlers behind an `Arc`; all methods take `&self`.
#[derive(Debug, Default)]
pub struct RevocationRegistry {
    revoked: RwLock<HashMap<String, i64>>,
}

impl RevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a token id as revoked. Idempotent: revoking an already-revoked
    /// jti is a no-op and keeps the original expiry timestamp.
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        let mut revoked = self
            .revoked
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        revoked.entry(jti.to_string()).or_insert(expires_at);
    }

    /// Check whether a token id has been revoked.
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(jti)
    }

    /// Drop entries whose token has expired on its own. Returns the number
    /// of entries removed.
    pub fn prune_expired(&self, now: i64) -> usize {
        let mut revoked = self
            .revoked
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = revoked.len();
        revoked.retain(|_, expires_at| *expires_at > now);
        before - revoked.len()
    }

    /// Number of currently tracked revocations.
    pub fn len(&self) -> usize {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_jti_is_not_revoked() {
        let registry = RevocationRegistry::new();
        assert!(!registry.is_revoked("some-jti"));
        assert!(registry.is_empty());
    }

    #[test]
    fn revoke_is_monotonic() {
        let registry = RevocationRegistry::new();
        registry.revoke("jti-1", 1000);
        assert!(registry.is_revoked("jti-1"));
        // Stays revoked on repeated checks.
        assert!(registry.is_revoked("jti-1"));
        assert!(!registry.is_revoked("jti-2"));
    }

    #[test]
    fn revoke_twice_is_a_noop() {
        let registry = RevocationRegistry::new();
        registry.revoke("jti-1", 1000);
        registry.revoke("jti-1", 9999);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_revoked("jti-1"));
        // The original expiry wins, so the entry is swept at its real expiry.
        assert_eq!(registry.prune_expired(1000), 1);
        assert!(!registry.is_revoked("jti-1"));
    }

    #[test]
    fn prune_removes_only_expired_entries() {
        let registry = RevocationRegistry::new();
        registry.revoke("expired", 100);
        registry.revoke("expires-now", 200);
        registry.revoke("active", 300);
        assert_eq!(registry.prune_expired(200), 2);
        assert!(!registry.is_revoked("expired"));
        assert!(!registry.is_revoked("expires-now"));
        assert!(registry.is_revoked("active"));
    }

    #[test]
    fn prune_on_empty_registry() {
        let registry = RevocationRegistry::new();
        assert_eq!(registry.prune_expired(1_000_000), 0);
    }
}
