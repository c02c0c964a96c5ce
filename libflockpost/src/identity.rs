//! Identity-verification boundary
//!
//! The hosted sign-in flow lives outside this crate; what remains here is
//! the seam it plugs into. A verifier takes a bearer credential and
//! answers with the verified [`Principal`] or a typed rejection. The
//! crate never issues, refreshes, or stores these credentials.

use async_trait::async_trait;

use crate::error::IdentityError;
use crate::types::Principal;

/// Verifies a bearer credential against an identity provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve a credential to its principal.
    ///
    /// # Errors
    ///
    /// `InvalidCredential` or `Expired` for rejected credentials,
    /// `Transport` when the provider cannot be reached.
    async fn verify(&self, credential: &str) -> std::result::Result<Principal, IdentityError>;
}

/// Table-driven verifier for tests and local development.
///
/// Knows a fixed set of credentials; everything else is rejected.
#[derive(Default)]
pub struct StaticVerifier {
    principals: Vec<(String, Principal)>,
}

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credential and the principal it resolves to.
    pub fn allow(mut self, credential: &str, principal: Principal) -> Self {
        self.principals.push((credential.to_string(), principal));
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, credential: &str) -> std::result::Result<Principal, IdentityError> {
        self.principals
            .iter()
            .find(|(known, _)| known == credential)
            .map(|(_, principal)| principal.clone())
            .ok_or_else(|| IdentityError::InvalidCredential("unknown credential".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(display_name: &str) -> Principal {
        Principal {
            id: "u_1".to_string(),
            email: "op@example.com".to_string(),
            display_name: display_name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_known_credential_resolves() {
        let verifier = StaticVerifier::new().allow("tok-abc", principal("Operator"));

        let resolved = verifier.verify("tok-abc").await.unwrap();
        assert_eq!(resolved.display_name, "Operator");
        assert_eq!(resolved.email, "op@example.com");
    }

    #[tokio::test]
    async fn test_unknown_credential_is_rejected() {
        let verifier = StaticVerifier::new().allow("tok-abc", principal("Operator"));

        assert_eq!(
            verifier.verify("tok-forged").await,
            Err(IdentityError::InvalidCredential(
                "unknown credential".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_empty_table_rejects_everything() {
        let verifier = StaticVerifier::new();
        assert!(verifier.verify("anything").await.is_err());
    }
}
