//! Credential issuance
//!
//! A credential is issued only when the requesting key is a registered
//! authority (with matching key bytes) and the attribute set passes the
//! schema. Issuance per (user, attribute-set) happens at most once.

use crate::registry::TrustRegistry;
use abhrs_core::hash::Hash32;
use abhrs_core::{
    AbhrsError, AttributeSchema, AttributeSet, CaPublicKey, Credential, CredentialId, Effects,
    Result, UserId,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Issues attribute credentials on behalf of registered authorities
pub struct CredentialIssuer {
    registry: Arc<TrustRegistry>,
    schema: AttributeSchema,
    effects: Effects,
    issued: Mutex<HashSet<(UserId, Hash32)>>,
}

impl CredentialIssuer {
    /// Create an issuer backed by `registry`
    pub fn new(registry: Arc<TrustRegistry>, schema: AttributeSchema, effects: Effects) -> Self {
        Self {
            registry,
            schema,
            effects,
            issued: Mutex::new(HashSet::new()),
        }
    }

    /// Issue a credential under `issuer_key`
    ///
    /// # Errors
    ///
    /// - `UnauthorizedIssuer` if the key is not a registered authority, has
    ///   been revoked, or its bytes differ from the registered key
    /// - `MalformedAttributes` if the attribute set fails the schema
    pub fn issue_credential(
        &self,
        issuer_key: &CaPublicKey,
        attributes: &AttributeSet,
    ) -> Result<Credential> {
        if self.registry.is_revoked(&issuer_key.id) {
            tracing::warn!(ca = %issuer_key.id, "Issuance requested by revoked authority");
            return Err(AbhrsError::unauthorized_issuer(format!(
                "{} has been revoked",
                issuer_key.id
            )));
        }
        match self.registry.authority(&issuer_key.id) {
            Some(registered) if registered == *issuer_key => {}
            Some(_) => {
                tracing::warn!(ca = %issuer_key.id, "Issuer key does not match registration");
                return Err(AbhrsError::unauthorized_issuer(format!(
                    "key presented for {} does not match the registered key",
                    issuer_key.id
                )));
            }
            None => {
                tracing::warn!(ca = %issuer_key.id, "Issuance requested by unknown authority");
                return Err(AbhrsError::unauthorized_issuer(format!(
                    "{} is not a registered authority",
                    issuer_key.id
                )));
            }
        }

        self.schema.check(attributes)?;

        let id: CredentialId = self.effects.allocate();
        let body = Credential::body_bytes(id, &issuer_key.id, attributes)?;
        let signature = self.registry.sign_as(&issuer_key.id, &body)?;

        tracing::info!(
            credential = %id,
            ca = %issuer_key.id,
            attributes = attributes.len(),
            "Issued credential"
        );

        Ok(Credential {
            id,
            issuer: issuer_key.id.clone(),
            attributes: attributes.clone(),
            signature,
        })
    }

    /// Issue a credential for `user`, at most once per attribute set
    pub fn issue_for_user(
        &self,
        issuer_key: &CaPublicKey,
        user: &UserId,
        attributes: &AttributeSet,
    ) -> Result<Credential> {
        let key = (user.clone(), attributes.digest()?);
        let mut issued = self.issued.lock();
        if issued.contains(&key) {
            return Err(AbhrsError::invalid(format!(
                "a credential for {user} with these attributes was already issued"
            )));
        }
        let credential = self.issue_credential(issuer_key, attributes)?;
        issued.insert(key);
        Ok(credential)
    }

    /// Attribute schema in force
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }
}

impl std::fmt::Debug for CredentialIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialIssuer")
            .field("schema", &self.schema)
            .field("issued", &self.issued.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abhrs_core::{CaId, RootId};
    use assert_matches::assert_matches;

    fn setup(test: &str) -> (CredentialIssuer, CaPublicKey) {
        let effects = Effects::for_test(test);
        let registry = Arc::new(TrustRegistry::new());
        registry.register_root(RootId::new("root"), &effects).unwrap();
        let ca = registry
            .register_ca(CaId::new("ca-1"), RootId::new("root"), &effects)
            .unwrap();
        let issuer = CredentialIssuer::new(registry, AttributeSchema::default(), effects);
        (issuer, ca)
    }

    #[test]
    fn test_issue_credential_allocates_unique_ids() {
        let (issuer, ca) = setup("issuer_unique_ids");
        let attrs = AttributeSet::new().with("role", "doctor");
        let a = issuer.issue_credential(&ca, &attrs).unwrap();
        let b = issuer.issue_credential(&ca, &attrs).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.issuer, CaId::new("ca-1"));
        assert_eq!(a.signature.len(), 64);
    }

    #[test]
    fn test_unknown_or_forged_issuer() {
        let (issuer, ca) = setup("issuer_forged");
        let attrs = AttributeSet::new().with("role", "doctor");

        let unknown = CaPublicKey {
            id: CaId::new("ca-9"),
            ..ca.clone()
        };
        assert_matches!(
            issuer.issue_credential(&unknown, &attrs),
            Err(AbhrsError::UnauthorizedIssuer { .. })
        );

        let mut forged = ca;
        forged.key[0] ^= 0xff;
        assert_matches!(
            issuer.issue_credential(&forged, &attrs),
            Err(AbhrsError::UnauthorizedIssuer { .. })
        );
    }

    #[test]
    fn test_malformed_attributes() {
        let (issuer, ca) = setup("issuer_malformed");
        assert_matches!(
            issuer.issue_credential(&ca, &AttributeSet::new()),
            Err(AbhrsError::MalformedAttributes { .. })
        );
    }

    #[test]
    fn test_issue_for_user_once() {
        let (issuer, ca) = setup("issuer_once");
        let attrs = AttributeSet::new().with("role", "doctor");
        let user = UserId::new("u1");
        issuer.issue_for_user(&ca, &user, &attrs).unwrap();
        assert_matches!(
            issuer.issue_for_user(&ca, &user, &attrs),
            Err(AbhrsError::Invalid { .. })
        );
        issuer
            .issue_for_user(&ca, &UserId::new("u2"), &attrs)
            .unwrap();
    }

    #[test]
    fn test_failed_issue_does_not_consume_slot() {
        let (issuer, ca) = setup("issuer_retry");
        let user = UserId::new("u1");
        let attrs = AttributeSet::new().with("role", "doctor");
        let mut bad = ca.clone();
        bad.key[0] ^= 1;
        assert!(issuer.issue_for_user(&bad, &user, &attrs).is_err());
        assert!(issuer.issue_for_user(&ca, &user, &attrs).is_ok());
    }

    #[test]
    fn test_revoked_authority_cannot_issue() {
        let (issuer, ca) = setup("issuer_revoked");
        let attrs = AttributeSet::new().with("role", "doctor");
        issuer.issue_credential(&ca, &attrs).unwrap();

        issuer.registry.revoke_ca(&ca.id).unwrap();
        assert_matches!(
            issuer.issue_credential(&ca, &attrs),
            Err(AbhrsError::UnauthorizedIssuer { .. })
        );
        assert_matches!(
            issuer.issue_for_user(&ca, &UserId::new("u1"), &attrs),
            Err(AbhrsError::UnauthorizedIssuer { .. })
        );
    }
}
