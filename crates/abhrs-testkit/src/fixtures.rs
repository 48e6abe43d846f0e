//! Scenario fixtures
//!
//! [`ProtocolFixture`] stands up one root, one or more authorities, a
//! credential issuer and a capability backend from a deterministic seed
//! derived from the test name. [`ProtocolFixture::enroll`] then produces a
//! user with a credential and a full certificate chain.

use abhrs_core::{
    AttributeSchema, AttributeSet, CaId, CaPublicKey, Certificate, CertificateChain, Credential,
    Effects, Result, Ring, RootId, Theta, TrustAnchorSet, UserId,
};
use abhrs_crypto::ProtocolBackend;
use abhrs_protocol::{
    build_ring, CredentialIssuer, EpochSigner, SignatureVerifier, TrustRegistry, User,
};
use std::sync::Arc;

/// Which capability backend a fixture uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Deterministic symbolic doubles
    #[default]
    Symbolic,
    /// Keyed commitments and Ed25519-backed proofs and ring signatures
    Attested,
}

/// Builder for [`ProtocolFixture`]
#[derive(Debug, Clone)]
pub struct ProtocolFixtureBuilder {
    name: String,
    authorities: Vec<CaId>,
    backend: BackendKind,
    schema: AttributeSchema,
    theta: Theta,
}

impl ProtocolFixtureBuilder {
    /// Register these authorities instead of the single default `ca-1`
    pub fn with_authorities(mut self, ids: &[&str]) -> Self {
        self.authorities = ids.iter().map(|id| CaId::new(*id)).collect();
        self
    }

    /// Use the attested backend
    pub fn attested(mut self) -> Self {
        self.backend = BackendKind::Attested;
        self
    }

    /// Override the attribute schema
    pub fn with_schema(mut self, schema: AttributeSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Override the initial parameter vector
    pub fn with_theta(mut self, theta: Theta) -> Self {
        self.theta = theta;
        self
    }

    /// Register everything and return the fixture
    pub fn build(self) -> Result<ProtocolFixture> {
        let effects = Effects::for_test(&self.name);
        let registry = Arc::new(TrustRegistry::new());
        let root = RootId::new("root-1");
        registry.register_root(root.clone(), &effects)?;

        let authorities = self
            .authorities
            .into_iter()
            .map(|ca| registry.register_ca(ca, root.clone(), &effects))
            .collect::<Result<Vec<_>>>()?;

        let backend = match self.backend {
            BackendKind::Symbolic => ProtocolBackend::symbolic(),
            BackendKind::Attested => ProtocolBackend::attested(&effects),
        };
        let issuer = CredentialIssuer::new(registry.clone(), self.schema, effects.clone());

        Ok(ProtocolFixture {
            effects,
            registry,
            issuer,
            backend,
            root,
            authorities,
            theta: self.theta,
        })
    }
}

/// User enrolled under an authority, with credential and chain
#[derive(Debug, Clone)]
pub struct EnrolledUser {
    /// The user, holding the live epoch secret
    pub user: User,
    /// Authority that issued the credential
    pub ca_key: CaPublicKey,
    /// Credential over the user's attributes
    pub credential: Credential,
    /// Leaf certificate for the user's ring key
    pub leaf: Certificate,
    /// Leaf-to-root chain
    pub chain: CertificateChain,
}

/// Registry, issuer and backend ready for protocol tests
#[derive(Debug)]
pub struct ProtocolFixture {
    /// Deterministic effects seeded from the test name
    pub effects: Effects,
    /// Trust registry
    pub registry: Arc<TrustRegistry>,
    /// Credential issuer over the registry
    pub issuer: CredentialIssuer,
    /// Capability backend
    pub backend: ProtocolBackend,
    /// The single trust root
    pub root: RootId,
    /// Registered authorities in registration order
    pub authorities: Vec<CaPublicKey>,
    /// Parameter vector used by `ring_for`
    pub theta: Theta,
}

impl ProtocolFixture {
    /// Start a builder seeded from `test_name`
    pub fn builder(test_name: &str) -> ProtocolFixtureBuilder {
        ProtocolFixtureBuilder {
            name: test_name.to_string(),
            authorities: vec![CaId::new("ca-1")],
            backend: BackendKind::default(),
            schema: AttributeSchema::default(),
            theta: Theta::new(4, 0.5),
        }
    }

    /// First registered authority
    pub fn ca(&self) -> &CaPublicKey {
        &self.authorities[0]
    }

    /// Authority by id
    pub fn ca_named(&self, id: &str) -> Option<&CaPublicKey> {
        self.authorities.iter().find(|ca| ca.id.as_str() == id)
    }

    /// Enroll under the first authority
    pub fn enroll(&self, user: &str, attributes: AttributeSet) -> Result<EnrolledUser> {
        self.enroll_with(self.ca(), user, attributes)
    }

    /// Enroll under `ca_key`: key, credential, leaf and chain
    pub fn enroll_with(
        &self,
        ca_key: &CaPublicKey,
        user: &str,
        attributes: AttributeSet,
    ) -> Result<EnrolledUser> {
        let user = User::enroll(
            UserId::new(user),
            attributes,
            ca_key.id.clone(),
            &self.effects,
        );
        let credential = self
            .issuer
            .issue_for_user(ca_key, &user.id, &user.attributes)?;
        let leaf = self.registry.certify_user(&ca_key.id, &user.public_key)?;
        let chain = self.registry.chain_for(&leaf)?;
        Ok(EnrolledUser {
            user,
            ca_key: ca_key.clone(),
            credential,
            leaf,
            chain,
        })
    }

    /// Current trust anchors
    pub fn anchors(&self) -> TrustAnchorSet {
        self.registry.anchor_set()
    }

    /// Signer over the fixture backend
    pub fn signer(&self) -> EpochSigner {
        EpochSigner::new(self.backend.clone(), self.effects.clone())
    }

    /// Verifier over the fixture backend
    pub fn verifier(&self) -> SignatureVerifier {
        SignatureVerifier::new(self.backend.clone())
    }

    /// Ring over the given users, padded to the fixture theta
    pub fn ring_for(&self, users: &[&EnrolledUser]) -> Ring {
        let honest: Vec<_> = users.iter().map(|u| u.user.public_key.clone()).collect();
        build_ring(&self.theta, &honest, &self.effects)
    }
}
