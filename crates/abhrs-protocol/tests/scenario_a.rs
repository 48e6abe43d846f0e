//! End-to-end: issue, validate, build ring, sign, verify

use abhrs_core::{AttributeSet, Theta};
use abhrs_crypto::evolve_key;
use abhrs_protocol::{build_ring, validate_chain, Policy};
use abhrs_testkit::{init_test_tracing, ProtocolFixture};

fn doctor_attributes() -> AttributeSet {
    AttributeSet::new()
        .with("role", "doctor")
        .with("dept", "cardio")
}

fn run_scenario(fixture: ProtocolFixture) {
    let theta = Theta::new(4, 0.5);
    let policy = Policy::attribute_equals("doctors-only".into(), "role", "doctor");
    let u1 = fixture.enroll("u1", doctor_attributes()).unwrap();
    let anchors = fixture.anchors();

    // Chain validation against the next epoch's commitment
    let next_secret = evolve_key(u1.user.secret(), &theta).unwrap();
    let commitment = fixture
        .backend
        .commitments
        .commit(&next_secret, &fixture.effects)
        .unwrap();
    assert!(validate_chain(
        &anchors,
        &policy,
        &commitment,
        &u1.user.attributes,
        &u1.credential,
        &u1.chain,
        &next_secret,
        fixture.backend.commitments.as_ref(),
    ));

    let ring = build_ring(&theta, &[u1.user.public_key.clone()], &fixture.effects);
    assert_eq!(ring.len(), 4);
    assert_eq!(ring.decoy_count(), 3);
    assert!(ring.contains(u1.user.public_key.id));

    let transcript = fixture
        .signer()
        .sign_epoch(
            &theta,
            &u1.ca_key,
            u1.user.secret(),
            &u1.user.attributes,
            &u1.credential,
            &ring,
            b"read_record_patient_001",
            &policy,
        )
        .unwrap();

    let verifier = fixture.verifier();
    assert!(verifier.verify_signature(
        &theta,
        b"read_record_patient_001",
        &transcript,
        &policy,
        &anchors,
    ));
    assert!(!verifier.verify_signature(
        &theta,
        b"update_record_patient_001",
        &transcript,
        &policy,
        &anchors,
    ));
}

#[test]
fn scenario_a_symbolic_backend() {
    init_test_tracing();
    run_scenario(ProtocolFixture::builder("scenario_a_symbolic").build().unwrap());
}

#[test]
fn scenario_a_attested_backend() {
    init_test_tracing();
    run_scenario(
        ProtocolFixture::builder("scenario_a_attested")
            .attested()
            .build()
            .unwrap(),
    );
}
