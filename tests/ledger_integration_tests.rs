//! Ledger integration tests
//!
//! Drives signed batches from the builders through a local ledger and checks
//! the resulting state, covering the end-to-end flows a clinic, a doctor and
//! a patient go through.

use medclaim_chain::core::{
    builder, claim_events_prefix, clinic_claims_prefix, list_address, make_claim_address,
    make_clinic_address, make_consent_address, make_doctor_address, make_event_address,
    patient_consents_prefix, Claim, ClaimEvent, Clinic, Consent, Doctor, EntityKind,
    ADDRESS_LENGTH, NAMESPACE,
};
use medclaim_chain::{
    verify_signature, BatchList, BatchStatus, LedgerError, LocalLedger, MemoryStore, Signer,
    SledStore,
};
use tempfile::tempdir;

fn enroll(ledger: &LocalLedger<MemoryStore>) -> (Signer, Signer, Signer) {
    let clinic = Signer::new().unwrap();
    let doctor = Signer::new().unwrap();
    let patient = Signer::new().unwrap();

    let (batch, _) = builder::create_clinic(&clinic, &clinic, "Acme Clinic").unwrap();
    ledger.submit_batch(&batch).unwrap();
    let (batch, _) = builder::create_doctor(&doctor, &doctor, "Gregory", "House").unwrap();
    ledger.submit_batch(&batch).unwrap();
    let (batch, _) = builder::create_patient(&patient, &patient, "John", "Doe").unwrap();
    ledger.submit_batch(&batch).unwrap();

    (clinic, doctor, patient)
}

#[test]
fn test_clinic_files_claim_and_assigns_doctor() {
    let ledger = LocalLedger::new(MemoryStore::new());
    let (clinic, _doctor, patient) = enroll(&ledger);
    let clinic_pkey = clinic.public_key_hex();

    let clinic_record: Clinic = ledger
        .get(&make_clinic_address(&clinic_pkey).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(
        clinic_record,
        Clinic {
            public_key: clinic_pkey.clone(),
            name: "Acme Clinic".to_string(),
        }
    );

    let (batch, _) =
        builder::register_claim(&clinic, &clinic, "claim-1", &patient.public_key_hex()).unwrap();
    ledger.submit_batch(&batch).unwrap();

    let claim: Claim = ledger
        .get(&make_claim_address("claim-1", &clinic_pkey).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(claim.patient_pkey, patient.public_key_hex());
    let claims: Vec<Claim> = ledger
        .list(&clinic_claims_prefix(&clinic_pkey).unwrap())
        .unwrap();
    assert_eq!(claims, vec![claim]);

    let (batch, _) =
        builder::assign_doctor(&clinic, &clinic, "claim-1", "Assigned Dr. House", 1_700_000_000)
            .unwrap();
    ledger.submit_batch(&batch).unwrap();

    let event: ClaimEvent = ledger
        .get(&make_event_address("claim-1", &clinic_pkey, 1_700_000_000).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(event.description, "Assigned Dr. House");
    let events: Vec<ClaimEvent> = ledger
        .list(&claim_events_prefix("claim-1", &clinic_pkey).unwrap())
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[test]
fn test_grant_then_revoke_leaves_no_active_consent() {
    let ledger = LocalLedger::new(MemoryStore::new());
    let (_clinic, doctor, patient) = enroll(&ledger);
    let doctor_pkey = doctor.public_key_hex();
    let consent_hex = make_consent_address(&doctor_pkey, &patient.public_key_hex()).unwrap();

    let (batch, _) = builder::grant_access(&patient, &patient, &doctor_pkey).unwrap();
    ledger.submit_batch(&batch).unwrap();
    let consent: Consent = ledger.get(&consent_hex).unwrap().unwrap();
    assert!(consent.granted);

    let (batch, _) = builder::revoke_access(&patient, &patient, &doctor_pkey).unwrap();
    ledger.submit_batch(&batch).unwrap();

    let consents: Vec<Consent> = ledger
        .list(&patient_consents_prefix(&patient.public_key_hex()).unwrap())
        .unwrap();
    assert_eq!(consents.len(), 1);
    assert!(consents.iter().all(|c| !c.granted));

    // A second revoke has nothing left to withdraw
    let (batch, _) = builder::revoke_access(&patient, &patient, &doctor_pkey).unwrap();
    assert!(matches!(
        ledger.submit_batch(&batch),
        Err(LedgerError::InvalidTransaction(_))
    ));

    // Access can be granted again after a revoke
    let (batch, _) = builder::grant_access(&patient, &patient, &doctor_pkey).unwrap();
    ledger.submit_batch(&batch).unwrap();
    let consent: Consent = ledger.get(&consent_hex).unwrap().unwrap();
    assert!(consent.granted);
}

#[test]
fn test_second_create_doctor_leaves_state_unchanged() {
    let ledger = LocalLedger::new(MemoryStore::new());
    let doctor = Signer::new().unwrap();

    let (first, _) = builder::create_doctor(&doctor, &doctor, "Gregory", "House").unwrap();
    ledger.submit_batch(&first).unwrap();
    let before = ledger.get_store().snapshot();

    let (second, second_id) =
        builder::create_doctor(&doctor, &doctor, "Gregory", "Impostor").unwrap();
    match ledger.submit_batch(&second) {
        Err(LedgerError::InvalidTransaction(reason)) => assert!(reason.contains("Doctor")),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(matches!(
        ledger.batch_status(&second_id),
        Some(BatchStatus::Invalid { .. })
    ));
    assert_eq!(ledger.get_store().snapshot(), before);

    let stored: Doctor = ledger
        .get(&make_doctor_address(&doctor.public_key_hex()).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.surname, "House");
}

#[test]
fn test_claim_for_unknown_patient_is_rejected() {
    let ledger = LocalLedger::new(MemoryStore::new());
    let clinic = Signer::new().unwrap();
    let stranger = Signer::new().unwrap();
    let (batch, _) = builder::create_clinic(&clinic, &clinic, "Acme Clinic").unwrap();
    ledger.submit_batch(&batch).unwrap();

    let (batch, _) =
        builder::register_claim(&clinic, &clinic, "claim-1", &stranger.public_key_hex()).unwrap();
    match ledger.submit_batch(&batch) {
        Err(LedgerError::InvalidTransaction(reason)) => assert!(reason.contains("Patient")),
        other => panic!("expected rejection, got {other:?}"),
    }
    let claims: Vec<Claim> = ledger.list(&list_address(EntityKind::Claim)).unwrap();
    assert!(claims.is_empty());
}

#[test]
fn test_exported_batch_list_verifies_and_applies() {
    let clinic = Signer::new().unwrap();
    let batcher = Signer::new().unwrap();
    let (batch, batch_id) = builder::create_clinic(&clinic, &batcher, "Acme Clinic").unwrap();
    assert!(verify_signature(
        &batcher.public_key_hex(),
        &batch_id,
        batch.get_header_bytes()
    ));

    let bytes = BatchList {
        batches: vec![batch],
    }
    .serialize()
    .unwrap();
    let batch_list = BatchList::deserialize(&bytes).unwrap();

    let ledger = LocalLedger::new(MemoryStore::new());
    let statuses = ledger.submit_batch_list(&batch_list);
    assert_eq!(statuses, vec![(batch_id, BatchStatus::Committed)]);
}

#[test]
fn test_addresses_are_deterministic_and_disjoint() {
    let clinic = Signer::new().unwrap().public_key_hex();
    let patient = Signer::new().unwrap().public_key_hex();

    let claim_hex = make_claim_address("claim-1", &clinic).unwrap();
    assert_eq!(claim_hex, make_claim_address("claim-1", &clinic).unwrap());
    assert_eq!(claim_hex.len(), ADDRESS_LENGTH);
    assert!(claim_hex.starts_with(NAMESPACE.as_str()));

    let addresses = [
        make_clinic_address(&clinic).unwrap(),
        make_doctor_address(&clinic).unwrap(),
        claim_hex,
        make_claim_address("claim-2", &clinic).unwrap(),
        make_consent_address(&clinic, &patient).unwrap(),
    ];
    for (i, a) in addresses.iter().enumerate() {
        for b in &addresses[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_sled_ledger_persists_across_reopen() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("state");
    let clinic = Signer::new().unwrap();

    {
        let ledger = LocalLedger::new(SledStore::open(&path).unwrap());
        let (batch, _) = builder::create_clinic(&clinic, &clinic, "Acme Clinic").unwrap();
        ledger.submit_batch(&batch).unwrap();
        ledger.get_store().flush().unwrap();
    }

    let ledger = LocalLedger::new(SledStore::open(&path).unwrap());
    let clinics: Vec<Clinic> = ledger.list(&list_address(EntityKind::Clinic)).unwrap();
    assert_eq!(clinics.len(), 1);
    assert_eq!(clinics[0].public_key, clinic.public_key_hex());
}
