//! Test utilities for ledger testing

use crate::core::builder;
use crate::error::{LedgerError, Result};
use crate::signing::Signer;
use crate::storage::{LocalLedger, MemoryStore, SledStore};
use tempfile::TempDir;

/// Keys enrolled on a fixture ledger
pub struct TestParticipants {
    pub clinic: Signer,
    pub doctor: Signer,
    pub patient: Signer,
}

/// Create a temporary directory for testing
pub fn create_temp_dir() -> Result<TempDir> {
    tempfile::tempdir().map_err(|e| LedgerError::Io(e.to_string()))
}

/// Create an empty ledger over an in-memory store
pub fn create_test_ledger() -> LocalLedger<MemoryStore> {
    LocalLedger::new(MemoryStore::new())
}

/// Create an empty ledger over a sled store in a temporary directory
pub fn create_sled_ledger() -> Result<(LocalLedger<SledStore>, TempDir)> {
    let temp_dir = create_temp_dir()?;
    let store = SledStore::open(temp_dir.path().join("state"))?;
    Ok((LocalLedger::new(store), temp_dir))
}

/// Create one clinic, one doctor and one patient, each self-batched
pub fn enroll_participants(ledger: &LocalLedger<MemoryStore>) -> Result<TestParticipants> {
    let participants = TestParticipants {
        clinic: Signer::new()?,
        doctor: Signer::new()?,
        patient: Signer::new()?,
    };

    let (batch, _) =
        builder::create_clinic(&participants.clinic, &participants.clinic, "Acme Clinic")?;
    ledger.submit_batch(&batch)?;
    let (batch, _) = builder::create_doctor(
        &participants.doctor,
        &participants.doctor,
        "Gregory",
        "House",
    )?;
    ledger.submit_batch(&batch)?;
    let (batch, _) = builder::create_patient(
        &participants.patient,
        &participants.patient,
        "John",
        "Doe",
    )?;
    ledger.submit_batch(&batch)?;

    Ok(participants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{list_address, Doctor, EntityKind, Patient};

    #[test]
    fn test_enroll_participants() {
        let ledger = create_test_ledger();
        let participants = enroll_participants(&ledger).unwrap();
        assert_eq!(ledger.get_store().len(), 3);

        let doctors: Vec<Doctor> = ledger.list(&list_address(EntityKind::Doctor)).unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].public_key, participants.doctor.public_key_hex());

        let patients: Vec<Patient> = ledger.list(&list_address(EntityKind::Patient)).unwrap();
        assert_eq!(patients[0].surname, "Doe");
    }

    #[test]
    fn test_create_sled_ledger() {
        let (ledger, _temp_dir) = create_sled_ledger().unwrap();
        let clinic = Signer::new().unwrap();
        let (batch, _) = builder::create_clinic(&clinic, &clinic, "Acme Clinic").unwrap();
        ledger.submit_batch(&batch).unwrap();
        assert_eq!(
            ledger
                .list::<crate::core::Clinic>(&list_address(EntityKind::Clinic))
                .unwrap()
                .len(),
            1
        );
    }
}
