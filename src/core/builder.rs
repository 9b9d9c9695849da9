// One builder per domain action
// Each derives the exact addresses the processor will touch, encodes the payload and
// returns a single-transaction batch together with its id

use crate::core::addressing::{
    make_claim_address, make_client_address, make_clinic_address, make_consent_address,
    make_doctor_address, make_event_address, make_patient_address,
};
use crate::core::payload::{
    encode, Action, ActionOnAccess, ActionOnClaim, CreateClaim, CreateClient, CreateClinic,
    CreateDoctor, CreatePatient,
};
use crate::core::transaction::{Batch, BatchBuilder};
use crate::error::Result;
use crate::signing::Signer;

/// Addresses an action reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSets {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl Action {
    /// Minimal but complete read/write sets for this action.
    pub fn address_sets(&self) -> Result<AddressSets> {
        let (inputs, outputs) = match self {
            Action::CreateDoctor(doctor) => {
                let doctor_hex = make_doctor_address(&doctor.public_key)?;
                (vec![doctor_hex.clone()], vec![doctor_hex])
            }
            Action::CreatePatient(patient) => {
                let patient_hex = make_patient_address(&patient.public_key)?;
                (vec![patient_hex.clone()], vec![patient_hex])
            }
            Action::CreateClinic(clinic) => {
                let clinic_hex = make_clinic_address(&clinic.public_key)?;
                (vec![clinic_hex.clone()], vec![clinic_hex])
            }
            Action::CreateClaim(claim) => {
                let claim_hex = make_claim_address(&claim.claim_id, &claim.clinic_pkey)?;
                let clinic_hex = make_clinic_address(&claim.clinic_pkey)?;
                let patient_hex = make_patient_address(&claim.patient_pkey)?;
                (vec![claim_hex.clone(), clinic_hex, patient_hex], vec![claim_hex])
            }
            Action::AssignDoctor(action) => {
                let claim_hex = make_claim_address(&action.claim_id, &action.clinic_pkey)?;
                let event_hex =
                    make_event_address(&action.claim_id, &action.clinic_pkey, action.event_time)?;
                let clinic_hex = make_clinic_address(&action.clinic_pkey)?;
                (vec![claim_hex, event_hex.clone(), clinic_hex], vec![event_hex])
            }
            Action::GrantAccess(access) => {
                let consent_hex = make_consent_address(&access.doctor_pkey, &access.patient_pkey)?;
                let doctor_hex = make_doctor_address(&access.doctor_pkey)?;
                let patient_hex = make_patient_address(&access.patient_pkey)?;
                (
                    vec![consent_hex.clone(), doctor_hex, patient_hex],
                    vec![consent_hex],
                )
            }
            Action::RevokeAccess(access) => {
                let consent_hex = make_consent_address(&access.doctor_pkey, &access.patient_pkey)?;
                (vec![consent_hex.clone()], vec![consent_hex])
            }
            Action::CreateClient(client) => {
                let client_hex = make_client_address(&client.public_key)?;
                (vec![client_hex.clone()], vec![client_hex])
            }
        };
        Ok(AddressSets { inputs, outputs })
    }
}

/// Validate, address, encode and sign `action` as a one-transaction batch.
pub fn make_header_and_batch(
    action: &Action,
    txn_signer: &Signer,
    batch_signer: &Signer,
) -> Result<(Batch, String)> {
    action.validate()?;
    let AddressSets { inputs, outputs } = action.address_sets()?;
    let payload = encode(action)?;

    let mut builder = BatchBuilder::new(batch_signer);
    builder.add_transaction(payload, inputs, outputs, txn_signer)?;
    let (batch, batch_id) = builder.build()?;
    log::debug!(
        "Built {:?} batch {batch_id}",
        action.payload_type()
    );
    Ok((batch, batch_id))
}

/// Enrol the transacting key as a doctor.
pub fn create_doctor(
    txn_signer: &Signer,
    batch_signer: &Signer,
    name: &str,
    surname: &str,
) -> Result<(Batch, String)> {
    let action = Action::CreateDoctor(CreateDoctor {
        public_key: txn_signer.public_key_hex(),
        name: name.to_string(),
        surname: surname.to_string(),
    });
    make_header_and_batch(&action, txn_signer, batch_signer)
}

/// Enrol the transacting key as a patient.
pub fn create_patient(
    txn_signer: &Signer,
    batch_signer: &Signer,
    name: &str,
    surname: &str,
) -> Result<(Batch, String)> {
    let action = Action::CreatePatient(CreatePatient {
        public_key: txn_signer.public_key_hex(),
        name: name.to_string(),
        surname: surname.to_string(),
    });
    make_header_and_batch(&action, txn_signer, batch_signer)
}

/// Register the transacting key as a clinic.
pub fn create_clinic(
    txn_signer: &Signer,
    batch_signer: &Signer,
    name: &str,
) -> Result<(Batch, String)> {
    let action = Action::CreateClinic(CreateClinic {
        public_key: txn_signer.public_key_hex(),
        name: name.to_string(),
    });
    make_header_and_batch(&action, txn_signer, batch_signer)
}

/// File a claim; the transacting key is the clinic.
pub fn register_claim(
    txn_signer: &Signer,
    batch_signer: &Signer,
    claim_id: &str,
    patient_pkey: &str,
) -> Result<(Batch, String)> {
    let action = Action::CreateClaim(CreateClaim {
        claim_id: claim_id.to_string(),
        clinic_pkey: txn_signer.public_key_hex(),
        patient_pkey: patient_pkey.to_string(),
    });
    make_header_and_batch(&action, txn_signer, batch_signer)
}

/// Record a doctor assignment on a claim; the transacting key is the clinic.
pub fn assign_doctor(
    txn_signer: &Signer,
    batch_signer: &Signer,
    claim_id: &str,
    description: &str,
    event_time: u64,
) -> Result<(Batch, String)> {
    let action = Action::AssignDoctor(ActionOnClaim {
        claim_id: claim_id.to_string(),
        clinic_pkey: txn_signer.public_key_hex(),
        description: description.to_string(),
        event_time,
    });
    make_header_and_batch(&action, txn_signer, batch_signer)
}

/// Grant a doctor access to the transacting patient's records.
pub fn grant_access(
    txn_signer: &Signer,
    batch_signer: &Signer,
    doctor_pkey: &str,
) -> Result<(Batch, String)> {
    let action = Action::GrantAccess(ActionOnAccess {
        doctor_pkey: doctor_pkey.to_string(),
        patient_pkey: txn_signer.public_key_hex(),
    });
    make_header_and_batch(&action, txn_signer, batch_signer)
}

/// Withdraw a doctor's access to the transacting patient's records.
pub fn revoke_access(
    txn_signer: &Signer,
    batch_signer: &Signer,
    doctor_pkey: &str,
) -> Result<(Batch, String)> {
    let action = Action::RevokeAccess(ActionOnAccess {
        doctor_pkey: doctor_pkey.to_string(),
        patient_pkey: txn_signer.public_key_hex(),
    });
    make_header_and_batch(&action, txn_signer, batch_signer)
}

pub fn create_client(
    txn_signer: &Signer,
    batch_signer: &Signer,
    name: &str,
) -> Result<(Batch, String)> {
    let action = Action::CreateClient(CreateClient {
        public_key: txn_signer.public_key_hex(),
        name: name.to_string(),
    });
    make_header_and_batch(&action, txn_signer, batch_signer)
}
