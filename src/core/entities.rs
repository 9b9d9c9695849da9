// Records the processor stores at entity addresses
// They travel through the same bincode codec as payloads and print as JSON in the CLI

use crate::core::addressing::{
    make_claim_address, make_client_address, make_clinic_address, make_consent_address,
    make_doctor_address, make_event_address, make_patient_address,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Clinic {
    pub public_key: String,
    pub name: String,
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Doctor {
    pub public_key: String,
    pub name: String,
    pub surname: String,
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Patient {
    pub public_key: String,
    pub name: String,
    pub surname: String,
}

/// A claim filed by a clinic on behalf of a patient.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Claim {
    pub claim_id: String,
    pub clinic_pkey: String,
    pub patient_pkey: String,
}

/// An action recorded against a claim at a point in time (doctor assignment).
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct ClaimEvent {
    pub claim_id: String,
    pub clinic_pkey: String,
    pub description: String,
    pub event_time: u64,
}

/// Consent from a patient for a doctor to read their claim data.
///
/// Revocation flips `granted` rather than deleting the record.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Consent {
    pub doctor_pkey: String,
    pub patient_pkey: String,
    pub granted: bool,
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Client {
    pub public_key: String,
    pub name: String,
}

impl Clinic {
    pub fn address(&self) -> Result<String> {
        make_clinic_address(&self.public_key)
    }
}

impl Doctor {
    pub fn address(&self) -> Result<String> {
        make_doctor_address(&self.public_key)
    }
}

impl Patient {
    pub fn address(&self) -> Result<String> {
        make_patient_address(&self.public_key)
    }
}

impl Claim {
    pub fn address(&self) -> Result<String> {
        make_claim_address(&self.claim_id, &self.clinic_pkey)
    }
}

impl ClaimEvent {
    pub fn address(&self) -> Result<String> {
        make_event_address(&self.claim_id, &self.clinic_pkey, self.event_time)
    }
}

impl Consent {
    pub fn address(&self) -> Result<String> {
        make_consent_address(&self.doctor_pkey, &self.patient_pkey)
    }
}

impl Client {
    pub fn address(&self) -> Result<String> {
        make_client_address(&self.public_key)
    }
}
