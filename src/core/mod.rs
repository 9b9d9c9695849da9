//! Core ledger functionality
//!
//! State addressing, the payload codec, stored entity records and the
//! signed transaction/batch envelopes with their per-action builders.

pub mod addressing;
pub mod builder;
pub mod entities;
pub mod payload;
pub mod transaction;

pub use addressing::{
    address, claim_events_prefix, clinic_claims_prefix, is_family_address, list_address,
    make_claim_address, make_client_address, make_clinic_address, make_consent_address,
    make_doctor_address, make_event_address, make_patient_address, patient_consents_prefix,
    EntityKind, ADDRESS_LENGTH, FAMILY_NAME, FAMILY_VERSION, NAMESPACE,
};
pub use builder::{
    assign_doctor, create_client, create_clinic, create_doctor, create_patient, grant_access,
    make_header_and_batch, register_claim, revoke_access, AddressSets,
};
pub use entities::{Claim, ClaimEvent, Client, Clinic, Consent, Doctor, Patient};
pub use payload::{
    decode, decode_action, encode, Action, ActionOnAccess, ActionOnClaim, CreateClaim,
    CreateClient, CreateClinic, CreateDoctor, CreatePatient, PayloadType, TransactionPayload,
};
pub use transaction::{
    Batch, BatchBuilder, BatchHeader, BatchList, Transaction, TransactionHeader, NONCE_LEN,
};
