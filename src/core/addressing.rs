// State addressing for the healthcare family
// Every address is NAMESPACE (6 hex) + kind code (2 hex) + a 62 hex body built from
// per-field SHA-512 digests, so addresses are reproducible by any implementation

use crate::error::{LedgerError, Result};
use crate::utils::sha512_hex;
use once_cell::sync::Lazy;
use std::fmt;

pub const FAMILY_NAME: &str = "healthcare";
pub const FAMILY_VERSION: &str = "1.0";

/// Total length of a state address in hex characters.
pub const ADDRESS_LENGTH: usize = 70;
const NAMESPACE_LENGTH: usize = 6;
const BODY_LENGTH: usize = ADDRESS_LENGTH - NAMESPACE_LENGTH - 2;

/// First six hex characters of SHA-512 over the family name.
pub static NAMESPACE: Lazy<String> =
    Lazy::new(|| sha512_hex(FAMILY_NAME.as_bytes())[..NAMESPACE_LENGTH].to_string());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Clinic,
    Doctor,
    Patient,
    Claim,
    Event,
    Consent,
    Client,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Clinic,
        EntityKind::Doctor,
        EntityKind::Patient,
        EntityKind::Claim,
        EntityKind::Event,
        EntityKind::Consent,
        EntityKind::Client,
    ];

    /// Two-character sub-prefix that keeps each kind in its own address space.
    pub fn code(&self) -> &'static str {
        match self {
            EntityKind::Clinic => "01",
            EntityKind::Doctor => "02",
            EntityKind::Patient => "03",
            EntityKind::Claim => "04",
            EntityKind::Event => "05",
            EntityKind::Consent => "06",
            EntityKind::Client => "07",
        }
    }

    /// Identity fields in the order `address` expects them.
    pub fn identity_fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Clinic | EntityKind::Doctor | EntityKind::Patient | EntityKind::Client => {
                &["public_key"]
            }
            EntityKind::Claim => &["claim_id", "clinic_pkey"],
            EntityKind::Event => &["claim_id", "clinic_pkey", "event_time"],
            EntityKind::Consent => &["doctor_pkey", "patient_pkey"],
        }
    }

    // Digest segment widths per identity field, summing to BODY_LENGTH
    fn segments(&self) -> &'static [usize] {
        match self {
            EntityKind::Clinic | EntityKind::Doctor | EntityKind::Patient | EntityKind::Client => {
                &[62]
            }
            EntityKind::Claim => &[30, 32],
            EntityKind::Event => &[20, 20, 22],
            EntityKind::Consent => &[30, 32],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Clinic => "clinic",
            EntityKind::Doctor => "doctor",
            EntityKind::Patient => "patient",
            EntityKind::Claim => "claim",
            EntityKind::Event => "event",
            EntityKind::Consent => "consent",
            EntityKind::Client => "client",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid entity kind: {s}. Valid options: clinic, doctor, patient, claim, event, consent, client"
                )
            })
    }
}

/// Derive the state address of an entity from its identity fields.
///
/// `fields` follow [`EntityKind::identity_fields`]. Claim and event fields are
/// hashed with the clinic key first so that per-clinic and per-claim prefixes
/// enumerate their children; consents lead with the patient key for the same reason.
pub fn address(kind: EntityKind, fields: &[&str]) -> Result<String> {
    let names = kind.identity_fields();
    if fields.len() != names.len() {
        return Err(LedgerError::InvalidInput(format!(
            "{kind} address takes {} identity fields, got {}",
            names.len(),
            fields.len()
        )));
    }
    for (name, value) in names.iter().zip(fields) {
        if value.is_empty() {
            return Err(LedgerError::InvalidInput(format!(
                "{kind} {name} must not be empty"
            )));
        }
    }

    let ordered: Vec<&str> = match kind {
        EntityKind::Claim => vec![fields[1], fields[0]],
        EntityKind::Event => vec![fields[1], fields[0], fields[2]],
        EntityKind::Consent => vec![fields[1], fields[0]],
        _ => fields.to_vec(),
    };

    debug_assert_eq!(kind.segments().iter().sum::<usize>(), BODY_LENGTH);
    let mut address = list_address(kind);
    for (value, width) in ordered.iter().zip(kind.segments()) {
        address.push_str(&sha512_hex(value.as_bytes())[..*width]);
    }
    debug_assert_eq!(address.len(), ADDRESS_LENGTH);
    Ok(address)
}

/// Prefix under which every entity of `kind` lives.
pub fn list_address(kind: EntityKind) -> String {
    format!("{}{}", NAMESPACE.as_str(), kind.code())
}

pub fn make_clinic_address(clinic_pkey: &str) -> Result<String> {
    address(EntityKind::Clinic, &[clinic_pkey])
}

pub fn make_doctor_address(doctor_pkey: &str) -> Result<String> {
    address(EntityKind::Doctor, &[doctor_pkey])
}

pub fn make_patient_address(patient_pkey: &str) -> Result<String> {
    address(EntityKind::Patient, &[patient_pkey])
}

pub fn make_client_address(client_pkey: &str) -> Result<String> {
    address(EntityKind::Client, &[client_pkey])
}

pub fn make_claim_address(claim_id: &str, clinic_pkey: &str) -> Result<String> {
    address(EntityKind::Claim, &[claim_id, clinic_pkey])
}

pub fn make_event_address(claim_id: &str, clinic_pkey: &str, event_time: u64) -> Result<String> {
    address(
        EntityKind::Event,
        &[claim_id, clinic_pkey, &event_time.to_string()],
    )
}

pub fn make_consent_address(doctor_pkey: &str, patient_pkey: &str) -> Result<String> {
    address(EntityKind::Consent, &[doctor_pkey, patient_pkey])
}

/// Prefix covering every claim filed by one clinic.
pub fn clinic_claims_prefix(clinic_pkey: &str) -> Result<String> {
    non_empty("clinic_pkey", clinic_pkey)?;
    Ok(list_address(EntityKind::Claim) + &sha512_hex(clinic_pkey.as_bytes())[..30])
}

/// Prefix covering every event recorded against one claim.
pub fn claim_events_prefix(claim_id: &str, clinic_pkey: &str) -> Result<String> {
    non_empty("claim_id", claim_id)?;
    non_empty("clinic_pkey", clinic_pkey)?;
    Ok(list_address(EntityKind::Event)
        + &sha512_hex(clinic_pkey.as_bytes())[..20]
        + &sha512_hex(claim_id.as_bytes())[..20])
}

/// Prefix covering every consent a patient has given.
pub fn patient_consents_prefix(patient_pkey: &str) -> Result<String> {
    non_empty("patient_pkey", patient_pkey)?;
    Ok(list_address(EntityKind::Consent) + &sha512_hex(patient_pkey.as_bytes())[..30])
}

/// Whether `address` is a well-formed address inside this family's namespace.
pub fn is_family_address(address: &str) -> bool {
    address.len() == ADDRESS_LENGTH
        && address.starts_with(NAMESPACE.as_str())
        && address.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn non_empty(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(LedgerError::InvalidInput(format!("{name} must not be empty")));
    }
    Ok(())
}
