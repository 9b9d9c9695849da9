// Transaction payload codec
// The wire envelope carries an explicit discriminant plus one optional slot per action,
// and exactly the slot named by the discriminant must be populated

use crate::error::{LedgerError, Result};
use crate::utils::{deserialize, serialize};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadType {
    CreateDoctor = 1,
    CreatePatient = 2,
    CreateClinic = 3,
    CreateClaim = 4,
    AssignDoctor = 5,
    GrantAccess = 6,
    RevokeAccess = 7,
    CreateClient = 8,
}

impl PayloadType {
    /// Discriminant value 0 on the wire means no action was set.
    pub const UNSET: u32 = 0;

    pub fn from_u32(value: u32) -> Option<PayloadType> {
        match value {
            1 => Some(PayloadType::CreateDoctor),
            2 => Some(PayloadType::CreatePatient),
            3 => Some(PayloadType::CreateClinic),
            4 => Some(PayloadType::CreateClaim),
            5 => Some(PayloadType::AssignDoctor),
            6 => Some(PayloadType::GrantAccess),
            7 => Some(PayloadType::RevokeAccess),
            8 => Some(PayloadType::CreateClient),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct CreateDoctor {
    pub public_key: String,
    pub name: String,
    pub surname: String,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct CreatePatient {
    pub public_key: String,
    pub name: String,
    pub surname: String,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct CreateClinic {
    pub public_key: String,
    pub name: String,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct CreateClaim {
    pub claim_id: String,
    pub clinic_pkey: String,
    pub patient_pkey: String,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct ActionOnClaim {
    pub claim_id: String,
    pub clinic_pkey: String,
    pub description: String,
    pub event_time: u64,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct ActionOnAccess {
    pub doctor_pkey: String,
    pub patient_pkey: String,
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct CreateClient {
    pub public_key: String,
    pub name: String,
}

/// The binary envelope submitted as a transaction payload.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct TransactionPayload {
    pub payload_type: u32,
    pub create_doctor: Option<CreateDoctor>,
    pub create_patient: Option<CreatePatient>,
    pub create_clinic: Option<CreateClinic>,
    pub create_claim: Option<CreateClaim>,
    pub assign_doctor: Option<ActionOnClaim>,
    pub grant_access: Option<ActionOnAccess>,
    pub revoke_access: Option<ActionOnAccess>,
    pub create_client: Option<CreateClient>,
}

/// A decoded domain action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateDoctor(CreateDoctor),
    CreatePatient(CreatePatient),
    CreateClinic(CreateClinic),
    CreateClaim(CreateClaim),
    AssignDoctor(ActionOnClaim),
    GrantAccess(ActionOnAccess),
    RevokeAccess(ActionOnAccess),
    CreateClient(CreateClient),
}

impl Action {
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Action::CreateDoctor(_) => PayloadType::CreateDoctor,
            Action::CreatePatient(_) => PayloadType::CreatePatient,
            Action::CreateClinic(_) => PayloadType::CreateClinic,
            Action::CreateClaim(_) => PayloadType::CreateClaim,
            Action::AssignDoctor(_) => PayloadType::AssignDoctor,
            Action::GrantAccess(_) => PayloadType::GrantAccess,
            Action::RevokeAccess(_) => PayloadType::RevokeAccess,
            Action::CreateClient(_) => PayloadType::CreateClient,
        }
    }

    /// Reject empty required fields before anything is signed or stored.
    pub fn validate(&self) -> Result<()> {
        match self {
            Action::CreateDoctor(doctor) => {
                require("public_key", &doctor.public_key)?;
                require("name", &doctor.name)?;
                require("surname", &doctor.surname)
            }
            Action::CreatePatient(patient) => {
                require("public_key", &patient.public_key)?;
                require("name", &patient.name)?;
                require("surname", &patient.surname)
            }
            Action::CreateClinic(clinic) => {
                require("public_key", &clinic.public_key)?;
                require("name", &clinic.name)
            }
            Action::CreateClaim(claim) => {
                require("claim_id", &claim.claim_id)?;
                require("clinic_pkey", &claim.clinic_pkey)?;
                require("patient_pkey", &claim.patient_pkey)
            }
            Action::AssignDoctor(action) => {
                require("claim_id", &action.claim_id)?;
                require("clinic_pkey", &action.clinic_pkey)?;
                require("description", &action.description)
            }
            Action::GrantAccess(access) | Action::RevokeAccess(access) => {
                require("doctor_pkey", &access.doctor_pkey)?;
                require("patient_pkey", &access.patient_pkey)
            }
            Action::CreateClient(client) => {
                require("public_key", &client.public_key)?;
                require("name", &client.name)
            }
        }
    }
}

impl From<Action> for TransactionPayload {
    fn from(action: Action) -> Self {
        let mut payload = TransactionPayload {
            payload_type: action.payload_type().as_u32(),
            ..Default::default()
        };
        match action {
            Action::CreateDoctor(m) => payload.create_doctor = Some(m),
            Action::CreatePatient(m) => payload.create_patient = Some(m),
            Action::CreateClinic(m) => payload.create_clinic = Some(m),
            Action::CreateClaim(m) => payload.create_claim = Some(m),
            Action::AssignDoctor(m) => payload.assign_doctor = Some(m),
            Action::GrantAccess(m) => payload.grant_access = Some(m),
            Action::RevokeAccess(m) => payload.revoke_access = Some(m),
            Action::CreateClient(m) => payload.create_client = Some(m),
        }
        payload
    }
}

impl TransactionPayload {
    /// Resolve the discriminant to the populated variant.
    ///
    /// Unknown discriminants are reported as `UnhandledAction` so the processor,
    /// not the codec, decides to reject them.
    pub fn action(self) -> Result<Action> {
        if self.payload_type == PayloadType::UNSET {
            return Err(LedgerError::MalformedPayload(
                "Payload has no action type".to_string(),
            ));
        }
        let payload_type = PayloadType::from_u32(self.payload_type)
            .ok_or(LedgerError::UnhandledAction(self.payload_type))?;

        let action = match payload_type {
            PayloadType::CreateDoctor => self.create_doctor.map(Action::CreateDoctor),
            PayloadType::CreatePatient => self.create_patient.map(Action::CreatePatient),
            PayloadType::CreateClinic => self.create_clinic.map(Action::CreateClinic),
            PayloadType::CreateClaim => self.create_claim.map(Action::CreateClaim),
            PayloadType::AssignDoctor => self.assign_doctor.map(Action::AssignDoctor),
            PayloadType::GrantAccess => self.grant_access.map(Action::GrantAccess),
            PayloadType::RevokeAccess => self.revoke_access.map(Action::RevokeAccess),
            PayloadType::CreateClient => self.create_client.map(Action::CreateClient),
        };
        action.ok_or_else(|| {
            LedgerError::MalformedPayload(format!(
                "Action type {:?} has no matching payload",
                payload_type
            ))
        })
    }
}

pub fn encode(action: &Action) -> Result<Vec<u8>> {
    serialize(&TransactionPayload::from(action.clone()))
}

/// Decode the envelope without interpreting the discriminant.
pub fn decode(bytes: &[u8]) -> Result<TransactionPayload> {
    deserialize(bytes).map_err(|e| LedgerError::MalformedPayload(e.reason()))
}

/// Decode the envelope and resolve it to an action.
pub fn decode_action(bytes: &[u8]) -> Result<Action> {
    decode(bytes)?.action()
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidInput(format!("{name} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_actions() -> Vec<Action> {
        let access = ActionOnAccess {
            doctor_pkey: "d1".to_string(),
            patient_pkey: "p1".to_string(),
        };
        vec![
            Action::CreateDoctor(CreateDoctor {
                public_key: "d1".to_string(),
                name: "Gregory".to_string(),
                surname: "House".to_string(),
            }),
            Action::CreateClinic(CreateClinic {
                public_key: "c1".to_string(),
                name: "Acme Clinic".to_string(),
            }),
            Action::AssignDoctor(ActionOnClaim {
                claim_id: "claim-1".to_string(),
                clinic_pkey: "c1".to_string(),
                description: "assign d1".to_string(),
                event_time: 1_700_000_000,
            }),
            Action::GrantAccess(access.clone()),
            Action::RevokeAccess(access),
        ]
    }

    #[test]
    fn test_encode_decode_preserves_action() {
        for action in sample_actions() {
            let bytes = encode(&action).unwrap();
            assert_eq!(decode_action(&bytes).unwrap(), action);
        }
    }

    #[test]
    fn test_grant_and_revoke_use_distinct_discriminants() {
        let access = ActionOnAccess {
            doctor_pkey: "d1".to_string(),
            patient_pkey: "p1".to_string(),
        };
        let grant = decode(&encode(&Action::GrantAccess(access.clone())).unwrap()).unwrap();
        let revoke = decode(&encode(&Action::RevokeAccess(access)).unwrap()).unwrap();
        assert_eq!(grant.payload_type, 6);
        assert!(grant.revoke_access.is_none());
        assert_eq!(revoke.payload_type, 7);
        assert!(revoke.grant_access.is_none());
    }

    #[test]
    fn test_missing_discriminant_is_malformed() {
        let payload = TransactionPayload {
            create_clinic: Some(CreateClinic::default()),
            ..Default::default()
        };
        let bytes = serialize(&payload).unwrap();
        assert!(matches!(
            decode_action(&bytes),
            Err(LedgerError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_discriminant_without_variant_is_malformed() {
        let payload = TransactionPayload {
            payload_type: PayloadType::CreateClaim.as_u32(),
            create_clinic: Some(CreateClinic::default()),
            ..Default::default()
        };
        assert!(matches!(
            payload.action(),
            Err(LedgerError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_unknown_discriminant_decodes_but_is_unhandled() {
        let payload = TransactionPayload {
            payload_type: 99,
            ..Default::default()
        };
        let bytes = serialize(&payload).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.payload_type, 99);
        assert_eq!(decoded.action(), Err(LedgerError::UnhandledAction(99)));
    }

    #[test]
    fn test_garbage_bytes_are_malformed() {
        assert!(matches!(
            decode(&[0xFF, 0xFF, 0xFF]),
            Err(LedgerError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let action = Action::CreateClinic(CreateClinic {
            public_key: "c1".to_string(),
            name: "  ".to_string(),
        });
        assert!(matches!(
            action.validate(),
            Err(LedgerError::InvalidInput(_))
        ));
        for action in sample_actions() {
            assert!(action.validate().is_ok());
        }
    }
}
