// The healthcare family's transaction handler
// apply() is synchronous and keeps nothing between calls; every failure leaves it as
// InvalidTransaction so the runtime rejects the transaction without committing anything

use crate::core::addressing::{
    make_claim_address, make_clinic_address, make_consent_address, make_doctor_address,
    make_patient_address, FAMILY_NAME, FAMILY_VERSION, NAMESPACE,
};
use crate::core::entities::{Claim, ClaimEvent, Client, Clinic, Consent, Doctor, Patient};
use crate::core::payload::{
    decode, Action, ActionOnAccess, ActionOnClaim, CreateClaim, CreateClient, CreateClinic,
    CreateDoctor, CreatePatient,
};
use crate::core::transaction::Transaction;
use crate::error::{LedgerError, Result};
use crate::state::{ClaimsState, TransactionContext};
use crate::utils::{sha512_hex, short_id};
use log::{debug, info, warn};
use std::panic::{self, AssertUnwindSafe};

pub struct ClaimsTransactionHandler {
    family_name: String,
    family_versions: Vec<String>,
    namespaces: Vec<String>,
}

impl Default for ClaimsTransactionHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimsTransactionHandler {
    pub fn new() -> ClaimsTransactionHandler {
        ClaimsTransactionHandler {
            family_name: FAMILY_NAME.to_string(),
            family_versions: vec![FAMILY_VERSION.to_string()],
            namespaces: vec![NAMESPACE.to_string()],
        }
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn family_versions(&self) -> &[String] {
        &self.family_versions
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Execute one transaction against `context`.
    ///
    /// Returns `Ok(())` to commit. Every error, including a panic inside a
    /// handler, is reported as `LedgerError::InvalidTransaction`.
    pub fn apply(
        &self,
        transaction: &Transaction,
        context: &mut dyn TransactionContext,
    ) -> Result<()> {
        let txn_id = transaction.get_header_signature();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute(transaction, context)));
        match outcome {
            Ok(Ok(())) => {
                info!("Transaction {} committed", short_id(txn_id));
                Ok(())
            }
            Ok(Err(e)) => {
                let rejection = e.into_invalid_transaction();
                warn!("Transaction {} rejected: {}", short_id(txn_id), rejection.reason());
                Err(rejection)
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!("Transaction {} aborted: {reason}", short_id(txn_id));
                Err(LedgerError::InvalidTransaction(format!(
                    "Internal error: {reason}"
                )))
            }
        }
    }

    fn execute(&self, transaction: &Transaction, context: &mut dyn TransactionContext) -> Result<()> {
        let header = transaction.header()?;
        if header.family_name != self.family_name
            || !self.family_versions.contains(&header.family_version)
        {
            return Err(LedgerError::InvalidTransaction(format!(
                "Unsupported family {} {}",
                header.family_name, header.family_version
            )));
        }
        if header.payload_sha512 != sha512_hex(transaction.get_payload()) {
            return Err(LedgerError::InvalidTransaction(
                "Payload digest does not match header".to_string(),
            ));
        }

        let action = decode(transaction.get_payload())?.action()?;
        action.validate()?;
        authorize_signer(&action, &header.signer_public_key)?;
        debug!(
            "Applying {:?} signed by {}",
            action.payload_type(),
            short_id(&header.signer_public_key)
        );

        let mut state = ClaimsState::new(context);
        match action {
            Action::CreateDoctor(doctor) => create_doctor(&mut state, doctor)?,
            Action::CreatePatient(patient) => create_patient(&mut state, patient)?,
            Action::CreateClinic(clinic) => create_clinic(&mut state, clinic)?,
            Action::CreateClaim(claim) => create_claim(&mut state, claim)?,
            Action::AssignDoctor(action) => assign_doctor(&mut state, action)?,
            Action::GrantAccess(access) => grant_access(&mut state, access)?,
            Action::RevokeAccess(access) => revoke_access(&mut state, access)?,
            Action::CreateClient(client) => create_client(&mut state, client)?,
        }
        state.commit()
    }
}

fn create_doctor(state: &mut ClaimsState, doctor: CreateDoctor) -> Result<()> {
    let record = Doctor {
        public_key: doctor.public_key,
        name: doctor.name,
        surname: doctor.surname,
    };
    state.create_if_absent(&record.address()?, "Doctor", &record)
}

fn create_patient(state: &mut ClaimsState, patient: CreatePatient) -> Result<()> {
    let record = Patient {
        public_key: patient.public_key,
        name: patient.name,
        surname: patient.surname,
    };
    state.create_if_absent(&record.address()?, "Patient", &record)
}

fn create_clinic(state: &mut ClaimsState, clinic: CreateClinic) -> Result<()> {
    let record = Clinic {
        public_key: clinic.public_key,
        name: clinic.name,
    };
    state.create_if_absent(&record.address()?, "Clinic", &record)
}

fn create_claim(state: &mut ClaimsState, claim: CreateClaim) -> Result<()> {
    let clinic_hex = make_clinic_address(&claim.clinic_pkey)?;
    let patient_hex = make_patient_address(&claim.patient_pkey)?;

    if !state.exists(&clinic_hex)? {
        return Err(LedgerError::EntityNotFound(format!(
            "Clinic {} is not registered",
            claim.clinic_pkey
        )));
    }
    if !state.exists(&patient_hex)? {
        return Err(LedgerError::EntityNotFound(format!(
            "Patient {} is not registered",
            claim.patient_pkey
        )));
    }

    let record = Claim {
        claim_id: claim.claim_id,
        clinic_pkey: claim.clinic_pkey,
        patient_pkey: claim.patient_pkey,
    };
    state.create_if_absent(&record.address()?, "Claim", &record)
}

fn assign_doctor(state: &mut ClaimsState, action: ActionOnClaim) -> Result<()> {
    let claim_hex = make_claim_address(&action.claim_id, &action.clinic_pkey)?;
    let clinic_hex = make_clinic_address(&action.clinic_pkey)?;

    let _claim: Claim = state.load_or_fail(&claim_hex, "Claim")?;
    if !state.exists(&clinic_hex)? {
        return Err(LedgerError::EntityNotFound(format!(
            "Clinic {} is not registered",
            action.clinic_pkey
        )));
    }

    let event = ClaimEvent {
        claim_id: action.claim_id,
        clinic_pkey: action.clinic_pkey,
        description: action.description,
        event_time: action.event_time,
    };
    state.put(&event.address()?, &event)
}

fn grant_access(state: &mut ClaimsState, access: ActionOnAccess) -> Result<()> {
    let doctor_hex = make_doctor_address(&access.doctor_pkey)?;
    let patient_hex = make_patient_address(&access.patient_pkey)?;
    let consent_hex = make_consent_address(&access.doctor_pkey, &access.patient_pkey)?;

    if !state.exists(&doctor_hex)? {
        return Err(LedgerError::EntityNotFound(format!(
            "Doctor {} is not registered",
            access.doctor_pkey
        )));
    }
    if !state.exists(&patient_hex)? {
        return Err(LedgerError::EntityNotFound(format!(
            "Patient {} is not registered",
            access.patient_pkey
        )));
    }

    if let Some(existing) = state.load::<Consent>(&consent_hex)? {
        if existing.granted {
            return Err(LedgerError::EntityAlreadyExists(format!(
                "Doctor {} already has access to patient {}",
                access.doctor_pkey, access.patient_pkey
            )));
        }
    }
    let consent = Consent {
        doctor_pkey: access.doctor_pkey,
        patient_pkey: access.patient_pkey,
        granted: true,
    };
    state.put(&consent.address()?, &consent)
}

fn revoke_access(state: &mut ClaimsState, access: ActionOnAccess) -> Result<()> {
    let consent_hex = make_consent_address(&access.doctor_pkey, &access.patient_pkey)?;
    state.update_existing(&consent_hex, "Consent", |consent: &mut Consent| {
        if !consent.granted {
            return Err(LedgerError::EntityNotFound(format!(
                "Doctor {} has no active access to patient {}",
                access.doctor_pkey, access.patient_pkey
            )));
        }
        consent.granted = false;
        Ok(())
    })?;
    Ok(())
}

fn create_client(state: &mut ClaimsState, client: CreateClient) -> Result<()> {
    let record = Client {
        public_key: client.public_key,
        name: client.name,
    };
    state.put(&record.address()?, &record)
}

// Registrations must come from the key being registered, claim actions from the
// clinic and consent changes from the patient
fn authorize_signer(action: &Action, signer_public_key: &str) -> Result<()> {
    let (role, required) = match action {
        Action::CreateDoctor(doctor) => ("doctor", &doctor.public_key),
        Action::CreatePatient(patient) => ("patient", &patient.public_key),
        Action::CreateClinic(clinic) => ("clinic", &clinic.public_key),
        Action::CreateClient(client) => ("client", &client.public_key),
        Action::CreateClaim(claim) => ("clinic", &claim.clinic_pkey),
        Action::AssignDoctor(action) => ("clinic", &action.clinic_pkey),
        Action::GrantAccess(access) | Action::RevokeAccess(access) => {
            ("patient", &access.patient_pkey)
        }
    };
    if required != signer_public_key {
        return Err(LedgerError::InvalidTransaction(format!(
            "Transaction must be signed by the {role} {}",
            short_id(required)
        )));
    }
    Ok(())
}
