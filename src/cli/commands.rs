use crate::core::EntityKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "medclaim-chain")]
pub struct Opt {
    #[arg(long = "state", global = true, help = "Local ledger state directory")]
    pub state: Option<String>,
    #[arg(long = "keystore", global = true, help = "Signing key file")]
    pub keystore: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

/// Who signs the transaction and the batch, and where the batch goes.
#[derive(Debug, Args)]
pub struct SignerArgs {
    #[arg(long = "signer", help = "Key store name of the transacting key")]
    pub signer: String,
    #[arg(long = "batcher", help = "Key store name of the batching key (defaults to --signer)")]
    pub batcher: Option<String>,
    #[arg(
        long = "output",
        help = "Write the signed batch list to FILE instead of applying it"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "keygen", about = "Generate a named signing key")]
    Keygen {
        #[arg(help = "Name to store the key under")]
        name: String,
    },
    #[command(name = "listkeys", about = "Print stored key names and public keys")]
    ListKeys,
    #[command(name = "create-clinic", about = "Register the signer as a clinic")]
    CreateClinic {
        #[command(flatten)]
        signer: SignerArgs,
        #[arg(help = "Clinic name")]
        name: String,
    },
    #[command(name = "create-doctor", about = "Enrol the signer as a doctor")]
    CreateDoctor {
        #[command(flatten)]
        signer: SignerArgs,
        name: String,
        surname: String,
    },
    #[command(name = "create-patient", about = "Enrol the signer as a patient")]
    CreatePatient {
        #[command(flatten)]
        signer: SignerArgs,
        name: String,
        surname: String,
    },
    #[command(name = "register-claim", about = "File a claim for a patient (signer is the clinic)")]
    RegisterClaim {
        #[command(flatten)]
        signer: SignerArgs,
        claim_id: String,
        #[arg(help = "Public key of the patient")]
        patient_pkey: String,
    },
    #[command(name = "assign-doctor", about = "Assign a doctor to a claim (signer is the clinic)")]
    AssignDoctor {
        #[command(flatten)]
        signer: SignerArgs,
        claim_id: String,
        description: String,
        #[arg(long = "event-time", help = "Unix seconds of the event (defaults to now)")]
        event_time: Option<u64>,
    },
    #[command(name = "grant-access", about = "Let a doctor access the signing patient's records")]
    GrantAccess {
        #[command(flatten)]
        signer: SignerArgs,
        doctor_pkey: String,
    },
    #[command(name = "revoke-access", about = "Withdraw a doctor's access")]
    RevokeAccess {
        #[command(flatten)]
        signer: SignerArgs,
        doctor_pkey: String,
    },
    #[command(name = "create-client", about = "Register the signer as a client")]
    CreateClient {
        #[command(flatten)]
        signer: SignerArgs,
        name: String,
    },
    #[command(name = "list", about = "Print every stored entity of a kind as JSON")]
    List {
        #[arg(help = "clinic, doctor, patient, claim, event, consent or client")]
        kind: EntityKind,
    },
    #[command(name = "consents", about = "Print the consents a patient has given")]
    Consents { patient_pkey: String },
    #[command(name = "address", about = "Derive the state address of an entity")]
    Address {
        kind: EntityKind,
        #[arg(help = "Identity fields in order, e.g. claim_id clinic_pkey")]
        fields: Vec<String>,
    },
}
