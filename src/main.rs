// Entry point for the medclaim-chain CLI
// Builds signed batches for clinic, doctor, patient, claim and consent actions and either
// applies them to the on-disk local ledger or writes them out for submission elsewhere
use clap::Parser;
use log::{error, info, LevelFilter};
use medclaim_chain::cli::SignerArgs;
use medclaim_chain::core::{
    address, builder, list_address, patient_consents_prefix, Batch, BatchList, Claim,
    ClaimEvent, Client, Clinic, Consent, Doctor, EntityKind, Patient,
};
use medclaim_chain::{
    current_timestamp, Command, KeyStore, LocalLedger, Opt, Record, Signer, SledStore,
    GLOBAL_CONFIG,
};
use std::fs;
use std::process;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();
    if let Some(state) = opt.state {
        GLOBAL_CONFIG.set_state_path(state);
    }
    if let Some(keystore) = opt.keystore {
        GLOBAL_CONFIG.set_keystore_path(keystore);
    }

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Keygen { name } => {
            let mut keystore = KeyStore::open(GLOBAL_CONFIG.get_keystore_path())?;
            let public_key = keystore.create_signer(&name)?;
            println!("{name}: {public_key}");
        }
        Command::ListKeys => {
            let keystore = KeyStore::open(GLOBAL_CONFIG.get_keystore_path())?;
            for (name, public_key) in keystore.list() {
                println!("{name}: {public_key}");
            }
        }
        Command::CreateClinic { signer, name } => {
            with_signers(&signer, |txn, batch| builder::create_clinic(txn, batch, &name))?;
        }
        Command::CreateDoctor {
            signer,
            name,
            surname,
        } => {
            with_signers(&signer, |txn, batch| {
                builder::create_doctor(txn, batch, &name, &surname)
            })?;
        }
        Command::CreatePatient {
            signer,
            name,
            surname,
        } => {
            with_signers(&signer, |txn, batch| {
                builder::create_patient(txn, batch, &name, &surname)
            })?;
        }
        Command::RegisterClaim {
            signer,
            claim_id,
            patient_pkey,
        } => {
            with_signers(&signer, |txn, batch| {
                builder::register_claim(txn, batch, &claim_id, &patient_pkey)
            })?;
        }
        Command::AssignDoctor {
            signer,
            claim_id,
            description,
            event_time,
        } => {
            let event_time = match event_time {
                Some(time) => time,
                None => current_timestamp()?,
            };
            with_signers(&signer, |txn, batch| {
                builder::assign_doctor(txn, batch, &claim_id, &description, event_time)
            })?;
        }
        Command::GrantAccess {
            signer,
            doctor_pkey,
        } => {
            with_signers(&signer, |txn, batch| {
                builder::grant_access(txn, batch, &doctor_pkey)
            })?;
        }
        Command::RevokeAccess {
            signer,
            doctor_pkey,
        } => {
            with_signers(&signer, |txn, batch| {
                builder::revoke_access(txn, batch, &doctor_pkey)
            })?;
        }
        Command::CreateClient { signer, name } => {
            with_signers(&signer, |txn, batch| builder::create_client(txn, batch, &name))?;
        }
        Command::List { kind } => {
            let ledger = open_ledger()?;
            let prefix = list_address(kind);
            match kind {
                EntityKind::Clinic => print_records::<Clinic>(&ledger, &prefix)?,
                EntityKind::Doctor => print_records::<Doctor>(&ledger, &prefix)?,
                EntityKind::Patient => print_records::<Patient>(&ledger, &prefix)?,
                EntityKind::Claim => print_records::<Claim>(&ledger, &prefix)?,
                EntityKind::Event => print_records::<ClaimEvent>(&ledger, &prefix)?,
                EntityKind::Consent => print_records::<Consent>(&ledger, &prefix)?,
                EntityKind::Client => print_records::<Client>(&ledger, &prefix)?,
            }
        }
        Command::Consents { patient_pkey } => {
            let ledger = open_ledger()?;
            let consents: Vec<Consent> = ledger.list(&patient_consents_prefix(&patient_pkey)?)?;
            let active: Vec<&Consent> = consents.iter().filter(|c| c.granted).collect();
            println!("{}", serde_json::to_string_pretty(&active)?);
        }
        Command::Address { kind, fields } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            println!("{}", address(kind, &fields)?);
        }
    }
    Ok(())
}

// Loads the signing keys, builds the batch, then submits it or writes it out
fn with_signers<F>(args: &SignerArgs, build: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&Signer, &Signer) -> medclaim_chain::Result<(Batch, String)>,
{
    let keystore = KeyStore::open(GLOBAL_CONFIG.get_keystore_path())?;
    let txn_signer = keystore.get_signer(&args.signer)?;
    let batch_signer = match &args.batcher {
        Some(name) => keystore.get_signer(name)?,
        None => txn_signer,
    };
    let (batch, batch_id) = build(txn_signer, batch_signer)?;

    if let Some(path) = &args.output {
        let batch_list = BatchList {
            batches: vec![batch],
        };
        fs::write(path, batch_list.serialize()?)?;
        info!("Wrote batch {batch_id} to {}", path.display());
        println!("{batch_id}");
        return Ok(());
    }

    let ledger = open_ledger()?;
    ledger.submit_batch(&batch)?;
    println!("Committed batch {batch_id}");
    Ok(())
}

fn open_ledger() -> Result<LocalLedger<SledStore>, Box<dyn std::error::Error>> {
    let store = SledStore::open(GLOBAL_CONFIG.get_state_path())?;
    Ok(LocalLedger::new(store))
}

fn print_records<T: Record>(
    ledger: &LocalLedger<SledStore>,
    prefix: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let records: Vec<T> = ledger.list(prefix)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
