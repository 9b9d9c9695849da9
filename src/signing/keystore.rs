use crate::error::{LedgerError, Result};
use crate::signing::Signer;
use crate::utils::{deserialize, serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Named signers persisted to a single bincode file.
pub struct KeyStore {
    path: PathBuf,
    signers: BTreeMap<String, Signer>,
}

impl KeyStore {
    /// Open the key store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<KeyStore> {
        let path = path.as_ref().to_path_buf();
        let signers = if path.exists() {
            let mut file = File::open(&path)?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            deserialize(&buf)?
        } else {
            BTreeMap::new()
        };
        Ok(KeyStore { path, signers })
    }

    /// Generate a signer under `name` and persist it. Returns its public key.
    pub fn create_signer(&mut self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(LedgerError::InvalidInput(
                "Signer name must not be empty".to_string(),
            ));
        }
        if self.signers.contains_key(name) {
            return Err(LedgerError::Config(format!("Signer '{name}' already exists")));
        }
        let signer = Signer::new()?;
        let public_key = signer.public_key_hex();
        self.signers.insert(name.to_string(), signer);
        self.save()?;
        log::info!("Created signer '{name}'");
        Ok(public_key)
    }

    pub fn get_signer(&self, name: &str) -> Result<&Signer> {
        self.signers
            .get(name)
            .ok_or_else(|| LedgerError::Config(format!("Unknown signer '{name}'")))
    }

    /// (name, public key) pairs in name order.
    pub fn list(&self) -> Vec<(String, String)> {
        self.signers
            .iter()
            .map(|(name, signer)| (name.clone(), signer.public_key_hex()))
            .collect()
    }

    fn save(&self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        let bytes = serialize(&self.signers)?;
        writer.write_all(bytes.as_slice())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_created_signers_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys.dat");

        let mut store = KeyStore::open(&path).unwrap();
        let clinic_key = store.create_signer("clinic").unwrap();
        let doctor_key = store.create_signer("doctor").unwrap();
        assert_ne!(clinic_key, doctor_key);

        let reopened = KeyStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_signer("clinic").unwrap().public_key_hex(),
            clinic_key
        );
        assert_eq!(reopened.list().len(), 2);
    }

    #[test]
    fn test_duplicate_and_unknown_names() {
        let dir = tempdir().unwrap();
        let mut store = KeyStore::open(dir.path().join("keys.dat")).unwrap();
        store.create_signer("clinic").unwrap();

        assert!(store.create_signer("clinic").is_err());
        assert!(store.create_signer("").is_err());
        assert!(store.get_signer("nobody").is_err());
    }
}
