use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_STATE_PATH: &str = "data/state";
static DEFAULT_KEYSTORE_PATH: &str = "keys.dat";

const STATE_PATH_KEY: &str = "MEDCLAIM_STATE_PATH";
const KEYSTORE_PATH_KEY: &str = "MEDCLAIM_KEYSTORE";

pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        let mut map = HashMap::new();
        map.insert(
            String::from(STATE_PATH_KEY),
            env::var(STATE_PATH_KEY).unwrap_or_else(|_| String::from(DEFAULT_STATE_PATH)),
        );
        map.insert(
            String::from(KEYSTORE_PATH_KEY),
            env::var(KEYSTORE_PATH_KEY).unwrap_or_else(|_| String::from(DEFAULT_KEYSTORE_PATH)),
        );

        Config {
            inner: RwLock::new(map),
        }
    }

    /// Directory of the sled database holding local ledger state.
    pub fn get_state_path(&self) -> PathBuf {
        PathBuf::from(self.get(STATE_PATH_KEY, DEFAULT_STATE_PATH))
    }

    pub fn set_state_path(&self, path: String) {
        self.set(STATE_PATH_KEY, path);
    }

    /// File holding the named signing keys.
    pub fn get_keystore_path(&self) -> PathBuf {
        PathBuf::from(self.get(KEYSTORE_PATH_KEY, DEFAULT_KEYSTORE_PATH))
    }

    pub fn set_keystore_path(&self, path: String) {
        self.set(KEYSTORE_PATH_KEY, path);
    }

    fn get(&self, key: &str, default: &str) -> String {
        match self.inner.read() {
            Ok(inner) => inner.get(key).cloned().unwrap_or_else(|| default.to_string()),
            Err(_) => {
                log::error!("Failed to acquire read lock on config");
                default.to_string()
            }
        }
    }

    fn set(&self, key: &str, value: String) {
        match self.inner.write() {
            Ok(mut inner) => {
                inner.insert(String::from(key), value);
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on config");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_defaults() {
        let config = Config::new();
        config.set_state_path("/tmp/medclaim-state".to_string());
        config.set_keystore_path("/tmp/medclaim-keys.dat".to_string());
        assert_eq!(config.get_state_path(), PathBuf::from("/tmp/medclaim-state"));
        assert_eq!(
            config.get_keystore_path(),
            PathBuf::from("/tmp/medclaim-keys.dat")
        );
    }
}
