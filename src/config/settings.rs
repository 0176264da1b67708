use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

/// Default mining difficulty: leading zero bytes of the block hash
const DEFAULT_DIFFICULTY: u32 = 2;
/// Default address version byte (mainnet-style pay-to-pubkey-hash)
const DEFAULT_ADDRESS_VERSION: u8 = 0x00;

const DIFFICULTY_KEY: &str = "DIFFICULTY";
const ADDRESS_VERSION_KEY: &str = "ADDRESS_VERSION";

const DIFFICULTY_ENV: &str = "MICROLEDGER_DIFFICULTY";
const ADDRESS_VERSION_ENV: &str = "MICROLEDGER_ADDRESS_VERSION";

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
        if let Ok(difficulty) = env::var(DIFFICULTY_ENV) {
            map.insert(String::from(DIFFICULTY_KEY), difficulty);
        }
        if let Ok(version) = env::var(ADDRESS_VERSION_ENV) {
            map.insert(String::from(ADDRESS_VERSION_KEY), version);
        }
        Config {
            inner: RwLock::new(map),
        }
    }

    pub fn get_difficulty(&self) -> u32 {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner
            .get(DIFFICULTY_KEY)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_DIFFICULTY)
            .min(32)
    }

    pub fn set_difficulty(&self, difficulty: u32) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        inner.insert(String::from(DIFFICULTY_KEY), difficulty.to_string());
    }

    pub fn get_address_version(&self) -> u8 {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner
            .get(ADDRESS_VERSION_KEY)
            .and_then(|v| v.parse::<u8>().ok())
            .unwrap_or(DEFAULT_ADDRESS_VERSION)
    }
}
