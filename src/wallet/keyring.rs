use crate::error::Result;
use crate::wallet::Wallet;
use std::collections::HashMap;

/// In-memory collection of wallets for the session, keyed by address.
/// Keys live only as long as their owner holds them; nothing is persisted.
pub struct Keyring {
    wallets: HashMap<String, Wallet>,
}

impl Default for Keyring {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyring {
    pub fn new() -> Keyring {
        Keyring {
            wallets: HashMap::new(),
        }
    }

    pub fn create_wallet(&mut self) -> Result<String> {
        let wallet = Wallet::new()?;
        let address = wallet.get_address();
        self.wallets.insert(address.clone(), wallet);
        Ok(address)
    }

    /// Import a wallet from a hex-encoded private key and return its address.
    pub fn import_wallet(&mut self, secret_hex: &str) -> Result<String> {
        let wallet = Wallet::from_secret_hex(secret_hex)?;
        let address = wallet.get_address();
        self.wallets.insert(address.clone(), wallet);
        Ok(address)
    }

    pub fn get_addresses(&self) -> Vec<String> {
        self.wallets.keys().cloned().collect()
    }

    pub fn get_wallet(&self, address: &str) -> Option<&Wallet> {
        self.wallets.get(address)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}
