use crate::error::{LedgerError, Result};
use crate::wallet::keys::Keypair;

/// Version byte for mainnet-style pay-to-pubkey-hash addresses
pub const ADDRESS_VERSION: u8 = 0x00;
pub const ADDRESS_CHECK_SUM_LEN: usize = 4;

/// A wallet is a keypair plus the address math around it.
#[derive(Debug, Clone)]
pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let keypair = Keypair::generate()?;
        Ok(Wallet { keypair })
    }

    pub fn from_secret_hex(hex: &str) -> Result<Wallet> {
        let keypair = Keypair::from_secret_hex(hex)?;
        Ok(Wallet { keypair })
    }

    pub fn get_address(&self) -> String {
        address_from_pub_key(&self.keypair.public_key(), ADDRESS_VERSION)
    }

    pub fn get_public_key(&self) -> Vec<u8> {
        self.keypair.public_key()
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.keypair.sign(message)
    }
}

/// Derive a checksummed address from a public key:
/// Base58Check(version ++ hash160(pub_key)). Leading zero bytes survive as
/// leading '1' characters in the encoding.
pub fn address_from_pub_key(pub_key: &[u8], version: u8) -> String {
    convert_address_with_version(&hash_pub_key(pub_key), version)
}

pub fn hash_pub_key(pub_key: &[u8]) -> Vec<u8> {
    crate::utils::hash160(pub_key)
}

fn checksum(payload: &[u8]) -> Vec<u8> {
    crate::utils::double_sha256(payload)[0..ADDRESS_CHECK_SUM_LEN].to_vec()
}

pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

/// Decode an address back into its version byte and public-key hash,
/// verifying the checksum.
pub fn decode_address(address: &str) -> Result<(u8, Vec<u8>)> {
    let payload = crate::utils::base58_decode(address)?;

    if payload.len() < ADDRESS_CHECK_SUM_LEN + 1 {
        return Err(LedgerError::InvalidAddress("Address too short".to_string()));
    }

    let actual_checksum = &payload[payload.len() - ADDRESS_CHECK_SUM_LEN..];
    let version = payload[0];
    let pub_key_hash = payload[1..payload.len() - ADDRESS_CHECK_SUM_LEN].to_vec();

    let mut target_vec = vec![version];
    target_vec.extend(pub_key_hash.as_slice());
    let target_checksum = checksum(target_vec.as_slice());
    if actual_checksum != target_checksum.as_slice() {
        return Err(LedgerError::InvalidAddress(format!(
            "Checksum mismatch for address: {address}"
        )));
    }

    Ok((version, pub_key_hash))
}

pub fn convert_address(pub_key_hash: &[u8]) -> String {
    convert_address_with_version(pub_key_hash, ADDRESS_VERSION)
}

pub fn convert_address_with_version(pub_key_hash: &[u8], version: u8) -> String {
    let mut payload: Vec<u8> = vec![version];
    payload.extend(pub_key_hash);
    let checksum = checksum(payload.as_slice());
    payload.extend(checksum.as_slice());
    // version + pub_key_hash + checksum
    crate::utils::base58_encode(payload.as_slice())
}
