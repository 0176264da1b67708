//! Wallets and cryptographic identities
//!
//! This module handles keypair generation and import, message signing and
//! verification, address derivation, and the in-memory keyring.

pub mod keyring;
pub mod keys;
#[allow(clippy::module_inception)]
pub mod wallet;

pub use keyring::Keyring;
pub use keys::{verify_signature, Keypair};
pub use wallet::{
    address_from_pub_key, convert_address, decode_address, hash_pub_key, validate_address, Wallet,
    ADDRESS_CHECK_SUM_LEN, ADDRESS_VERSION,
};
