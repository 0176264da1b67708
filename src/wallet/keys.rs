// Key management for ledger identities - secp256k1 keypairs and ECDSA signatures.
// Signing always hashes the message with SHA-256 first and signs the digest,
// so verification is over the digest as well.

use crate::error::{LedgerError, Result};
use crate::utils::sha256_digest;
use data_encoding::HEXLOWER_PERMISSIVE;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::ecdsa::Signature;
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};

/// Shared secp256k1 context. Building one is expensive, so every signing and
/// verification call goes through this instance.
static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// A secp256k1 keypair: 32-byte private scalar and the compressed public
/// point derived from it.
#[derive(Debug, Clone)]
pub struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    /// Generate a fresh keypair from 32 cryptographically random bytes.
    pub fn generate() -> Result<Keypair> {
        let mut secret_bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut secret_bytes)
            .map_err(|e| LedgerError::Key(format!("Random source failure: {e}")))?;
        Self::from_secret_bytes(&secret_bytes)
    }

    /// Import a keypair from raw private-key bytes. The scalar must be in
    /// [1, curve_order - 1] or the curve library rejects it.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Keypair> {
        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| LedgerError::Key(format!("Invalid private key: {e}")))?;
        // Public = private * G; deterministic, irreversible
        let public = PublicKey::from_secret_key(&SECP, &secret);
        Ok(Keypair { secret, public })
    }

    /// Import a keypair from a hex-encoded private key.
    pub fn from_secret_hex(hex: &str) -> Result<Keypair> {
        let bytes = HEXLOWER_PERMISSIVE
            .decode(hex.as_bytes())
            .map_err(|e| LedgerError::Key(format!("Invalid private key hex: {e}")))?;
        Self::from_secret_bytes(&bytes)
    }

    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.secret_bytes()
    }

    /// The compressed public point encoding (33 bytes).
    pub fn public_key(&self) -> Vec<u8> {
        self.public.serialize().to_vec()
    }

    /// Sign a message: SHA-256 digest it, then produce a DER-encoded ECDSA
    /// signature over the digest.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let digest = sha256_digest(message);
        let msg = Message::from_digest_slice(digest.as_slice())
            .map_err(|e| LedgerError::Crypto(format!("Failed to build message digest: {e}")))?;
        let signature = SECP.sign_ecdsa(&msg, &self.secret);
        Ok(signature.serialize_der().to_vec())
    }
}

/// Verify a DER-encoded signature against a compressed public key and the
/// original message bytes. Any malformed input yields false, never an error.
pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let public = match PublicKey::from_slice(public_key) {
        Ok(pk) => pk,
        Err(_) => return false,
    };
    let sig = match Signature::from_der(signature) {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    let digest = sha256_digest(message);
    let msg = match Message::from_digest_slice(digest.as_slice()) {
        Ok(msg) => msg,
        Err(_) => return false,
    };
    SECP.verify_ecdsa(&msg, &sig, &public).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_derivation_is_deterministic() {
        let keypair = Keypair::generate().unwrap();
        let reimported = Keypair::from_secret_bytes(&keypair.secret_bytes()).unwrap();
        assert_eq!(keypair.public_key(), reimported.public_key());
        assert_eq!(keypair.public_key().len(), 33);
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let keypair = Keypair::generate().unwrap();
        let message = b"pay 5 coins to bob";
        let signature = keypair.sign(message).unwrap();
        assert!(verify_signature(&keypair.public_key(), message, &signature));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let alice = Keypair::generate().unwrap();
        let bob = Keypair::generate().unwrap();
        let message = b"pay 5 coins to bob";
        let signature = alice.sign(message).unwrap();
        assert!(!verify_signature(&bob.public_key(), message, &signature));
    }

    #[test]
    fn test_verify_rejects_tampered_message() {
        let keypair = Keypair::generate().unwrap();
        let signature = keypair.sign(b"pay 5 coins to bob").unwrap();
        assert!(!verify_signature(
            &keypair.public_key(),
            b"pay 500 coins to bob",
            &signature
        ));
    }

    #[test]
    fn test_verify_handles_malformed_input() {
        let keypair = Keypair::generate().unwrap();
        // Garbage signature bytes must verify false, not panic
        assert!(!verify_signature(&keypair.public_key(), b"msg", &[0u8; 16]));
        // Garbage public key too
        assert!(!verify_signature(&[1u8; 33], b"msg", &[0u8; 16]));
        // Empty signature
        assert!(!verify_signature(&keypair.public_key(), b"msg", &[]));
    }

    #[test]
    fn test_import_rejects_out_of_range_scalar() {
        // Zero is not a valid secp256k1 scalar
        assert!(Keypair::from_secret_bytes(&[0u8; 32]).is_err());
        // Wrong length
        assert!(Keypair::from_secret_bytes(&[1u8; 31]).is_err());
    }

    #[test]
    fn test_hex_import_round_trip() {
        let keypair = Keypair::generate().unwrap();
        let hex = data_encoding::HEXLOWER.encode(&keypair.secret_bytes());
        let imported = Keypair::from_secret_hex(&hex).unwrap();
        assert_eq!(keypair.public_key(), imported.public_key());
    }
}
