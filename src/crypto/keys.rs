//! ECDSA key management and the signing capability
//!
//! Key pairs use the secp256k1 curve. Anything that can produce a public key
//! and sign a payload implements [`Signer`], which is what the transaction
//! layer depends on.

use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::hash::sha256;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// Signing capability injected into the transaction layer
pub trait Signer {
    /// Hex-encoded public key identifying the signer
    fn public_key_hex(&self) -> String;

    /// Sign an arbitrary payload
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, KeyError>;
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key.
    ///
    /// Surrounding whitespace and an optional `0x` prefix are ignored, since
    /// keys are usually pasted from environment files.
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let trimmed = hex_key.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(trimmed).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Verify a signature against this key pair's public key
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<bool, KeyError> {
        verify_signature(&self.public_key, payload, signature)
    }
}

impl Signer for KeyPair {
    fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, KeyError> {
        sign_message(&self.secret_key, payload)
    }
}

/// Parse a public key from hex string
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

/// Payloads that are not already a 32-byte digest are hashed first.
fn message_digest(payload: &[u8]) -> Vec<u8> {
    if payload.len() == 32 {
        payload.to_vec()
    } else {
        sha256(payload)
    }
}

/// Sign a payload with a secret key
pub fn sign_message(secret_key: &SecretKey, payload: &[u8]) -> Result<Vec<u8>, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(&message_digest(payload))?;
    let signature = secp.sign_ecdsa(&message, secret_key);
    Ok(signature.serialize_compact().to_vec())
}

/// Verify a signature against a public key
pub fn verify_signature(
    public_key: &PublicKey,
    payload: &[u8],
    signature: &[u8],
) -> Result<bool, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(&message_digest(payload))?;
    let sig = secp256k1::ecdsa::Signature::from_compact(signature)
        .map_err(|_| KeyError::InvalidSignature)?;

    Ok(secp.verify_ecdsa(&message, &sig, public_key).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_pair_generation() {
        let kp = KeyPair::generate();
        assert_eq!(kp.private_key_hex().len(), 64);
        // Compressed secp256k1 public key: 33 bytes
        assert_eq!(kp.public_key_hex().len(), 66);
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = KeyPair::generate();
        let payload = b"token mint 50000";

        let signature = kp.sign(payload).unwrap();
        assert!(kp.verify(payload, &signature).unwrap());
        assert!(!kp.verify(b"token mint 50001", &signature).unwrap());
    }

    #[test]
    fn test_key_pair_from_hex_trims_input() {
        let kp1 = KeyPair::generate();
        let padded = format!("  0x{}\n", kp1.private_key_hex());

        let kp2 = KeyPair::from_private_key_hex(&padded).unwrap();
        assert_eq!(kp1.public_key_hex(), kp2.public_key_hex());
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(matches!(
            KeyPair::from_private_key_hex("not-hex"),
            Err(KeyError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_public_key_round_trip() {
        let kp = KeyPair::generate();
        let parsed = public_key_from_hex(&kp.public_key_hex()).unwrap();
        assert_eq!(parsed, kp.public_key);
    }
}
