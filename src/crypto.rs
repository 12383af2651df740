//! Signing service: recoverable secp256k1 signatures over transactions
//!
//! A transaction is signed over a stamped digest of its canonical JSON
//! encoding. The resulting `(v, r, s)` triple is enough to both check the
//! signature and recover the signer's account.

use crate::account::{AccountId, ADDRESS_LENGTH};
use crate::error::ChainError;
use crate::transaction::Tx;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::SECRET_KEY_SIZE,
    ecdsa::{RecoverableSignature, RecoveryId, Signature},
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Added to the raw recovery id (0 or 1) to form `v`.
pub const RECOVERY_ID_OFFSET: u64 = 29;

/// Prefix mixed into every signing digest so a transaction signature can
/// never double as a signature over some other 32-byte payload.
const SIGNED_MESSAGE_STAMP: &[u8] = b"\x19Blockledger Signed Message:\n32";

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Self {
        let secret_key = SecretKey::new(&mut OsRng);
        Self::from_secret_key(secret_key)
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, ChainError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                ChainError::SigningFailure(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                ChainError::SigningFailure(format!("Invalid secret key bytes: {}", e))
            }
        })?;

        Ok(Self::from_secret_key(secret_key))
    }

    /// The account this key signs for.
    pub fn account_id(&self) -> AccountId {
        address_from_public_key(&self.public_key)
    }
}

/// Derives the account for a public key: the trailing 20 bytes of the
/// SHA-256 digest of the uncompressed key without its 0x04 tag.
pub fn address_from_public_key(public_key: &PublicKey) -> AccountId {
    let uncompressed = public_key.serialize_uncompressed();
    let digest: [u8; 32] = Sha256::digest(&uncompressed[1..]).into();

    let mut address = [0u8; ADDRESS_LENGTH];
    address.copy_from_slice(&digest[32 - ADDRESS_LENGTH..]);
    AccountId::from_address(&address)
}

/// Returns the stamped digest a transaction is signed over.
pub fn signing_hash(tx: &Tx) -> Result<[u8; 32], ChainError> {
    let data = serde_json::to_vec(tx)
        .map_err(|e| ChainError::Serialization(format!("Failed to encode transaction: {}", e)))?;
    let digest = Sha256::digest(&data);

    let mut hasher = Sha256::new();
    hasher.update(SIGNED_MESSAGE_STAMP);
    hasher.update(digest);
    Ok(hasher.finalize().into())
}

/// Signs the transaction and returns the `(v, r, s)` triple.
pub fn sign(tx: &Tx, keypair: &KeyPair) -> Result<(u64, [u8; 32], [u8; 32]), ChainError> {
    let hash = signing_hash(tx).map_err(|e| ChainError::SigningFailure(e.to_string()))?;
    let message = Message::from_digest(hash);

    let signature = SECP256K1_CONTEXT.sign_ecdsa_recoverable(&message, &keypair.secret_key);
    let (recovery_id, compact) = signature.serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    let v = recovery_id.to_i32() as u64 + RECOVERY_ID_OFFSET;
    Ok((v, r, s))
}

/// Checks the structure of a signature triple: the recovery id must be in
/// range, `r` and `s` must be non-zero scalars below the curve order, and `s`
/// must be in the lower half of the order.
pub fn verify_signature(v: u64, r: &[u8; 32], s: &[u8; 32]) -> Result<(), ChainError> {
    recovery_id(v)?;

    if r.iter().all(|b| *b == 0) || s.iter().all(|b| *b == 0) {
        return Err(ChainError::BadSignature(
            "Invalid signature values".to_string(),
        ));
    }

    let signature = Signature::from_compact(&compact(r, s))
        .map_err(|e| ChainError::BadSignature(format!("Invalid signature values: {}", e)))?;

    let mut normalized = signature;
    normalized.normalize_s();
    if normalized != signature {
        return Err(ChainError::BadSignature(
            "Signature s value is not in the lower half of the curve order".to_string(),
        ));
    }

    Ok(())
}

/// Recovers the account that produced the signature over `tx`.
pub fn from_address(
    tx: &Tx,
    v: u64,
    r: &[u8; 32],
    s: &[u8; 32],
) -> Result<AccountId, ChainError> {
    let recovery_id = recovery_id(v)?;
    let hash = signing_hash(tx)?;
    let message = Message::from_digest(hash);

    let signature = RecoverableSignature::from_compact(&compact(r, s), recovery_id)
        .map_err(|e| ChainError::BadSignature(format!("Invalid signature: {}", e)))?;

    let public_key = SECP256K1_CONTEXT
        .recover_ecdsa(&message, &signature)
        .map_err(|e| ChainError::BadSignature(format!("Failed to recover public key: {}", e)))?;

    Ok(address_from_public_key(&public_key))
}

/// Renders the triple as `0x` followed by the hex of `r || s || recovery id`.
pub fn signature_string(v: u64, r: &[u8; 32], s: &[u8; 32]) -> String {
    let mut bytes = Vec::with_capacity(65);
    bytes.extend_from_slice(r);
    bytes.extend_from_slice(s);
    bytes.push(v.wrapping_sub(RECOVERY_ID_OFFSET) as u8);
    format!("0x{}", hex::encode(bytes))
}

fn recovery_id(v: u64) -> Result<RecoveryId, ChainError> {
    let raw = v.wrapping_sub(RECOVERY_ID_OFFSET);
    if raw > 1 {
        return Err(ChainError::BadSignature(format!(
            "Invalid recovery id {}",
            v
        )));
    }
    RecoveryId::from_i32(raw as i32)
        .map_err(|e| ChainError::BadSignature(format!("Invalid recovery id: {}", e)))
}

fn compact(r: &[u8; 32], s: &[u8; 32]) -> [u8; 64] {
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(r);
    bytes[32..].copy_from_slice(s);
    bytes
}
