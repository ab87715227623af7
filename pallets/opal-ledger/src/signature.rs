//! Offline instruction signing convention and signer recovery.
//!
//! An offline instruction is authorized by a 65-byte recoverable secp256k1
//! signature over a domain-separated digest:
//!
//! ```text
//! fingerprint = blake2_256(SCALE(ledger_id, from, to, amount, nonce, expires_at))
//! digest      = blake2_256(SIGNING_PREFIX ++ fingerprint)
//! ```
//!
//! `SIGNING_PREFIX` names the scheme and carries the byte length of the
//! fingerprint that follows, so an instruction signature can never collide
//! with a signature over any other ledger payload. The convention is
//! bit-stable: changing any part of it silently invalidates every previously
//! issued authorization.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_io::{crypto::secp256k1_ecdsa_recover_compressed, hashing::blake2_256, EcdsaVerifyError};
use sp_runtime::RuntimeDebug;
use sp_std::{marker::PhantomData, prelude::*};

/// Prefix of every signed instruction digest.
pub const SIGNING_PREFIX: &[u8] = b"\x19Opal Signed Instruction:\n32";

/// A recoverable secp256k1 signature: 32-byte `r`, 32-byte `s`, and a
/// trailing recovery id.
#[derive(
    Clone,
    PartialEq,
    Eq,
    Encode,
    Decode,
    DecodeWithMemTracking,
    MaxEncodedLen,
    TypeInfo,
    RuntimeDebug,
)]
pub struct EcdsaSignature(pub [u8; 65]);

/// Why signer recovery failed.
#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum RecoveryError {
    /// Not a well-formed recoverable signature: invalid recovery indicator,
    /// or r/s outside the field.
    Malformed,
    /// Well-formed, but no public key could be recovered.
    Unrecoverable,
}

/// Recovers the account that signed an instruction digest.
///
/// Pure with respect to ledger state. Runtimes choose how a recovered public
/// key maps onto their account space.
pub trait RecoverSigner<AccountId> {
    fn recover_signer(
        digest: &[u8; 32],
        signature: &EcdsaSignature,
    ) -> Result<AccountId, RecoveryError>;
}

/// Standard recovery: the account is the blake2-256 hash of the recovered
/// 33-byte compressed public key.
pub struct EcdsaRecovery<AccountId>(PhantomData<AccountId>);

impl<AccountId: From<[u8; 32]>> RecoverSigner<AccountId> for EcdsaRecovery<AccountId> {
    fn recover_signer(
        digest: &[u8; 32],
        signature: &EcdsaSignature,
    ) -> Result<AccountId, RecoveryError> {
        let public =
            secp256k1_ecdsa_recover_compressed(&signature.0, digest).map_err(|e| match e {
                EcdsaVerifyError::BadV | EcdsaVerifyError::BadRS => RecoveryError::Malformed,
                EcdsaVerifyError::BadSignature => RecoveryError::Unrecoverable,
            })?;
        Ok(AccountId::from(blake2_256(&public)))
    }
}

/// The digest actually signed for a given instruction fingerprint.
pub fn signing_digest(fingerprint: &[u8; 32]) -> [u8; 32] {
    let mut message = Vec::with_capacity(SIGNING_PREFIX.len() + fingerprint.len());
    message.extend_from_slice(SIGNING_PREFIX);
    message.extend_from_slice(fingerprint);
    blake2_256(&message)
}
