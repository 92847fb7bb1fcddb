//! Password hashing.
//!
//! scrypt with N = 2^14, r = 16, p = 1 and a 64-byte key, salted with 16
//! random bytes. Stored as `hex(salt):hex(key)`.

use rand::{RngCore, rngs::OsRng};
use scrypt::{Params, scrypt};
use subtle::ConstantTimeEq;
use thiserror::Error;

const SALT_BYTES: usize = 16;
const KEY_BYTES: usize = 64;
const LOG_N: u8 = 14;
const R: u32 = 16;
const P: u32 = 1;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("stored password hash is malformed")]
    MalformedHash,

    #[error("scrypt parameters are invalid")]
    InvalidParams,

    #[error("scrypt output length is invalid")]
    InvalidOutputLen,
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0_u8; SALT_BYTES];

    OsRng.fill_bytes(&mut salt);

    let salt_hex = hex::encode(salt);
    let key = derive_key(password, &salt_hex)?;

    Ok(format!("{salt_hex}:{}", hex::encode(key)))
}

/// Check a password against a hash produced by [`hash_password`].
pub fn verify_password(hash: &str, password: &str) -> Result<bool, PasswordError> {
    let (salt_hex, key_hex) = hash.split_once(':').ok_or(PasswordError::MalformedHash)?;

    let Ok(expected) = hex::decode(key_hex) else {
        return Err(PasswordError::MalformedHash);
    };

    let derived = derive_key(password, salt_hex)?;

    Ok(derived.as_slice().ct_eq(expected.as_slice()).into())
}

fn derive_key(password: &str, salt: &str) -> Result<[u8; KEY_BYTES], PasswordError> {
    let Ok(params) = Params::new(LOG_N, R, P, KEY_BYTES) else {
        return Err(PasswordError::InvalidParams);
    };

    let mut key = [0_u8; KEY_BYTES];

    if scrypt(password.as_bytes(), salt.as_bytes(), &params, &mut key).is_err() {
        return Err(PasswordError::InvalidOutputLen);
    }

    Ok(key)
}
