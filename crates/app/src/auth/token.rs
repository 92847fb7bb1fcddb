//! Session token formatting, parsing, and verifier construction.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::{auth::models::SessionUuid, domain::users::records::UserUuid};

/// Session token identifier prefix.
pub const SESSION_TOKEN_PREFIX: &str = "sf";

/// Number of secret bytes encoded in a token.
pub const SESSION_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenVersion {
    V1,
}

impl SessionTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }

    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl TryFrom<i16> for SessionTokenVersion {
    type Error = SessionTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

impl FromStr for SessionTokenVersion {
    type Err = SessionTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Clone)]
pub struct SessionSecret {
    bytes: [u8; SESSION_TOKEN_SECRET_BYTES],
}

impl SessionSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SESSION_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

impl Drop for SessionSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedSessionToken {
    pub session_uuid: SessionUuid,
    pub version: SessionTokenVersion,
    pub secret: SessionSecret,
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("session token format is invalid")]
    InvalidFormat,

    #[error("session token uses an unsupported version")]
    UnsupportedVersion,

    #[error("session token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_session_secret() -> SessionSecret {
    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    SessionSecret::from_bytes(secret)
}

/// `sf_v1_<session uuid, simple>.<secret hex>`
#[must_use]
pub fn format_session_token(
    session_uuid: SessionUuid,
    version: SessionTokenVersion,
    secret: &SessionSecret,
) -> String {
    format!(
        "{SESSION_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        session_uuid.into_uuid().simple(),
        hex::encode(secret.as_bytes())
    )
}

pub fn parse_session_token(token: &str) -> Result<ParsedSessionToken, SessionTokenError> {
    let (prefix_and_id, secret_hex) = token
        .split_once('.')
        .ok_or(SessionTokenError::InvalidFormat)?;

    let mut id_parts = prefix_and_id.splitn(3, '_');

    let prefix = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let version_segment = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;
    let session_segment = id_parts.next().ok_or(SessionTokenError::InvalidFormat)?;

    if prefix != SESSION_TOKEN_PREFIX {
        return Err(SessionTokenError::InvalidFormat);
    }

    let version = SessionTokenVersion::from_str(version_segment)?;

    let Ok(session_uuid) = Uuid::try_parse(session_segment) else {
        return Err(SessionTokenError::InvalidFormat);
    };

    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];

    if hex::decode_to_slice(secret_hex, &mut secret).is_err() {
        return Err(SessionTokenError::InvalidSecretEncoding);
    }

    Ok(ParsedSessionToken {
        session_uuid: SessionUuid::from_uuid(session_uuid),
        version,
        secret: SessionSecret::from_bytes(secret),
    })
}

/// Build the canonical verifier input bytes for a token.
///
/// Format: `{session_uuid_hex}:{version_i16_decimal}:{user_uuid_hex}:{secret_hex}`
#[must_use]
pub fn build_verifier_input(
    session_uuid: SessionUuid,
    version: SessionTokenVersion,
    user_uuid: UserUuid,
    secret: &SessionSecret,
) -> Vec<u8> {
    let input = format!(
        "{}:{}:{}:{}",
        session_uuid.into_uuid().simple(),
        version.as_i16(),
        user_uuid.into_uuid().simple(),
        hex::encode(secret.as_bytes()),
    );

    input.into_bytes()
}

/// Hex-encoded SHA-256 of the verifier input. Only this value is stored.
#[must_use]
pub fn hash_verifier(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

/// Constant-time comparison of a computed verifier against the stored one.
#[must_use]
pub fn verifiers_match(computed: &str, stored: &str) -> bool {
    computed.as_bytes().ct_eq(stored.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_and_format_round_trip() -> TestResult {
        let session_uuid = SessionUuid::from_uuid(Uuid::nil());
        let secret = SessionSecret::from_bytes([0xAB; SESSION_TOKEN_SECRET_BYTES]);
        let token = format_session_token(session_uuid, SessionTokenVersion::V1, &secret);
        let parsed = parse_session_token(&token)?;

        assert_eq!(parsed.session_uuid, session_uuid);
        assert_eq!(parsed.version, SessionTokenVersion::V1);
        assert_eq!(parsed.secret.as_bytes(), secret.as_bytes());

        Ok(())
    }

    #[test]
    fn tokens_have_the_documented_shape() {
        let secret = SessionSecret::from_bytes([0x01; SESSION_TOKEN_SECRET_BYTES]);
        let token = format_session_token(
            SessionUuid::from_uuid(Uuid::nil()),
            SessionTokenVersion::V1,
            &secret,
        );

        assert!(token.starts_with("sf_v1_00000000000000000000000000000000."));
        assert_eq!(token.len(), "sf_v1_".len() + 32 + 1 + 64);
    }

    #[test]
    fn parse_rejects_invalid_prefix() {
        assert!(parse_session_token("lt_v1_00000000000000000000000000000000.aa").is_err());
    }

    #[test]
    fn parse_rejects_short_secrets() {
        let result = parse_session_token("sf_v1_00000000000000000000000000000000.abcd");

        assert!(matches!(
            result,
            Err(SessionTokenError::InvalidSecretEncoding)
        ));
    }

    #[test]
    fn parse_rejects_unknown_versions() {
        let result = parse_session_token("sf_v9_00000000000000000000000000000000.aa");

        assert!(matches!(result, Err(SessionTokenError::UnsupportedVersion)));
    }

    #[test]
    fn verifier_depends_on_the_owning_user() {
        let session_uuid = SessionUuid::from_uuid(Uuid::nil());
        let secret = SessionSecret::from_bytes([0xCD; SESSION_TOKEN_SECRET_BYTES]);

        let first = hash_verifier(&build_verifier_input(
            session_uuid,
            SessionTokenVersion::V1,
            UserUuid::new(),
            &secret,
        ));

        let second = hash_verifier(&build_verifier_input(
            session_uuid,
            SessionTokenVersion::V1,
            UserUuid::new(),
            &secret,
        ));

        assert_eq!(first.len(), 64);
        assert!(!verifiers_match(&first, &second));
        assert!(verifiers_match(&first, &first.clone()));
    }
}
