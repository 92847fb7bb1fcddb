//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    auth::{
        AuthServiceError, SessionTokenVersion,
        models::{
            AuthSettings, Authenticated, Credentials, IssuedSession, NewAccount, NewSession,
            SessionUuid,
        },
        password::{hash_password, verify_password},
        repository::PgAuthRepository,
        token::{
            build_verifier_input, format_session_token, generate_session_secret, hash_verifier,
            parse_session_token, verifiers_match,
        },
    },
    database::Db,
    domain::{
        access::Principal,
        users::{
            data::NewUser,
            records::{Role, UserRecord, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    settings: AuthSettings,
    repository: PgAuthRepository,
    users: PgUsersRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, settings: AuthSettings) -> Self {
        Self {
            repository: PgAuthRepository::new(db.pool().clone()),
            users: PgUsersRepository::new(),
            db,
            settings,
        }
    }

    async fn issue_session(&self, user: UserRecord) -> Result<IssuedSession, AuthServiceError> {
        let session_uuid = SessionUuid::new();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, version, &secret);

        let token_hash = hash_verifier(&build_verifier_input(
            session_uuid,
            version,
            user.uuid,
            &secret,
        ));

        let session = self
            .repository
            .create_session(&NewSession {
                uuid: session_uuid,
                user_uuid: user.uuid,
                version,
                token_hash,
                expires_at: Timestamp::now().checked_add(self.settings.session_ttl)?,
            })
            .await?;

        info!(user_uuid = %user.uuid, session_uuid = %session.uuid, "issued session");

        Ok(IssuedSession {
            token,
            session,
            user,
        })
    }
}

/// Email must contain `@` and the password must be at least [`MIN_PASSWORD_LEN`] characters.
fn validate_credentials(credentials: &Credentials) -> Result<(), AuthServiceError> {
    if !credentials.email.contains('@') || credentials.password.chars().count() < MIN_PASSWORD_LEN
    {
        return Err(AuthServiceError::InvalidCredentials);
    }

    Ok(())
}

async fn hash_off_thread(password: String) -> Result<String, AuthServiceError> {
    Ok(tokio::task::spawn_blocking(move || hash_password(&password)).await??)
}

async fn verify_off_thread(hash: String, password: String) -> Result<bool, AuthServiceError> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&hash, &password)).await??)
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(
        name = "auth.service.register",
        skip(self, account),
        fields(role = %account.role, user_uuid = tracing::field::Empty),
        err
    )]
    async fn register(&self, account: NewAccount) -> Result<UserRecord, AuthServiceError> {
        let NewAccount { credentials, role } = account;

        validate_credentials(&credentials)?;

        let password_hash = hash_off_thread(credentials.password).await?;

        let mut tx = self.db.begin_transaction().await?;

        let user = self
            .users
            .create_user(
                &mut tx,
                NewUser {
                    uuid: UserUuid::new(),
                    email: credentials.email.trim().to_string(),
                    password_hash,
                    role,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

        info!(user_uuid = %user.uuid, role = %user.role, "registered user");

        Ok(user)
    }

    async fn sign_up(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError> {
        let user = self
            .register(NewAccount {
                credentials,
                role: Role::User,
            })
            .await?;

        self.issue_session(user).await
    }

    #[tracing::instrument(name = "auth.service.log_in", skip(self, credentials), err)]
    async fn log_in(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let found = self
            .users
            .find_credentials_by_email(&mut tx, credentials.email.trim())
            .await?;

        tx.commit().await?;

        let Some(found) = found else {
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_off_thread(found.password_hash, credentials.password).await? {
            warn!(user_uuid = %found.user.uuid, "rejected login with wrong password");

            return Err(AuthServiceError::InvalidCredentials);
        }

        self.issue_session(found.user).await
    }

    #[tracing::instrument(name = "auth.service.log_out", skip(self), err)]
    async fn log_out(&self, session: SessionUuid) -> Result<(), AuthServiceError> {
        if !self.repository.revoke_session(session).await? {
            return Err(AuthServiceError::NotFound);
        }

        info!(session_uuid = %session, "revoked session");

        Ok(())
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<Authenticated, AuthServiceError> {
        let Ok(parsed_token) = parse_session_token(bearer_token) else {
            return Err(AuthServiceError::NotFound);
        };

        let session = self
            .repository
            .find_active_session(parsed_token.session_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if session.version != parsed_token.version {
            return Err(AuthServiceError::NotFound);
        }

        let verifier = hash_verifier(&build_verifier_input(
            parsed_token.session_uuid,
            parsed_token.version,
            session.user_uuid,
            &parsed_token.secret,
        ));

        if !verifiers_match(&verifier, &session.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // Authentication does not depend on this write succeeding.
        let _touch_result = self
            .repository
            .touch_session(parsed_token.session_uuid)
            .await;

        Ok(Authenticated {
            principal: Principal::new(session.user_uuid, session.role),
            session: parsed_token.session_uuid,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account with the given role. Used by sign-up and the admin CLI.
    async fn register(&self, account: NewAccount) -> Result<UserRecord, AuthServiceError>;

    /// Registers a regular user and logs them in.
    async fn sign_up(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError>;

    /// Exchanges valid credentials for a new session.
    async fn log_in(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError>;

    /// Revokes a session.
    async fn log_out(&self, session: SessionUuid) -> Result<(), AuthServiceError>;

    /// Resolves a bearer token to the caller it was issued to.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<Authenticated, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn emails_without_an_at_sign_are_rejected() {
        assert!(matches!(
            validate_credentials(&credentials("not-an-email", "password123")),
            Err(AuthServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(
            validate_credentials(&credentials("ada@example.com", "short")),
            Err(AuthServiceError::InvalidCredentials)
        ));
    }

    #[test]
    fn reasonable_credentials_are_accepted() {
        assert!(validate_credentials(&credentials("ada@example.com", "password123")).is_ok());
    }
}
