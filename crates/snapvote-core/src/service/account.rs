//! Account service.
//!
//! Registration, email verification, login sessions, password reset, and
//! email/password changes. Emailed links carry signed, purpose-bound,
//! expiring tokens; a failed email delivery is logged and never fails the
//! request that triggered it.

use chrono::{DateTime, Duration, Utc};

use snapvote_types::config::AppConfig;
use snapvote_types::error::{AccountError, RepositoryError};
use snapvote_types::id::{SessionId, UserId};
use snapvote_types::session::Session;
use snapvote_types::token::{TokenClaims, TokenPurpose};
use snapvote_types::user::{LoginRequest, RegisterRequest, User};

use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::service::hash::{ContentHasher, CredentialHasher};
use crate::service::mail::{Mailer, OutgoingEmail};
use crate::service::random::RandomSource;
use crate::service::token::TokenSigner;
use crate::validation;

const VERIFY_LINK_INVALID: &str = "Invalid or expired verification link.";
const TOKEN_INVALID: &str = "Invalid or expired token";

/// Tunables taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct AccountSettings {
    /// Base URL for emailed links, without trailing slash.
    pub public_url: String,
    pub token_ttl_secs: i64,
    pub session_ttl_hours: i64,
    pub remember_me_ttl_hours: i64,
}

impl From<&AppConfig> for AccountSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            public_url: config.public_url.trim_end_matches('/').to_string(),
            token_ttl_secs: config.token_ttl_secs,
            session_ttl_hours: config.session_ttl_hours,
            remember_me_ttl_hours: config.remember_me_ttl_hours,
        }
    }
}

/// Result of a registration.
#[derive(Debug, Clone)]
pub struct RegisterOutcome {
    pub user: User,
    /// Whether the verification email went out.
    pub email_sent: bool,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Plaintext bearer token, returned to the client exactly once.
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl LoginOutcome {
    /// Where the client should land after logging in.
    pub fn redirect(&self) -> &'static str {
        if self.user.is_superuser {
            "superuser_dashboard"
        } else {
            "account"
        }
    }
}

/// Check decoded claims against the expected purpose and the token lifetime.
pub fn claims_are_current(
    claims: &TokenClaims,
    purpose: TokenPurpose,
    now: DateTime<Utc>,
    ttl_secs: i64,
) -> bool {
    let age = now.timestamp() - claims.issued_at;
    claims.purpose == purpose && age >= 0 && age <= ttl_secs
}

fn storage(e: RepositoryError) -> AccountError {
    AccountError::StorageError(e.to_string())
}

/// Service orchestrating the account lifecycle.
///
/// Generic over repository and infrastructure traits to keep snapvote-core
/// free of storage, crypto, and SMTP dependencies.
pub struct AccountService<U, S, P, H, T, M, R>
where
    U: UserRepository,
    S: SessionRepository,
    P: CredentialHasher,
    H: ContentHasher,
    T: TokenSigner,
    M: Mailer,
    R: RandomSource,
{
    users: U,
    sessions: S,
    passwords: P,
    hasher: H,
    signer: T,
    mailer: M,
    random: R,
    settings: AccountSettings,
}

impl<U, S, P, H, T, M, R> AccountService<U, S, P, H, T, M, R>
where
    U: UserRepository,
    S: SessionRepository,
    P: CredentialHasher,
    H: ContentHasher,
    T: TokenSigner,
    M: Mailer,
    R: RandomSource,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: U,
        sessions: S,
        passwords: P,
        hasher: H,
        signer: T,
        mailer: M,
        random: R,
        settings: AccountSettings,
    ) -> Self {
        Self {
            users,
            sessions,
            passwords,
            hasher,
            signer,
            mailer,
            random,
            settings,
        }
    }

    /// Register a new, unverified account and email a verification link.
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<RegisterOutcome, AccountError> {
        let user = self
            .insert_user(&request.username, &request.email, &request.password, false, false)
            .await?;

        let token = self.issue_token(TokenClaims::new(
            TokenPurpose::VerifyEmail,
            &user.email,
            Utc::now().timestamp(),
        ))?;
        let link = format!("{}/api/v1/auth/verify-email/{token}", self.settings.public_url);
        let email_sent = self
            .deliver(OutgoingEmail {
                to: user.email.clone(),
                subject: "Verify Your Email".to_string(),
                body: format!(
                    "Hello {},\n\nClick the link below to verify your email:\n\n{link}\n\nIf you did not request this, ignore this email.",
                    user.username
                ),
            })
            .await;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            email_sent,
            "user registered"
        );
        Ok(RegisterOutcome { user, email_sent })
    }

    /// Create an account directly (CLI and demo seeding). No email is sent.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_superuser: bool,
        is_verified: bool,
    ) -> Result<User, AccountError> {
        let user = self
            .insert_user(username, email, password, is_superuser, is_verified)
            .await?;
        tracing::info!(user_id = %user.id, username = %user.username, is_superuser, "user created");
        Ok(user)
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_superuser: bool,
        is_verified: bool,
    ) -> Result<User, AccountError> {
        let username = username.trim();
        let email = email.trim();
        validation::validate_username(username).map_err(AccountError::InvalidInput)?;
        validation::validate_email(email).map_err(AccountError::InvalidInput)?;
        validation::validate_password(password).map_err(AccountError::InvalidInput)?;

        if self.users.get_by_username(username).await.map_err(storage)?.is_some() {
            return Err(AccountError::UsernameTaken);
        }
        if self.users.get_by_email(email).await.map_err(storage)?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let password_hash = self
            .passwords
            .hash_password(password)
            .map_err(AccountError::CryptoError)?;

        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            is_superuser,
            is_verified,
            created_at: Utc::now(),
        };

        self.users.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(msg) if msg.contains("username") => {
                AccountError::UsernameTaken
            }
            RepositoryError::Conflict(_) => AccountError::EmailTaken,
            other => storage(other),
        })
    }

    /// Mark the account named by a verification token as verified.
    pub async fn verify_email(&self, token: &str) -> Result<User, AccountError> {
        let claims = self.decode(token, TokenPurpose::VerifyEmail, VERIFY_LINK_INVALID)?;
        let mut user = self
            .users
            .get_by_email(&claims.email)
            .await
            .map_err(storage)?
            .ok_or_else(|| AccountError::InvalidToken(VERIFY_LINK_INVALID.to_string()))?;

        if !user.is_verified {
            user.is_verified = true;
            user = self.users.update(&user).await.map_err(storage)?;
            tracing::info!(user_id = %user.id, "email verified");
        }
        Ok(user)
    }

    /// Authenticate by email or username and open a session.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AccountError> {
        let login = request.email_or_username.trim();
        let user = self.users.get_by_login(login).await.map_err(storage)?;

        let user = match user {
            Some(user)
                if self
                    .passwords
                    .verify_password(&request.password, &user.password_hash) =>
            {
                user
            }
            _ => {
                tracing::debug!(login = %login, "login rejected");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !user.is_verified {
            return Err(AccountError::NotVerified);
        }

        let now = Utc::now();
        if let Err(e) = self.sessions.delete_expired(now).await {
            tracing::warn!(error = %e, "failed to purge expired sessions");
        }

        let ttl_hours = if request.remember_me {
            self.settings.remember_me_ttl_hours
        } else {
            self.settings.session_ttl_hours
        };
        let token = self.random.session_token();
        let session = Session {
            id: SessionId::new(),
            user_id: user.id,
            token_hash: self.hasher.compute_hash(&token),
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours),
        };
        self.sessions.create(&session).await.map_err(storage)?;

        tracing::info!(user_id = %user.id, superuser = user.is_superuser, "login successful");
        Ok(LoginOutcome {
            token,
            user,
            expires_at: session.expires_at,
        })
    }

    /// Resolve a bearer token to its session and user.
    pub async fn authenticate(&self, token: &str) -> Result<(User, Session), AccountError> {
        let token_hash = self.hasher.compute_hash(token);
        let session = self
            .sessions
            .get_by_token_hash(&token_hash)
            .await
            .map_err(storage)?
            .ok_or(AccountError::InvalidSession)?;

        if session.is_expired(Utc::now()) {
            self.sessions.delete(&session.id).await.map_err(storage)?;
            return Err(AccountError::InvalidSession);
        }

        let user = self
            .users
            .get_by_id(&session.user_id)
            .await
            .map_err(storage)?
            .ok_or(AccountError::InvalidSession)?;

        Ok((user, session))
    }

    pub async fn logout(&self, session_id: &SessionId) -> Result<(), AccountError> {
        match self.sessions.delete(session_id).await {
            Ok(()) | Err(RepositoryError::NotFound) => Ok(()),
            Err(e) => Err(storage(e)),
        }
    }

    /// Email a password-reset link. Returns whether the email went out.
    pub async fn request_password_reset(&self, email: &str) -> Result<bool, AccountError> {
        let email = email.trim();
        validation::validate_email(email).map_err(AccountError::InvalidInput)?;
        let user = self
            .users
            .get_by_email(email)
            .await
            .map_err(storage)?
            .ok_or(AccountError::EmailNotFound)?;

        let token = self.issue_token(TokenClaims::new(
            TokenPurpose::PasswordReset,
            &user.email,
            Utc::now().timestamp(),
        ))?;
        let link = format!("{}/api/v1/auth/reset-password/{token}", self.settings.public_url);

        Ok(self
            .deliver(OutgoingEmail {
                to: user.email.clone(),
                subject: "Password Reset Request".to_string(),
                body: format!(
                    "Hello {},\n\nClick the link below to reset your password:\n\n{link}\n\nIf you did not request this, ignore this email.",
                    user.username
                ),
            })
            .await)
    }

    /// Set a new password using a reset token.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<User, AccountError> {
        let claims = self.decode(token, TokenPurpose::PasswordReset, TOKEN_INVALID)?;
        validation::validate_password(new_password).map_err(AccountError::InvalidInput)?;

        let mut user = self
            .users
            .get_by_email(&claims.email)
            .await
            .map_err(storage)?
            .ok_or_else(|| AccountError::InvalidToken(TOKEN_INVALID.to_string()))?;

        user.password_hash = self
            .passwords
            .hash_password(new_password)
            .map_err(AccountError::CryptoError)?;
        let user = self.users.update(&user).await.map_err(storage)?;
        tracing::info!(user_id = %user.id, "password reset");
        Ok(user)
    }

    /// Email a confirmation link for a new address to that address.
    pub async fn change_email(&self, user: &User, new_email: &str) -> Result<bool, AccountError> {
        let new_email = new_email.trim();
        validation::validate_email(new_email).map_err(AccountError::InvalidInput)?;
        if self.users.get_by_email(new_email).await.map_err(storage)?.is_some() {
            return Err(AccountError::EmailInUse);
        }

        let token = self.issue_token(
            TokenClaims::new(TokenPurpose::ChangeEmail, &user.email, Utc::now().timestamp())
                .with_new_email(new_email),
        )?;
        let link = format!("{}/api/v1/account/email/verify/{token}", self.settings.public_url);

        Ok(self
            .deliver(OutgoingEmail {
                to: new_email.to_string(),
                subject: "Confirm Your New Email".to_string(),
                body: format!(
                    "Hello {},\n\nClick the link below to confirm your new email:\n\n{link}\n\nIf you did not request this, ignore this email.",
                    user.username
                ),
            })
            .await)
    }

    /// Apply a confirmed email change for the signed-in user.
    pub async fn verify_new_email(&self, user: &User, token: &str) -> Result<User, AccountError> {
        let claims = self.decode(token, TokenPurpose::ChangeEmail, TOKEN_INVALID)?;
        let new_email = match claims.new_email {
            Some(new_email) if claims.email == user.email => new_email,
            _ => return Err(AccountError::InvalidToken(TOKEN_INVALID.to_string())),
        };

        if self.users.get_by_email(&new_email).await.map_err(storage)?.is_some() {
            return Err(AccountError::EmailInUse);
        }

        let mut updated = user.clone();
        updated.email = new_email;
        let updated = self.users.update(&updated).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AccountError::EmailInUse,
            other => storage(other),
        })?;
        tracing::info!(user_id = %updated.id, "email changed");
        Ok(updated)
    }

    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, AccountError> {
        if !self.passwords.verify_password(current_password, &user.password_hash) {
            return Err(AccountError::IncorrectPassword);
        }
        validation::validate_password(new_password).map_err(AccountError::InvalidInput)?;

        let mut updated = user.clone();
        updated.password_hash = self
            .passwords
            .hash_password(new_password)
            .map_err(AccountError::CryptoError)?;
        let updated = self.users.update(&updated).await.map_err(storage)?;
        tracing::info!(user_id = %updated.id, "password changed");
        Ok(updated)
    }

    pub async fn get_user(&self, id: &UserId) -> Result<User, AccountError> {
        self.users
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(AccountError::UserNotFound)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        self.users.get_by_email(email).await.map_err(storage)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AccountError> {
        self.users.list().await.map_err(storage)
    }

    fn issue_token(&self, claims: TokenClaims) -> Result<String, AccountError> {
        self.signer.sign(&claims).map_err(AccountError::CryptoError)
    }

    fn decode(
        &self,
        token: &str,
        purpose: TokenPurpose,
        invalid_message: &str,
    ) -> Result<TokenClaims, AccountError> {
        let invalid = || AccountError::InvalidToken(invalid_message.to_string());
        let claims = self.signer.verify(token).map_err(|e| {
            tracing::debug!(error = %e, %purpose, "token rejected");
            invalid()
        })?;
        if !claims_are_current(&claims, purpose, Utc::now(), self.settings.token_ttl_secs) {
            return Err(invalid());
        }
        Ok(claims)
    }

    async fn deliver(&self, email: OutgoingEmail) -> bool {
        match self.mailer.send(&email).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    to = %email.to,
                    subject = %email.subject,
                    error = %e,
                    "email send failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_current_within_ttl() {
        let now = Utc::now();
        let claims = TokenClaims::new(TokenPurpose::VerifyEmail, "a@b.co", now.timestamp() - 10);
        assert!(claims_are_current(&claims, TokenPurpose::VerifyEmail, now, 3600));
    }

    #[test]
    fn test_claims_expired() {
        let now = Utc::now();
        let claims =
            TokenClaims::new(TokenPurpose::PasswordReset, "a@b.co", now.timestamp() - 3601);
        assert!(!claims_are_current(&claims, TokenPurpose::PasswordReset, now, 3600));
    }

    #[test]
    fn test_claims_wrong_purpose() {
        let now = Utc::now();
        let claims = TokenClaims::new(TokenPurpose::VerifyEmail, "a@b.co", now.timestamp());
        assert!(!claims_are_current(&claims, TokenPurpose::PasswordReset, now, 3600));
    }

    #[test]
    fn test_claims_from_the_future_rejected() {
        let now = Utc::now();
        let claims = TokenClaims::new(TokenPurpose::VerifyEmail, "a@b.co", now.timestamp() + 60);
        assert!(!claims_are_current(&claims, TokenPurpose::VerifyEmail, now, 3600));
    }

    #[test]
    fn test_settings_trim_trailing_slash() {
        let config = AppConfig {
            public_url: "https://snap.example.com/".to_string(),
            ..AppConfig::default()
        };
        let settings = AccountSettings::from(&config);
        assert_eq!(settings.public_url, "https://snap.example.com");
    }
}
