//! Authentication service: credential checks and session lifecycle

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    auth::{Claims, RevocationRegistry, TokenError, TokenIssuer},
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::User,
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    issuer: TokenIssuer,
    revocations: Arc<RevocationRegistry>,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        let issuer = TokenIssuer::new(config.jwt_secret.clone(), config.jwt_expiration_hours);
        Self {
            repository,
            config,
            issuer,
            revocations: Arc::new(RevocationRegistry::new()),
        }
    }

    /// Authenticate by username and password and return a fresh JWT.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Bad username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Bad username or password".to_string()));
        }

        let (token, claims) = self.issuer.issue(&user)?;
        tracing::debug!(user_id = user.id, jti = %claims.jti, "access token issued");

        Ok(token)
    }

    /// Validate a presented bearer token against signature, expiry and the
    /// revocation registry.
    pub fn authorize(&self, token: &str) -> Result<Claims, TokenError> {
        self.issuer.authorize(token, &self.revocations)
    }

    /// Revoke the presented token's jti. Idempotent; the gate itself never
    /// revokes, only an explicit logout does.
    pub fn logout(&self, claims: &Claims) {
        self.revocations.revoke(&claims.jti, claims.exp);
        tracing::debug!(user_id = claims.user_id, jti = %claims.jti, "token revoked");
    }

    /// Sweep revocation entries for tokens that have expired on their own.
    pub fn prune_revoked(&self) -> usize {
        self.revocations.prune_expired(Utc::now().timestamp())
    }

    /// Create the seed account when it does not exist yet. There is no
    /// registration endpoint, so this is the only way users come to be.
    pub async fn ensure_seed_user(&self) -> AppResult<()> {
        if self
            .repository
            .users
            .get_by_username(&self.config.seed_login)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let hash = self.hash_password(&self.config.seed_password)?;
        let user = self
            .repository
            .users
            .create(&self.config.seed_login, &hash)
            .await?;

        tracing::info!("Seeded user '{}' (id {})", user.username, user.id);
        Ok(())
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn service() -> AuthService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let service = AuthService::new(Repository::new(pool), AuthConfig::default());
        service.ensure_seed_user().await.unwrap();
        service
    }

    #[tokio::test]
    async fn login_issues_token_for_seeded_user() {
        let service = service().await;
        let token = service.login("admin", "admin").await.unwrap();

        let claims = service.authorize(&token).unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let service = service().await;
        let err = service.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn login_rejects_unknown_user() {
        let service = service().await;
        let err = service.login("nobody", "admin").await.unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[tokio::test]
    async fn failed_login_leaves_revocations_unchanged() {
        let service = service().await;
        let _ = service.login("admin", "wrong").await;
        assert!(service.revocations.is_empty());
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let service = service().await;
        service.ensure_seed_user().await.unwrap();
        assert_eq!(service.repository.users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn logout_revokes_token_for_all_subsequent_checks() {
        let service = service().await;
        let token = service.login("admin", "admin").await.unwrap();
        let claims = service.authorize(&token).unwrap();

        service.logout(&claims);
        assert_eq!(service.authorize(&token), Err(TokenError::Revoked));
        // Stays revoked.
        assert_eq!(service.authorize(&token), Err(TokenError::Revoked));

        // Logging out again with the same token is a no-op.
        service.logout(&claims);
        assert_eq!(service.revocations.len(), 1);
    }

    #[tokio::test]
    async fn logout_does_not_affect_other_sessions() {
        let service = service().await;
        let first = service.login("admin", "admin").await.unwrap();
        let second = service.login("admin", "admin").await.unwrap();

        let claims = service.authorize(&first).unwrap();
        service.logout(&claims);

        assert_eq!(service.authorize(&first), Err(TokenError::Revoked));
        assert!(service.authorize(&second).is_ok());
    }
}
