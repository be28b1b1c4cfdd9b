use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, info, instrument};

use super::domain::{Account, AuthSession, Claims, LoginInput, Principal};
use super::errors::AuthError;
use super::password::verify_password;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), issuer: "logistic_company".into(), token_ttl_hours: 24 }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Authenticate an employee or client and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{Account, LoginInput};
    /// use service::auth::password::hash_password;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// repo.insert(Account {
    ///     id: uuid::Uuid::new_v4(),
    ///     email: "courier@example.com".into(),
    ///     role: models::Role::Courier,
    ///     password_hash: hash_password("Passw0rd!", 4).unwrap(),
    /// });
    /// let svc = AuthService::new(repo, AuthConfig::new("secret"));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "courier@example.com".into(), password: "Passw0rd!".into() })).unwrap();
    /// assert_eq!(session.principal.role, models::Role::Courier);
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let account = self.repo
            .find_account_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&input.password, &account.password_hash)? {
            debug!(account_id = %account.id, "password_mismatch");
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&account)?;
        info!(account_id = %account.id, role = %account.role, "user_logged_in");
        Ok(AuthSession { principal: Principal::from(&account), token })
    }

    pub fn issue_token(&self, account: &Account) -> Result<String, AuthError> {
        let exp = (Utc::now() + Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
            iss: self.cfg.issuer.clone(),
            exp,
        };
        encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Check signature, expiry and issuer.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.cfg.issuer.as_str()]);
        decode::<Claims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Resolve a token to the account it names, as currently stored.
    ///
    /// Deleted accounts are rejected even while their token is unexpired.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.verify_token(token)?;
        let account = self.repo
            .find_account(claims.id, claims.role)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        Ok(Principal::from(&account))
    }
}
