//! Identity resolution
//!
//! Maps a bearer credential to `Admin | Employee(id) | Unauthenticated`.
//! A valid token whose account has since been removed resolves to
//! `Unauthenticated`.

use shared::models::Identity;
use std::sync::Arc;

use super::jwt::{CurrentUser, JwtError, JwtService};
use super::password::verify_password;
use crate::store::ScheduleStore;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct IdentityResolver {
    jwt: Arc<JwtService>,
    store: Arc<dyn ScheduleStore>,
}

impl IdentityResolver {
    pub fn new(jwt: Arc<JwtService>, store: Arc<dyn ScheduleStore>) -> Self {
        Self { jwt, store }
    }

    /// Validate a token and confirm the account still exists
    pub async fn authenticate(&self, token: &str) -> AppResult<CurrentUser> {
        let claims = self.jwt.validate_token(token).map_err(|e| match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            other => AppError::invalid_token(other.to_string()),
        })?;
        let user = CurrentUser::try_from(claims)
            .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))?;

        let exists = match user.identity {
            Identity::Admin { id } => self.store.get_admin(id).await?.is_some(),
            Identity::Employee { id } => self
                .store
                .get_employee(id)
                .await?
                .is_some_and(|e| e.has_account()),
            Identity::Unauthenticated => false,
        };
        if !exists {
            return Err(AppError::invalid_token("Account no longer exists"));
        }
        Ok(user)
    }

    /// Resolve an opaque credential; every failure collapses to `Unauthenticated`
    pub async fn resolve_identity(&self, credential: Option<&str>) -> Identity {
        let Some(token) = credential else {
            return Identity::Unauthenticated;
        };
        match self.authenticate(token).await {
            Ok(user) => user.identity,
            Err(e) => {
                tracing::debug!(code = %e.code, "Credential did not resolve");
                Identity::Unauthenticated
            }
        }
    }

    /// Check username/password against admins first, then employees
    ///
    /// Returns the identity and canonical username on success.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<(Identity, String)>> {
        let username = username.trim();

        if let Some(admin) = self.store.find_admin_by_username(username).await? {
            return Ok(verify_password(password, &admin.hash_pass)
                .then(|| (Identity::Admin { id: admin.id }, admin.username)));
        }

        if let Some(employee) = self.store.find_employee_by_username(username).await?
            && let (Some(name), Some(hash)) = (employee.username, employee.hash_pass)
        {
            return Ok(verify_password(password, &hash)
                .then_some((Identity::Employee { id: employee.id }, name)));
        }

        Ok(None)
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
