use std::sync::Arc;

use argon2::{Argon2, Params};
use serde::Serialize;

use super::errors::AuthError;
use super::password::{hash_password, hasher, verify_password};
use crate::shared::errors::ValidationError;
use crate::storage::keys::{user_id_key, user_name_key, user_password_key};
use crate::storage::KeyValueStore;

/// What the sign-up form submits.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
}

/// Trims and lowercases an email so it can be used as a storage namespace.
pub fn normalize_identity(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Credential records kept in the key-value store.
pub struct Accounts<S> {
    backend: Arc<S>,
    argon2: Argon2<'static>,
}

impl<S: KeyValueStore> Accounts<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self {
            backend,
            argon2: Argon2::default(),
        }
    }

    /// Uses custom Argon2id costs for new hashes.
    pub fn with_hash_params(backend: Arc<S>, params: Params) -> Self {
        Self {
            backend,
            argon2: hasher(params),
        }
    }

    pub async fn sign_up(&self, form: SignUp) -> Result<UserProfile, AuthError> {
        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        let user_id = normalize_identity(&form.email);
        if user_id.is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        if form.password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }
        if form.confirm_password.is_empty() {
            return Err(ValidationError::MissingField("confirm_password").into());
        }
        if form.password != form.confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        if self.exists(&user_id).await? {
            tracing::info!(target: "auth", user = %user_id, "Sign-up rejected, account exists");
            return Err(AuthError::AccountExists);
        }

        let password_hash = hash_password(&self.argon2, &form.password)?;

        // Password goes last: an interrupted sign-up leaves no usable account
        self.backend.set(&user_name_key(&user_id), &name).await?;
        self.backend.set(&user_id_key(&user_id), &user_id).await?;
        self.backend
            .set(&user_password_key(&user_id), &password_hash)
            .await?;

        tracing::info!(target: "auth", user = %user_id, "Account created");

        Ok(UserProfile {
            user_id,
            display_name: name,
        })
    }

    /// Checks a password against the stored hash. Unknown users never verify.
    pub async fn verify(&self, user_id: &str, password: &str) -> Result<bool, AuthError> {
        let user_id = normalize_identity(user_id);
        let Some(stored) = self.backend.get(&user_password_key(&user_id)).await? else {
            return Ok(false);
        };

        match verify_password(password, &stored) {
            Ok(valid) => Ok(valid),
            Err(e) => {
                tracing::warn!(target: "auth", user = %user_id, error = %e, "Stored credential is not a password hash");
                Ok(false)
            }
        }
    }

    pub async fn log_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let user_id = normalize_identity(email);
        if user_id.is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }

        if !self.verify(&user_id, password).await? {
            tracing::info!(target: "auth", user = %user_id, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let display_name = self.display_name(&user_id).await?.unwrap_or_default();
        tracing::info!(target: "auth", user = %user_id, "Login succeeded");

        Ok(UserProfile {
            user_id,
            display_name,
        })
    }

    pub async fn display_name(&self, user_id: &str) -> Result<Option<String>, AuthError> {
        let user_id = normalize_identity(user_id);
        Ok(self.backend.get(&user_name_key(&user_id)).await?)
    }

    async fn exists(&self, user_id: &str) -> Result<bool, AuthError> {
        Ok(self
            .backend
            .get(&user_password_key(user_id))
            .await?
            .is_some())
    }
}
