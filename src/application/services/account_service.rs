//! Account registration and credential checks.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::keys::{PASSWORD_HASH_FIELD, user_key};
use crate::error::AppError;
use crate::infrastructure::store::KvStore;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::username::validate_username;

/// Service owning user accounts (`user:{username}` hashes).
///
/// Accounts are only ever created; there is no update or delete path.
pub struct AccountService {
    store: Arc<dyn KvStore>,
}

impl AccountService {
    /// Creates a new account service on top of the given store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Returns whether an account with this username exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn user_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.store.exists(&user_key(username)).await?)
    }

    /// Registers a new account with an Argon2id hash of `password`.
    ///
    /// The hash field is written with a set-if-absent, so two concurrent
    /// registrations of the same name cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username breaks the naming rules.
    /// Returns [`AppError::Conflict`] if the username is taken; the existing
    /// account is left untouched.
    /// Returns [`AppError::Internal`] on store or hashing errors.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<(), AppError> {
        validate_username(username)?;

        let key = user_key(username);

        if self.store.exists(&key).await? {
            return Err(username_taken(username));
        }

        let password_hash = hash_password(password)?;

        if !self
            .store
            .hset_if_absent(&key, PASSWORD_HASH_FIELD, &password_hash)
            .await?
        {
            return Err(username_taken(username));
        }

        info!(username, "Account created");
        Ok(())
    }

    /// Checks a username/password pair.
    ///
    /// Returns `false` for unknown users and wrong passwords alike.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn verify_user(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let Some(stored_hash) = self
            .store
            .hget(&user_key(username), PASSWORD_HASH_FIELD)
            .await?
        else {
            return Ok(false);
        };

        match verify_password(password, &stored_hash) {
            Ok(matches) => Ok(matches),
            Err(e) => {
                warn!(username, "Rejecting login: {}", e);
                Ok(false)
            }
        }
    }
}

fn username_taken(username: &str) -> AppError {
    AppError::conflict(
        "Username already registered",
        json!({ "username": username }),
    )
}
