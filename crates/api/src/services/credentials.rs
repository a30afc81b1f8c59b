//! Credential store: officer provisioning and password verification.

use domain::models::{NewOfficer, Officer, OfficerIdentity};
use persistence::repositories::OfficerRepository;
use shared::password::{hash_password, verify_against_dummy, verify_password, PasswordError};
use sqlx::SqlitePool;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Unknown badge and wrong password are indistinguishable.
    #[error("Invalid badge number or password")]
    InvalidCredentials,

    #[error("Officer with badge number {0} already exists")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Verifies and provisions officer credentials.
#[derive(Clone)]
pub struct CredentialService {
    officers: OfficerRepository,
}

impl CredentialService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            officers: OfficerRepository::new(pool),
        }
    }

    /// Checks a badge/password pair and returns the officer's identity.
    ///
    /// A missing badge still pays for one hash verification.
    pub async fn verify(
        &self,
        badge_number: &str,
        password: &str,
    ) -> Result<OfficerIdentity, CredentialError> {
        let officer: Option<Officer> = self
            .officers
            .find_by_badge(badge_number)
            .await?
            .map(Into::into);

        let password = password.to_string();
        let (officer, matched) = tokio::task::spawn_blocking(move || match officer {
            Some(officer) => {
                let matched = match verify_password(&password, &officer.password_hash) {
                    Ok(matched) => matched,
                    Err(e) => {
                        tracing::error!(
                            badge_number = %officer.badge_number,
                            error = %e,
                            "Stored password hash is unusable"
                        );
                        false
                    }
                };
                (Some(officer), matched)
            }
            None => (None, verify_against_dummy(&password)),
        })
        .await
        .map_err(|e| CredentialError::Internal(e.to_string()))?;

        match officer {
            Some(officer) if matched => Ok(officer.identity()),
            _ => Err(CredentialError::InvalidCredentials),
        }
    }

    /// Provisions a new officer. Existing badges are never overwritten.
    pub async fn provision(&self, input: NewOfficer) -> Result<OfficerIdentity, CredentialError> {
        input.validate()?;

        let password = input.password.clone();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| CredentialError::Internal(e.to_string()))??;

        let inserted = self
            .officers
            .insert(
                &input.badge_number,
                input.full_name.trim(),
                &input.email,
                hash.as_bytes(),
            )
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    CredentialError::AlreadyExists(input.badge_number.clone())
                }
                other => CredentialError::Database(other),
            })?;

        tracing::info!(badge_number = %inserted.badge_number, "Officer provisioned");
        Ok(Officer::from(inserted).identity())
    }

    pub async fn find(&self, badge_number: &str) -> Result<Option<OfficerIdentity>, CredentialError> {
        Ok(self
            .officers
            .find_by_badge(badge_number)
            .await?
            .map(|entity| Officer::from(entity).identity()))
    }

    pub async fn list(&self) -> Result<Vec<OfficerIdentity>, CredentialError> {
        Ok(self
            .officers
            .list()
            .await?
            .into_iter()
            .map(|entity| Officer::from(entity).identity())
            .collect())
    }
}
