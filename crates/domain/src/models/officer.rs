//! Officer domain models.

use serde::{Deserialize, Serialize};
use shared::validation::{validate_badge_number, validate_not_blank};
use validator::Validate;

/// A provisioned officer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    pub badge_number: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
}

impl Officer {
    /// Identity fields without the credential.
    pub fn identity(&self) -> OfficerIdentity {
        OfficerIdentity {
            badge_number: self.badge_number.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The identity attached to an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerIdentity {
    pub badge_number: String,
    pub full_name: String,
    pub email: String,
}

/// Administrative input for provisioning an officer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOfficer {
    #[validate(custom(function = "validate_badge_number"))]
    pub badge_number: String,

    #[validate(
        length(max = 200, message = "Full name must be at most 200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}
