//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of an officer badge number.
pub const MAX_BADGE_LEN: usize = 32;

/// Rejects values that are empty or whitespace only.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a badge number: 1 to 32 ASCII letters, digits or hyphens.
pub fn validate_badge_number(badge: &str) -> Result<(), ValidationError> {
    let well_formed = !badge.is_empty()
        && badge.len() <= MAX_BADGE_LEN
        && badge.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if well_formed {
        Ok(())
    } else {
        let mut err = ValidationError::new("badge_number");
        err.message = Some("Badge number must be 1-32 letters, digits or hyphens".into());
        Err(err)
    }
}
