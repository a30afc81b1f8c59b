//! Bearer session token extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::sessions::SessionHandle;

/// The caller's live report session.
///
/// Rejects with 401 when the token is missing, unknown, or idle too long.
#[derive(Clone)]
pub struct OfficerSession {
    pub token: String,
    pub handle: SessionHandle,
}

#[async_trait]
impl FromRequestParts<AppState> for OfficerSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    ApiError::Unauthorized("Missing or malformed Authorization header".to_string())
                })?;

        let token = bearer.token().to_string();
        let handle = state
            .reports
            .session(&token)
            .ok_or_else(|| ApiError::Unauthorized("Session expired or not found".to_string()))?;

        Ok(Self { token, handle })
    }
}

impl std::fmt::Debug for OfficerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfficerSession").finish_non_exhaustive()
    }
}
