//! Bearer token extractors for owners and guests.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use inbound_auth::EncryptedToken;
use inbound_core::error::AppError;
use inbound_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

fn bearer(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))
}

fn owner_context(parts: &Parts, state: &AppState) -> Result<RequestContext, AppError> {
    let token = bearer(parts)?;
    let claims = state.jwt_decoder.decode_access_token(token)?;
    Ok(RequestContext::new(claims.sub, claims.name.unwrap_or_default()))
}

/// Owner if a valid access token is present, otherwise nothing.
///
/// Lets the handler's service decide when anonymity becomes an error.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<RequestContext>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(owner_context(parts, state).ok()))
    }
}

/// Guest identified by an encrypted guest token.
#[derive(Debug, Clone, Copy)]
pub struct GuestUser {
    /// Guest account id from the verified token.
    pub guest_id: Uuid,
    /// Invite the token was issued for.
    pub invite_id: Uuid,
}

impl FromRequestParts<AppState> for GuestUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = EncryptedToken::new(bearer(parts)?);
        let claims = state.credential_issuer.verify(&token)?;
        let invite_id = claims
            .invite_id
            .ok_or_else(|| AppError::unauthorized("Guest token is not bound to an invite"))?;
        Ok(Self {
            guest_id: claims.sub,
            invite_id,
        })
    }
}
