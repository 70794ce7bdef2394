//! Bearer authentication
//!
//! `AuthUser` requires a valid token. `OptionalAuthUser` lets anonymous
//! callers through but still rejects a token that is present and bad.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use realm_core::Snowflake;

use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Snowflake,
}

#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<Snowflake> {
        self.0.map(|auth| auth.user_id)
    }
}

/// `None` when there is no usable `Authorization: Bearer` header
async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
        .await
        .ok()
        .flatten()
        .map(|TypedHeader(auth)| auth.token().to_owned())
}

fn verify(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    match state.jwt_service().authenticate(token) {
        Ok(user_id) => Ok(AuthUser { user_id }),
        Err(e) => {
            tracing::warn!(error = %e, "Rejected bearer token");
            Err(ApiError::InvalidToken)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await.ok_or(ApiError::MissingAuth)?;
        verify(&AppState::from_ref(state), &token)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match bearer_token(parts, state).await {
            Some(token) => verify(&AppState::from_ref(state), &token).map(|u| Self(Some(u))),
            None => Ok(Self(None)),
        }
    }
}
