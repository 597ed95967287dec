use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config_loader;

/// Claims minted by the external identity collaborator. Verification of who
/// gets a token with which role happens there; this layer only checks the
/// signature and expiry and extracts the caller's id.
#[derive(Debug, Serialize, Deserialize)]
pub struct PayoutClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

pub const ROLE_CREATOR: &str = "creator";
pub const ROLE_OPERATOR: &str = "operator";

#[derive(Debug, Clone)]
pub struct AuthCreator {
    pub creator_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct AuthOperator {
    pub operator_id: Uuid,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

pub fn validate_payout_jwt(token: &str) -> Result<PayoutClaims, AuthError> {
    let auth_secret = config_loader::get_auth_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load auth secret: {}", e))?;

    let decoding_key = DecodingKey::from_secret(auth_secret.secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<PayoutClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

pub fn require_role(claims: &PayoutClaims, role: &str) -> Result<Uuid, AuthError> {
    if claims.role != role {
        return Err(AuthError(anyhow::anyhow!(
            "role {} required, token carries {}",
            role,
            claims.role
        )));
    }

    Uuid::parse_str(&claims.sub)
        .map_err(|_| AuthError(anyhow::anyhow!("subject is not a valid id")))
}

fn bearer_token(parts: &Parts) -> Result<&str, (StatusCode, String)> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        ))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        )
    })?;

    auth_str.strip_prefix("Bearer ").ok_or((
        StatusCode::UNAUTHORIZED,
        "Invalid Authorization header format".to_string(),
    ))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthCreator
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_payout_jwt(token)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.0.to_string()))?;
        let creator_id = require_role(&claims, ROLE_CREATOR)
            .map_err(|e| (StatusCode::FORBIDDEN, e.0.to_string()))?;

        Ok(AuthCreator { creator_id })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthOperator
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_payout_jwt(token)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.0.to_string()))?;
        let operator_id = require_role(&claims, ROLE_OPERATOR)
            .map_err(|e| (StatusCode::FORBIDDEN, e.0.to_string()))?;

        Ok(AuthOperator { operator_id })
    }
}
