use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use base64::Engine;
use sea_orm::DatabaseConnection;
use service::{cache::CacheClient, object::ObjectClient};

use crate::errors::ApiError;

/// Hardcoded demo credential, accepted alongside the configured secret.
/// This gate is demo behavior, not a security boundary.
pub const DEMO_TOKEN: &str = "letmein-demo";

#[derive(Clone)]
pub struct GateConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cache: CacheClient,
    pub objects: Option<ObjectClient>,
    pub auth: GateConfig,
    pub env: String,
}

/// Outcome of classifying a request's credentials.
#[derive(Debug, PartialEq)]
enum Gate {
    /// No credential presented: the request proceeds as the demo default
    /// identity (deliberately permissive).
    Anonymous,
    Accepted,
    Rejected,
}

/// Pure credential check against the shared secret. Accepts a Bearer token
/// equal to the secret or the demo token, or a Basic credential whose
/// decoded payload (or password part) equals the secret.
fn classify(authorization: Option<&str>, secret: &str) -> Gate {
    let Some(header) = authorization else {
        return Gate::Anonymous;
    };
    if let Some(token) = header.strip_prefix("Bearer ") {
        if token == secret || token == DEMO_TOKEN {
            return Gate::Accepted;
        }
        return Gate::Rejected;
    }
    if let Some(encoded) = header.strip_prefix("Basic ") {
        let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(encoded) else {
            return Gate::Rejected;
        };
        let Ok(payload) = String::from_utf8(decoded) else {
            return Gate::Rejected;
        };
        let password = payload.split_once(':').map(|(_, pw)| pw).unwrap_or(payload.as_str());
        if payload == secret || password == secret {
            return Gate::Accepted;
        }
        return Gate::Rejected;
    }
    Gate::Rejected
}

/// Middleware on the protected API routes. Public paths (healthz, readyz,
/// metrics, static assets) live on a separate router and never reach this.
pub async fn require_shared_secret(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // CORS 预检直接放行
    if req.method() == axum::http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path().to_string();
    let authorization = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    match classify(authorization.as_deref(), &state.auth.secret) {
        Gate::Anonymous => {
            tracing::debug!(path = %path, "no credentials presented; demo default identity");
            Ok(next.run(req).await)
        }
        Gate::Accepted => Ok(next.run(req).await),
        Gate::Rejected => {
            tracing::warn!(path = %path, "credential rejected");
            Err(ApiError::unauthorized("invalid credentials"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "topsecret";

    #[test]
    fn missing_credentials_pass_as_anonymous() {
        assert_eq!(classify(None, SECRET), Gate::Anonymous);
    }

    #[test]
    fn bearer_secret_accepted() {
        assert_eq!(classify(Some("Bearer topsecret"), SECRET), Gate::Accepted);
    }

    #[test]
    fn demo_token_accepted() {
        let header = format!("Bearer {DEMO_TOKEN}");
        assert_eq!(classify(Some(&header), SECRET), Gate::Accepted);
    }

    #[test]
    fn wrong_bearer_rejected() {
        assert_eq!(classify(Some("Bearer nope"), SECRET), Gate::Rejected);
    }

    #[test]
    fn basic_password_accepted() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("alice:topsecret");
        let header = format!("Basic {encoded}");
        assert_eq!(classify(Some(&header), SECRET), Gate::Accepted);
    }

    #[test]
    fn basic_bare_secret_accepted() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("topsecret");
        let header = format!("Basic {encoded}");
        assert_eq!(classify(Some(&header), SECRET), Gate::Accepted);
    }

    #[test]
    fn basic_wrong_password_rejected() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("alice:wrong");
        let header = format!("Basic {encoded}");
        assert_eq!(classify(Some(&header), SECRET), Gate::Rejected);
    }

    #[test]
    fn unknown_scheme_rejected() {
        assert_eq!(classify(Some("Digest abc"), SECRET), Gate::Rejected);
    }
}
