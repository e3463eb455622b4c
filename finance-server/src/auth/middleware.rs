//! Authentication and authorization middleware

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::AppError;

use super::jwt::{CurrentUser, JwtError, JwtService};
use crate::security_log;
use crate::state::AppState;

/// Require a valid bearer token on every `/api/` route.
///
/// On success the [`CurrentUser`] is inserted into request extensions.
/// CORS preflight and non-API paths pass through untouched.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || !req.uri().path().starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = req.uri().to_string());
            return Err(AppError::unauthorized());
        }
    };

    let claims = state.jwt.validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.to_string(),
            uri = req.uri().to_string()
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user = CurrentUser::try_from(claims).map_err(|e| AppError::invalid_token(e.to_string()))?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

type MiddlewareFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// Gate a route group behind a permission action.
///
/// ```ignore
/// Router::new()
///     .route("/api/brokers", post(handler::create))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         require_permission(permissions::BROKER_CREATE),
///     ));
/// ```
pub fn require_permission(
    action: &'static str,
) -> impl Fn(State<AppState>, Request, Next) -> MiddlewareFuture + Clone {
    move |State(state): State<AppState>, req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(AppError::unauthorized)?;

            state.gate.check_permission(&user, action).await?;

            Ok(next.run(req).await)
        })
    }
}
