//! Organization schema settings API.
//!
//! Routes:
//! - GET  /schema         : global organization record
//! - POST /schema         : sanitize and save the global record
//! - GET  /default-schema : default (minimal) organization record
//! - POST /default-schema : sanitize and save the default record
//! - GET  /health         : liveness, unauthenticated
//!
//! Every schema route requires `Authorization: Bearer <adminToken>`.

use std::sync::{Arc, Mutex};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use schema_dropin::{CacheInvalidator, OrganizationSettings, SchemaError, SettingsStore};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Validation(message) => AppError::Validation(message),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &self {
            AppError::Internal(detail) => {
                tracing::error!("Request failed: {}", detail);
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

pub struct AppState<S, C> {
    settings: Arc<Mutex<OrganizationSettings<S, C>>>,
    admin_token: Option<Arc<str>>,
}

impl<S, C> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            admin_token: self.admin_token.clone(),
        }
    }
}

impl<S, C> AppState<S, C> {
    pub fn new(settings: OrganizationSettings<S, C>, admin_token: Option<String>) -> Self {
        Self {
            settings: Arc::new(Mutex::new(settings)),
            admin_token: admin_token.map(Arc::from),
        }
    }

    fn with_settings<T>(
        &self,
        f: impl FnOnce(&mut OrganizationSettings<S, C>) -> Result<T, SchemaError>,
    ) -> Result<T, AppError> {
        let mut settings = self
            .settings
            .lock()
            .map_err(|_| AppError::Internal("settings lock poisoned".into()))?;
        f(&mut settings).map_err(AppError::from)
    }
}

/// Assemble the settings router.
pub fn app<S, C>(state: AppState<S, C>) -> Router
where
    S: SettingsStore + Send + 'static,
    C: CacheInvalidator + Send + 'static,
{
    let api = Router::new()
        .route("/schema", get(get_schema::<S, C>).post(update_schema::<S, C>))
        .route(
            "/default-schema",
            get(get_default_schema::<S, C>).post(update_default_schema::<S, C>),
        )
        .layer(from_fn_with_state(state.admin_token.clone(), require_admin))
        .with_state(state);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(api)
        .layer(TraceLayer::new_for_http())
}

async fn require_admin(
    State(token): State<Option<Arc<str>>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = token else {
        return Err(AppError::Unauthorized(
            "no admin token configured for this server".into(),
        ));
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(provided) if provided == &*expected => Ok(next.run(request).await),
        Some(_) => Err(AppError::Unauthorized("invalid bearer token".into())),
        None => Err(AppError::Unauthorized("missing bearer token".into())),
    }
}

fn body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

async fn get_schema<S, C>(State(state): State<AppState<S, C>>) -> Result<Json<Value>, AppError>
where
    S: SettingsStore + Send + 'static,
    C: CacheInvalidator + Send + 'static,
{
    let record = state.with_settings(|settings| settings.global())?;
    Ok(Json(to_json(&record)?))
}

async fn update_schema<S, C>(
    State(state): State<AppState<S, C>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError>
where
    S: SettingsStore + Send + 'static,
    C: CacheInvalidator + Send + 'static,
{
    let data = body(payload)?;
    let record = state.with_settings(|settings| settings.update_global(&data))?;
    Ok(Json(to_json(&record)?))
}

async fn get_default_schema<S, C>(
    State(state): State<AppState<S, C>>,
) -> Result<Json<Value>, AppError>
where
    S: SettingsStore + Send + 'static,
    C: CacheInvalidator + Send + 'static,
{
    let record = state.with_settings(|settings| settings.default_record())?;
    Ok(Json(to_json(&record)?))
}

async fn update_default_schema<S, C>(
    State(state): State<AppState<S, C>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError>
where
    S: SettingsStore + Send + 'static,
    C: CacheInvalidator + Send + 'static,
{
    let data = body(payload)?;
    let record = state.with_settings(|settings| settings.update_default(&data))?;
    Ok(Json(to_json(&record)?))
}

fn to_json<T: serde::Serialize>(record: &T) -> Result<Value, AppError> {
    serde_json::to_value(record).map_err(|e| AppError::Internal(e.to_string()))
}
