use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_current_user::get_current_user;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::update_current_user::update_current_user;
use super::middleware::optional_authentication;
use super::middleware::require_authentication;
use crate::domain::user::ports::UserServicePort;

pub struct AppState<S: UserServicePort> {
    pub user_service: Arc<S>,
}

impl<S: UserServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
        }
    }
}

pub fn create_router<S: UserServicePort>(user_service: Arc<S>) -> Router {
    let state = AppState { user_service };

    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/auth/register", post(register::<S>))
        .route("/api/v1/auth/login", post(login::<S>));

    let optional_routes = Router::new()
        .route("/api/v1/users/:user_id", get(get_user::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_authentication::<S>,
        ));

    let protected_routes = Router::new()
        .route(
            "/api/v1/users/me",
            get(get_current_user::<S>).put(update_current_user::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_authentication::<S>,
        ));

    // Headers stay out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(optional_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
