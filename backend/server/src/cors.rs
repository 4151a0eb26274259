//! # Cross-Origin Policy
//!
//! Only the configured browser origins may call the relay.
//!
//! A plain `CorsLayer` only withholds the `Access-Control-Allow-*` headers; the
//! handler still runs and the upstream still gets called. [`origin_guard`]
//! sits in front of it and answers 403 for any request carrying a foreign
//! `Origin`, preflights included. Requests without an `Origin` header come
//! from non-browser clients (the `form` CLI, curl) and are let through.
use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::State,
    http::{
        HeaderName, HeaderValue, Method, Request,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::{error::AppError, state::RelayState};

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

pub fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, X_REQUESTED_WITH, CONTENT_TYPE, ACCEPT, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}

pub async fn origin_guard(
    State(state): State<Arc<RelayState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(ORIGIN) {
        if !state.is_allowed_origin(origin) {
            warn!(
                "Rejected {} {} from origin {:?}",
                request.method(),
                request.uri(),
                origin
            );

            return AppError::OriginNotAllowed.into_response();
        }
    }

    next.run(request).await
}
