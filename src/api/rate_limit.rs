// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    policy::{GateDecision, RequestGate},
    state::AppState,
};

pub const SIGNUP_LIMITED: &str = "Too many signup attempts. Try again later.";
pub const EMAIL_LIMITED: &str = "Too many email requests from this IP, please try again later";

/// Client address: the peer IP, else the first `X-Forwarded-For` entry.
fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

async fn gated(gate: &dyn RequestGate, message: &'static str, req: Request, next: Next) -> Response {
    let key = client_key(&req);

    match gate.permit(&key) {
        GateDecision::Allowed => next.run(req).await,
        GateDecision::Limited { retry_after } => {
            tracing::warn!(client = %key, path = %req.uri().path(), "Request rate limited");

            // Round up so clients never retry a second early.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response = (StatusCode::TOO_MANY_REQUESTS, message).into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}

/// Per-address gate for `POST /signup`.
pub async fn signup_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    gated(state.signup_gate.as_ref(), SIGNUP_LIMITED, req, next).await
}

/// Per-address gate for `POST /send-order-confirmation`.
pub async fn email_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    gated(state.email_gate.as_ref(), EMAIL_LIMITED, req, next).await
}
