// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    error::ApiError,
    models::{OrderConfirmationRequest, OrderConfirmationResponse},
    state::AppState,
    validation::OrderNotice,
};

#[utoipa::path(
    post,
    path = "/api/user/send-order-confirmation",
    request_body = OrderConfirmationRequest,
    tag = "Orders",
    responses(
        (status = 200, body = OrderConfirmationResponse),
        (status = 400, description = "Validation failed"),
        (status = 429, description = "Too many email requests"),
        (status = 500, description = "Failed to send email")
    )
)]
pub async fn send_order_confirmation(
    State(state): State<AppState>,
    payload: Result<Json<OrderConfirmationRequest>, JsonRejection>,
) -> Result<Json<OrderConfirmationResponse>, ApiError> {
    let Json(request) = payload?;
    let notice = OrderNotice::try_from(request)?;

    state
        .orders
        .notify(notice)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Failed to send email"))?;

    Ok(Json(OrderConfirmationResponse { success: true }))
}
