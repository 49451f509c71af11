use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{patch, post},
};
use uuid::Uuid;

use crate::{
    dto::payments::{PaymentCallback, UpdatePaymentStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Payment,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/callback", post(payment_callback))
        .route("/{order_id}", patch(update_payment_status))
}

#[utoipa::path(
    post,
    path = "/api/payments/callback",
    request_body = PaymentCallback,
    responses(
        (status = 200, description = "Gateway result recorded", body = ApiResponse<Payment>),
        (status = 400, description = "Invalid signature or amount"),
        (status = 404, description = "Payment not found")
    ),
    tag = "Payments"
)]
pub async fn payment_callback(
    State(state): State<AppState>,
    Json(payload): Json<PaymentCallback>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let resp = payment_service::handle_callback(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/payments/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment status recorded; FAIL also fails the order", body = ApiResponse<Payment>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Payment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let resp = payment_service::update_payment_status(&state, &user, order_id, payload).await?;
    Ok(Json(resp))
}
