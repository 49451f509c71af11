use chrono::Utc;
use hmac::{Hmac, Mac};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait, sea_query::LockType,
};
use sha2::Sha256;
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::payments::{PaymentCallback, UpdatePaymentStatusRequest},
    entity::{
        Orders, Payments,
        enums::{OrderStatus, PaymentStatus},
        orders, payments,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Payment,
    response::{ApiResponse, Meta},
    state::AppState,
};

type HmacSha256 = Hmac<Sha256>;

/// Set the payment status of an order. A failed payment also fails the
/// order unless the order already reached a final status. Run it on a
/// transaction so both rows change together.
pub async fn record_payment_status<C>(
    conn: &C,
    order_id: Uuid,
    status: PaymentStatus,
) -> AppResult<(orders::Model, payments::Model)>
where
    C: ConnectionTrait,
{
    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;
    let payment = Payments::find()
        .filter(payments::Column::OrderId.eq(order_id))
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let now = Utc::now();
    let mut active: payments::ActiveModel = payment.into();
    active.status = Set(status);
    active.updated_at = Set(now.into());
    let payment = active.update(conn).await?;

    let order = if status == PaymentStatus::Fail && !order.status.is_terminal() {
        let mut active: orders::ActiveModel = order.into();
        active.status = Set(OrderStatus::Fail);
        active.updated_at = Set(now.into());
        active.update(conn).await?
    } else {
        order
    };

    Ok((order, payment))
}

pub async fn update_payment_status(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<Payment>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let (_, payment) = record_payment_status(&txn, order_id, payload.status).await?;
    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "payment_status",
        "payments",
        serde_json::json!({ "order_id": order_id, "status": payload.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment updated",
        payment.into(),
        Some(Meta::empty()),
    ))
}

pub async fn handle_callback(
    state: &AppState,
    payload: PaymentCallback,
) -> AppResult<ApiResponse<Payment>> {
    verify_callback(&state.config.payment_secret, &payload)?;

    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(payload.order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let payment = Payments::find()
        .filter(payments::Column::OrderId.eq(payload.order_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if payment.total_payment != payload.amount {
        return Err(AppError::bad_request("Amount does not match the order total"));
    }

    // only a pending payment on a live order is settled
    if payment.status != PaymentStatus::Pending || order.status.is_terminal() {
        tracing::info!(
            order_id = %order.id,
            trans_id = %payload.trans_id,
            payment_status = ?payment.status,
            order_status = ?order.status,
            "payment callback ignored"
        );
        return Ok(ApiResponse::success(
            "Payment already recorded",
            payment.into(),
            Some(Meta::empty()),
        ));
    }

    let status = if payload.result_code == 0 {
        PaymentStatus::Success
    } else {
        PaymentStatus::Fail
    };
    let (order, payment) = record_payment_status(&txn, payload.order_id, status).await?;
    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        trans_id = %payload.trans_id,
        result_code = payload.result_code,
        "payment callback recorded"
    );
    audit_best_effort(
        &state.orm,
        order.user_id,
        "payment_callback",
        "payments",
        serde_json::json!({
            "order_id": order.id,
            "request_id": payload.request_id,
            "result_code": payload.result_code,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment recorded",
        payment.into(),
        Some(Meta::empty()),
    ))
}

fn signing_payload(callback: &PaymentCallback) -> String {
    format!(
        "amount={}&message={}&orderId={}&requestId={}&resultCode={}&transId={}",
        callback.amount,
        callback.message,
        callback.order_id,
        callback.request_id,
        callback.result_code,
        callback.trans_id,
    )
}

/// Hex HMAC-SHA256 the gateway is expected to send for `callback`.
pub fn sign_callback(secret: &str, callback: &PaymentCallback) -> AppResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    mac.update(signing_payload(callback).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn verify_callback(secret: &str, callback: &PaymentCallback) -> AppResult<()> {
    let signature = hex::decode(callback.signature.trim())
        .map_err(|_| AppError::bad_request("Invalid signature"))?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    mac.update(signing_payload(callback).as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AppError::bad_request("Invalid signature"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callback() -> PaymentCallback {
        PaymentCallback {
            order_id: Uuid::nil(),
            request_id: "req-1".into(),
            amount: 85000,
            result_code: 0,
            message: "Successful.".into(),
            trans_id: "2900001".into(),
            signature: String::new(),
        }
    }

    #[test]
    fn signing_payload_orders_fields_alphabetically() {
        assert_eq!(
            signing_payload(&callback()),
            "amount=85000&message=Successful.&orderId=00000000-0000-0000-0000-000000000000\
             &requestId=req-1&resultCode=0&transId=2900001"
        );
    }

    #[test]
    fn accepts_own_signature() {
        let mut cb = callback();
        cb.signature = sign_callback("secret", &cb).unwrap();
        assert!(verify_callback("secret", &cb).is_ok());
    }

    #[test]
    fn rejects_tampered_amount() {
        let mut cb = callback();
        cb.signature = sign_callback("secret", &cb).unwrap();
        cb.amount = 1;
        assert!(matches!(
            verify_callback("secret", &cb),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_non_hex_signature() {
        let mut cb = callback();
        cb.signature = "not-hex".into();
        assert!(verify_callback("secret", &cb).is_err());
    }
}
