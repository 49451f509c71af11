use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::enums::PaymentStatus;

/// Result notification posted by the payment gateway.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallback {
    pub order_id: Uuid,
    pub request_id: String,
    pub amount: i64,
    /// `0` means the payment went through.
    pub result_code: i32,
    pub message: String,
    pub trans_id: String,
    /// Hex HMAC-SHA256 of the other fields.
    pub signature: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}
