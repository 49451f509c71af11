use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::enums::UserRole;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub fullname: String,
    pub username: String,
    pub phone_number: Option<String>,
    /// `CUSTOMER` (default) or `RESTAURANT_USER`.
    pub role: Option<UserRole>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateProfileRequest {
    pub fullname: Option<String>,
    pub phone_number: Option<String>,
    pub fcm_token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub exp: usize,
}
