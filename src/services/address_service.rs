use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressList, CreateAddressRequest, UpdateAddressRequest},
    entity::{Addresses, Orders, addresses, orders},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Address,
    response::{ApiResponse, Meta},
    state::AppState,
};

use addresses::{ActiveModel as AddressActive, Column as AddressCol};

fn validate_coordinates(latitude: f64, longitude: f64) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::bad_request("Coordinates are out of range"));
    }
    Ok(())
}

pub async fn list_addresses(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AddressList>> {
    let items: Vec<Address> = Addresses::find()
        .filter(AddressCol::UserId.eq(user.user_id))
        .order_by_asc(AddressCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        AddressList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("Address name is required"));
    }
    validate_coordinates(payload.latitude, payload.longitude)?;

    let address = AddressActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(Some(user.user_id)),
        name: Set(payload.name.trim().to_string()),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Address created",
        address.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAddressRequest,
) -> AppResult<ApiResponse<Address>> {
    let existing = own_address(state, user, id).await?;
    validate_coordinates(
        payload.latitude.unwrap_or(existing.latitude),
        payload.longitude.unwrap_or(existing.longitude),
    )?;

    let mut active: AddressActive = existing.into();
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::bad_request("Address name is required"));
        }
        active.name = Set(name.trim().to_string());
    }
    if let Some(latitude) = payload.latitude {
        active.latitude = Set(latitude);
    }
    if let Some(longitude) = payload.longitude {
        active.longitude = Set(longitude);
    }
    let address = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Address updated",
        address.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let address = own_address(state, user, id).await?;

    let used = Orders::find()
        .filter(orders::Column::AddressId.eq(address.id))
        .count(&state.orm)
        .await?;
    if used > 0 {
        return Err(AppError::bad_request(
            "Address is used by an order and cannot be deleted",
        ));
    }

    address.delete(&state.orm).await?;
    Ok(crate::response::empty("Address deleted"))
}

async fn own_address(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<addresses::Model> {
    Addresses::find_by_id(id)
        .one(&state.orm)
        .await?
        .filter(|address| address.user_id == Some(user.user_id))
        .ok_or(AppError::NotFound)
}
