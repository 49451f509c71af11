use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::follows::FollowedRestaurantList,
    entity::{Follows, Restaurants, enums::FollowStatus, follows, restaurants},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer},
    models::{Follow, Restaurant},
    response::{ApiResponse, Meta},
    state::AppState,
};

use follows::{ActiveModel as FollowActive, Column as FollowCol};

pub async fn follow(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<Follow>> {
    let follow = set_status(state, user, restaurant_id, FollowStatus::Follow).await?;
    Ok(ApiResponse::success(
        "Restaurant followed",
        follow,
        Some(Meta::empty()),
    ))
}

pub async fn unfollow(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<Follow>> {
    let follow = set_status(state, user, restaurant_id, FollowStatus::Cancel).await?;
    Ok(ApiResponse::success(
        "Restaurant unfollowed",
        follow,
        Some(Meta::empty()),
    ))
}

async fn set_status(
    state: &AppState,
    user: &AuthUser,
    restaurant_id: Uuid,
    status: FollowStatus,
) -> AppResult<Follow> {
    if ensure_customer(user).is_err() {
        return Err(AppError::bad_request("Only customers can follow restaurants"));
    }

    Restaurants::find_by_id(restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let existing = Follows::find()
        .filter(FollowCol::UserId.eq(user.user_id))
        .filter(FollowCol::RestaurantId.eq(restaurant_id))
        .one(&state.orm)
        .await?;

    let follow = match existing {
        Some(follow) if follow.status == status => follow,
        Some(follow) => {
            let mut active: FollowActive = follow.into();
            active.status = Set(status);
            active.update(&state.orm).await?
        }
        None => {
            FollowActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                restaurant_id: Set(restaurant_id),
                status: Set(status),
                created_at: Set(Utc::now().into()),
            }
            .insert(&state.orm)
            .await?
        }
    };

    audit_best_effort(
        &state.orm,
        user.user_id,
        "follow_status",
        "follows",
        serde_json::json!({ "restaurant_id": restaurant_id, "status": status }),
    )
    .await;

    Ok(follow.into())
}

pub async fn list_followed(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<FollowedRestaurantList>> {
    let restaurant_ids: Vec<Uuid> = Follows::find()
        .filter(FollowCol::UserId.eq(user.user_id))
        .filter(FollowCol::Status.eq(FollowStatus::Follow))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|follow| follow.restaurant_id)
        .collect();

    let items: Vec<Restaurant> = Restaurants::find()
        .filter(restaurants::Column::Id.is_in(restaurant_ids))
        .order_by_asc(restaurants::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        FollowedRestaurantList { items },
        Some(Meta::new(1, total, total)),
    ))
}
