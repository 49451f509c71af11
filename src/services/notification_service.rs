//! Follower notifications for new catalog items.
//!
//! The fan-out runs after the catalog row is committed. Any failure is
//! logged and dropped so the caller's write always stands.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, sea_query::Expr,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dispatch::PushMessage,
    dto::notifications::NotificationList,
    entity::{
        Follows, Notifications, Restaurants, Users, enums::FollowStatus, follows, foods, menus,
        notifications, users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Notification,
    response::{ApiResponse, Meta},
    routes::params::{NOTIFICATION_PAGE_SIZE, Pagination},
    state::AppState,
};

use notifications::{ActiveModel as NotificationActive, Column as NotificationCol};

struct Announcement {
    kind: &'static str,
    restaurant_id: Uuid,
    object_id: Uuid,
    object_type: &'static str,
    message: String,
}

/// Tell every follower of the food's restaurant about it. Returns the
/// number of notifications written, `0` when the fan-out failed.
pub async fn notify_new_food(state: &AppState, food: &foods::Model) -> usize {
    let announcement = Announcement {
        kind: "new_food",
        restaurant_id: food.restaurant_id,
        object_id: food.id,
        object_type: "food",
        message: food.name.clone(),
    };
    fan_out_logged(state, announcement).await
}

/// Tell every follower of the menu's restaurant about it. Returns the
/// number of notifications written, `0` when the fan-out failed.
pub async fn notify_new_menu(state: &AppState, menu: &menus::Model) -> usize {
    let announcement = Announcement {
        kind: "new_menu",
        restaurant_id: menu.restaurant_id,
        object_id: menu.id,
        object_type: "menu",
        message: format!("{} - {}", menu.name, menu.description),
    };
    fan_out_logged(state, announcement).await
}

async fn fan_out_logged(state: &AppState, announcement: Announcement) -> usize {
    let kind = announcement.kind;
    match fan_out(state, announcement).await {
        Ok(count) => {
            tracing::debug!(kind, count, "followers notified");
            count
        }
        Err(err) => {
            tracing::warn!(error = %err, kind, "notification fan-out failed");
            0
        }
    }
}

async fn fan_out(state: &AppState, announcement: Announcement) -> AppResult<usize> {
    let restaurant = Restaurants::find_by_id(announcement.restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let follower_ids: Vec<Uuid> = Follows::find()
        .select_only()
        .column(follows::Column::UserId)
        .filter(follows::Column::RestaurantId.eq(restaurant.id))
        .filter(follows::Column::Status.eq(FollowStatus::Follow))
        .into_tuple()
        .all(&state.orm)
        .await?;
    if follower_ids.is_empty() {
        return Ok(0);
    }

    let followers = Users::find()
        .filter(users::Column::Id.is_in(follower_ids))
        .all(&state.orm)
        .await?;

    let title = match announcement.kind {
        "new_menu" => format!("New menu at {}", restaurant.name),
        _ => format!("New food at {}", restaurant.name),
    };

    if followers.is_empty() {
        return Ok(0);
    }

    let now = Utc::now();
    let rows = followers.iter().map(|follower| NotificationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(follower.id),
        notification_type: Set(announcement.kind.to_string()),
        title: Set(title.clone()),
        message: Set(announcement.message.clone()),
        related_object_id: Set(Some(announcement.object_id)),
        related_object_type: Set(Some(announcement.object_type.to_string())),
        is_read: Set(false),
        created_at: Set(now.into()),
    });
    // single statement: all rows or none
    Notifications::insert_many(rows).exec(&state.orm).await?;

    for follower in followers.iter().filter(|user| user.is_active) {
        state
            .dispatcher
            .email(&follower.email, &title, &announcement.message)
            .await;
    }

    let tokens: Vec<String> = followers
        .iter()
        .filter_map(|user| user.fcm_token.clone())
        .filter(|token| !token.is_empty())
        .collect();
    let mut data = json!({
        "type": announcement.kind,
        "restaurant_id": restaurant.id.to_string(),
    });
    data[format!("{}_id", announcement.object_type).as_str()] =
        json!(announcement.object_id.to_string());
    state
        .dispatcher
        .push(PushMessage {
            tokens,
            title,
            body: announcement.message,
            data,
        })
        .await;

    Ok(followers.len())
}

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<NotificationList>> {
    let (page, limit, offset) = pagination.normalize_with(NOTIFICATION_PAGE_SIZE);

    let finder = Notifications::find()
        .filter(NotificationCol::UserId.eq(user.user_id))
        .order_by_desc(NotificationCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let unread = Notifications::find()
        .filter(NotificationCol::UserId.eq(user.user_id))
        .filter(NotificationCol::IsRead.eq(false))
        .count(&state.orm)
        .await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        NotificationList { items, unread },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Notification>> {
    let notification = Notifications::find_by_id(id)
        .one(&state.orm)
        .await?
        .filter(|notification| notification.user_id == user.user_id)
        .ok_or(AppError::NotFound)?;

    let notification = if notification.is_read {
        notification
    } else {
        let mut active: NotificationActive = notification.into();
        active.is_read = Set(true);
        active.update(&state.orm).await?
    };

    Ok(ApiResponse::success(
        "Notification read",
        notification.into(),
        Some(Meta::empty()),
    ))
}

pub async fn mark_all_read(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Notifications::update_many()
        .col_expr(NotificationCol::IsRead, Expr::value(true))
        .filter(NotificationCol::UserId.eq(user.user_id))
        .filter(NotificationCol::IsRead.eq(false))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Notifications read",
        json!({ "updated": result.rows_affected }),
        Some(Meta::empty()),
    ))
}
