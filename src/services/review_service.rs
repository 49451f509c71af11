use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::audit_best_effort,
    dto::reviews::{
        CreateFoodReviewRequest, CreateRestaurantReviewRequest, FoodReviewList,
        FoodReviewWithReplies, RestaurantReviewList, UpdateReviewRequest,
    },
    entity::{
        FoodReviews, Foods, OrderDetails, Orders, RestaurantReviews, Restaurants,
        enums::{OrderStatus, UserRole},
        food_reviews, foods, orders, restaurant_reviews, restaurants,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{FoodReview, RestaurantReview},
    response::{ApiResponse, Meta},
    routes::params::{FoodReviewQuery, REVIEW_PAGE_SIZE, RestaurantReviewQuery},
    services::{average_rating, validate_star},
    state::AppState,
};

use food_reviews::{ActiveModel as FoodReviewActive, Column as FoodReviewCol};
use restaurant_reviews::{ActiveModel as RestaurantReviewActive, Column as RestaurantReviewCol};

pub async fn list_restaurant_reviews(
    state: &AppState,
    query: RestaurantReviewQuery,
) -> AppResult<ApiResponse<RestaurantReviewList>> {
    let (page, limit, offset) = query.pagination().normalize_with(REVIEW_PAGE_SIZE);

    let mut finder = RestaurantReviews::find().order_by_desc(RestaurantReviewCol::CreatedAt);
    if let Some(restaurant_id) = query.restaurant_id {
        finder = finder.filter(RestaurantReviewCol::RestaurantId.eq(restaurant_id));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
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
        RestaurantReviewList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_restaurant_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRestaurantReviewRequest,
) -> AppResult<ApiResponse<RestaurantReview>> {
    validate_star(payload.star)?;

    let txn = state.orm.begin().await?;

    Restaurants::find_by_id(payload.restaurant_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let delivered = Orders::find()
        .filter(
            Condition::all()
                .add(orders::Column::UserId.eq(user.user_id))
                .add(orders::Column::RestaurantId.eq(payload.restaurant_id))
                .add(orders::Column::Status.eq(OrderStatus::Delivered)),
        )
        .count(&txn)
        .await?;
    if delivered == 0 {
        return Err(AppError::bad_request(
            "You can only review restaurants you have ordered from",
        ));
    }

    let review = RestaurantReviewActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        restaurant_id: Set(payload.restaurant_id),
        star: Set(payload.star),
        comment: Set(payload.comment),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;
    recompute_restaurant_rating(&txn, review.restaurant_id).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "restaurant_review_create",
        "restaurant_reviews",
        serde_json::json!({ "review_id": review.id, "restaurant_id": review.restaurant_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Review created",
        review.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_restaurant_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<RestaurantReview>> {
    if let Some(star) = payload.star {
        validate_star(star)?;
    }

    let txn = state.orm.begin().await?;

    let review = RestaurantReviews::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_author(user, review.user_id)?;

    let mut active: RestaurantReviewActive = review.into();
    if let Some(star) = payload.star {
        active.star = Set(star);
    }
    if let Some(comment) = payload.comment {
        active.comment = Set(comment);
    }
    let review = active.update(&txn).await?;
    recompute_restaurant_rating(&txn, review.restaurant_id).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Review updated",
        review.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_restaurant_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let review = RestaurantReviews::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_author(user, review.user_id)?;

    let restaurant_id = review.restaurant_id;
    review.delete(&txn).await?;
    recompute_restaurant_rating(&txn, restaurant_id).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "restaurant_review_delete",
        "restaurant_reviews",
        serde_json::json!({ "review_id": id }),
    )
    .await;

    Ok(crate::response::empty("Review deleted"))
}

pub async fn list_food_reviews(
    state: &AppState,
    query: FoodReviewQuery,
) -> AppResult<ApiResponse<FoodReviewList>> {
    let (page, limit, offset) = query.pagination().normalize_with(REVIEW_PAGE_SIZE);

    let mut finder = FoodReviews::find()
        .filter(FoodReviewCol::ParentId.is_null())
        .order_by_desc(FoodReviewCol::CreatedAt);
    if let Some(food_id) = query.food_id {
        finder = finder.filter(FoodReviewCol::FoodId.eq(food_id));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let reviews = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(reviews.len());
    for review in reviews {
        let replies = FoodReviews::find()
            .filter(FoodReviewCol::ParentId.eq(review.id))
            .order_by_asc(FoodReviewCol::CreatedAt)
            .all(&state.orm)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        items.push(FoodReviewWithReplies {
            review: review.into(),
            replies,
        });
    }

    Ok(ApiResponse::success(
        "OK",
        FoodReviewList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_food_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFoodReviewRequest,
) -> AppResult<ApiResponse<FoodReview>> {
    let txn = state.orm.begin().await?;

    let detail = OrderDetails::find_by_id(payload.order_detail_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    match payload.parent_id {
        Some(parent_id) => {
            if user.role != UserRole::RestaurantUser {
                return Err(AppError::bad_request(
                    "Only restaurant users can reply to a review",
                ));
            }
            if payload.star != 0.0 {
                return Err(AppError::bad_request("A reply must have a star of 0"));
            }
            let parent = FoodReviews::find_by_id(parent_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::bad_request("Parent review not found"))?;
            if parent.parent_id.is_some() || parent.order_detail_id != detail.id {
                return Err(AppError::bad_request(
                    "A reply must answer a review of the same order item",
                ));
            }
            let owner = food_restaurant_owner(&txn, detail.food_id).await?;
            if owner != Some(user.user_id) {
                return Err(AppError::bad_request(
                    "Only the owner of the restaurant can reply",
                ));
            }
        }
        None => {
            validate_star(payload.star)?;
            let order = Orders::find_by_id(detail.order_id)
                .one(&txn)
                .await?
                .ok_or(AppError::NotFound)?;
            if order.user_id != user.user_id {
                return Err(AppError::bad_request(
                    "You can only review food from your own orders",
                ));
            }
            if order.status != OrderStatus::Delivered {
                return Err(AppError::bad_request(
                    "You can only review food from delivered orders",
                ));
            }
        }
    }

    let review = FoodReviewActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        order_detail_id: Set(detail.id),
        food_id: Set(detail.food_id),
        parent_id: Set(payload.parent_id),
        star: Set(payload.star),
        comment: Set(payload.comment),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;
    recompute_food_rating(&txn, review.food_id).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "food_review_create",
        "food_reviews",
        serde_json::json!({ "review_id": review.id, "food_id": review.food_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Review created",
        review.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_food_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<FoodReview>> {
    let txn = state.orm.begin().await?;

    let review = FoodReviews::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_author(user, review.user_id)?;

    if let Some(star) = payload.star {
        if review.parent_id.is_some() && star != 0.0 {
            return Err(AppError::bad_request("A reply must have a star of 0"));
        }
        validate_star(star)?;
    }

    let mut active: FoodReviewActive = review.into();
    if let Some(star) = payload.star {
        active.star = Set(star);
    }
    if let Some(comment) = payload.comment {
        active.comment = Set(comment);
    }
    let review = active.update(&txn).await?;
    recompute_food_rating(&txn, review.food_id).await?;

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Review updated",
        review.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_food_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    let review = FoodReviews::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_author(user, review.user_id)?;

    let food_id = review.food_id;
    FoodReviews::delete_many()
        .filter(FoodReviewCol::ParentId.eq(review.id))
        .exec(&txn)
        .await?;
    review.delete(&txn).await?;
    recompute_food_rating(&txn, food_id).await?;

    txn.commit().await?;

    audit_best_effort(
        &state.orm,
        user.user_id,
        "food_review_delete",
        "food_reviews",
        serde_json::json!({ "review_id": id }),
    )
    .await;

    Ok(crate::response::empty("Review deleted"))
}

/// Store the average of the restaurant's reviews on the restaurant row.
pub(crate) async fn recompute_restaurant_rating<C>(conn: &C, restaurant_id: Uuid) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let stars: Vec<f64> = RestaurantReviews::find()
        .select_only()
        .column(RestaurantReviewCol::Star)
        .filter(RestaurantReviewCol::RestaurantId.eq(restaurant_id))
        .into_tuple()
        .all(conn)
        .await?;

    Restaurants::update_many()
        .col_expr(
            restaurants::Column::StarRating,
            sea_orm::sea_query::Expr::value(average_rating(&stars)),
        )
        .filter(restaurants::Column::Id.eq(restaurant_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Store the average of the food's top-level reviews on the food row.
/// Replies do not count.
pub(crate) async fn recompute_food_rating<C>(conn: &C, food_id: Uuid) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let stars: Vec<f64> = FoodReviews::find()
        .select_only()
        .column(FoodReviewCol::Star)
        .filter(FoodReviewCol::FoodId.eq(food_id))
        .filter(FoodReviewCol::ParentId.is_null())
        .into_tuple()
        .all(conn)
        .await?;

    Foods::update_many()
        .col_expr(
            foods::Column::StarRating,
            sea_orm::sea_query::Expr::value(average_rating(&stars)),
        )
        .filter(foods::Column::Id.eq(food_id))
        .exec(conn)
        .await?;
    Ok(())
}

async fn food_restaurant_owner<C>(conn: &C, food_id: Uuid) -> AppResult<Option<Uuid>>
where
    C: ConnectionTrait,
{
    let Some(food) = Foods::find_by_id(food_id).one(conn).await? else {
        return Ok(None);
    };
    Ok(Restaurants::find_by_id(food.restaurant_id)
        .one(conn)
        .await?
        .map(|restaurant| restaurant.owner_id))
}

fn ensure_author(user: &AuthUser, author_id: Uuid) -> AppResult<()> {
    if user.is_admin() || user.user_id == author_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
