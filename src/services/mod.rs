use sea_orm::{ConnectionTrait, EntityTrait, QuerySelect, sea_query::LockType};
use uuid::Uuid;

use crate::{
    entity::{Users, users},
    error::{AppError, AppResult},
};

pub mod address_service;
pub mod auth_service;
pub mod cart_service;
pub mod follow_service;
pub mod food_service;
pub mod menu_service;
pub mod notification_service;
pub mod order_service;
pub mod payment_service;
pub mod restaurant_service;
pub mod review_service;

/// Take a row lock on the user so that cart mutations and checkouts for
/// the same user run one after another.
pub(crate) async fn lock_user<C>(conn: &C, user_id: Uuid) -> AppResult<users::Model>
where
    C: ConnectionTrait,
{
    Users::find_by_id(user_id)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Average rounded to one decimal; `0.0` when there is nothing to average.
pub(crate) fn average_rating(stars: &[f64]) -> f64 {
    if stars.is_empty() {
        return 0.0;
    }
    let avg = stars.iter().sum::<f64>() / stars.len() as f64;
    (avg * 10.0).round() / 10.0
}

pub(crate) fn validate_star(star: f64) -> AppResult<()> {
    if !(0.0..=5.0).contains(&star) {
        return Err(AppError::bad_request("star must be between 0 and 5"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        assert_eq!(average_rating(&[4.5, 5.0]), 4.8);
        assert_eq!(average_rating(&[3.0, 4.0, 4.0]), 3.7);
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn star_must_be_in_range() {
        assert!(validate_star(0.0).is_ok());
        assert!(validate_star(5.0).is_ok());
        assert!(validate_star(5.5).is_err());
        assert!(validate_star(-1.0).is_err());
    }
}
