mod common;

use foodspot_api::{
    dto::auth::{LoginRequest, RegisterRequest},
    entity::enums::UserRole,
    error::AppError,
    middleware::auth::decode_token,
    services::auth_service,
};

fn registration(email: &str, role: Option<UserRole>) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: "matkhau123".into(),
        fullname: "Nguyen Van An".into(),
        username: "an".into(),
        phone_number: None,
        role,
    }
}

#[tokio::test]
async fn register_then_login_issues_token() -> anyhow::Result<()> {
    let state = common::setup_state().await?;

    let user = auth_service::register_user(&state, registration("An@Example.com", None))
        .await?
        .into_data()
        .unwrap();
    assert_eq!(user.email, "an@example.com");
    assert_eq!(user.role, UserRole::Customer);

    let duplicate =
        auth_service::register_user(&state, registration("an@example.com", None)).await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "an@example.com".into(),
            password: "matkhau123".into(),
        },
    )
    .await?
    .into_data()
    .unwrap();
    let claims = decode_token(&login.token, &state.config.jwt_secret)?;
    assert_eq!(claims.user_id, user.id);

    let wrong = auth_service::login_user(
        &state,
        LoginRequest {
            email: "an@example.com".into(),
            password: "sai".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn admin_role_cannot_be_self_assigned() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let result =
        auth_service::register_user(&state, registration("root@example.com", Some(UserRole::Admin)))
            .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    Ok(())
}
