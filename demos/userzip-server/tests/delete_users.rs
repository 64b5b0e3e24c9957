#![allow(missing_docs)]

use rstest::{fixture, rstest};
use userzip_client::{ApiClientError, Sex, User};

mod common;
pub use self::common::*;

fn existing() -> User {
    User::new("uDeleteUsersTests1", Sex::Female)
        .with_age(25)
        .with_zip_code("34567")
}

#[fixture]
async fn app_with_user(#[future] app: TestApp) -> TestApp {
    let app = app.await;
    match app.create_user(&Scope::write(), &existing()).await {
        Ok(response) if response.status() == 201 => app,
        other => panic!("fail to create user: {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn should_delete_user(#[future] app_with_user: TestApp) -> anyhow::Result<()> {
    let app = app_with_user.await;

    let response = app.delete_user(&Scope::write(), &existing()).await?;

    assert_eq!(response.status(), 204);
    let users = app.get_users(&Scope::read(), &[]).await?;
    assert!(!users.contains("uDeleteUsersTests1"), "{}", users.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_release_zip_code_of_deleted_user(
    #[future] app_with_user: TestApp,
) -> anyhow::Result<()> {
    let app = app_with_user.await;

    app.delete_user(&Scope::write(), &existing()).await?;

    let zip_codes = app.get_zip_codes(&Scope::read()).await?;
    assert!(zip_codes.contains("34567"), "{}", zip_codes.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_select_user_by_name_and_sex(
    #[future] app_with_user: TestApp,
) -> anyhow::Result<()> {
    let app = app_with_user.await;
    let selector = User::new("uDeleteUsersTests1", Sex::Female);

    let response = app.delete_user(&Scope::write(), &selector).await?;

    assert_eq!(response.status(), 204);

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_reject_selector_without_sex(
    #[future] app_with_user: TestApp,
) -> anyhow::Result<()> {
    let app = app_with_user.await;
    let selector = User {
        name: Some("uDeleteUsersTests1".to_string()),
        ..User::default()
    };

    let response = app.delete_user(&Scope::write(), &selector).await?;

    assert_eq!(response.status(), 409);
    let users = app.get_users(&Scope::read(), &[]).await?;
    assert!(users.contains("uDeleteUsersTests1"), "{}", users.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_not_find_unknown_user(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let response = app
        .delete_user(&Scope::write(), &User::new("nobody", Sex::Male))
        .await?;

    assert_eq!(response.status(), 404);

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_fail_before_any_request_without_user(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let result = app.delete_user(&Scope::write(), None).await;

    assert!(
        matches!(result, Err(ApiClientError::InvalidArgument { name: "user", .. })),
        "{result:?}"
    );

    Ok(())
}
