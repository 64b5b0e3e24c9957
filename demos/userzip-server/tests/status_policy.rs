#![allow(missing_docs)]

use rstest::rstest;
use userzip_client::{ApiClientError, Sex, User};

mod common;
pub use self::common::*;

#[rstest]
#[tokio::test]
async fn should_return_error_statuses_by_default(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let response = app
        .create_user(&Scope::write(), &User::new("uPolicy1", Sex::Male).with_zip_code("00000"))
        .await?;

    assert_eq!(response.status(), 424);
    assert_eq!(app.status_policy(), StatusPolicy::Return);

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_raise_error_statuses(#[future] raising_app: TestApp) -> anyhow::Result<()> {
    let app = raising_app.await;
    let user = User {
        name: Some("uPolicy2".to_string()),
        ..User::default()
    };

    let result = app.create_user(&Scope::write(), &user).await;

    let Err(ApiClientError::RemoteError { status, body }) = result else {
        anyhow::bail!("expected a remote error, got {result:?}");
    };
    assert_eq!(status, 409);
    assert!(body.contains("Conflict"), "{body}");

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_expose_status_of_raised_error(#[future] raising_app: TestApp) -> anyhow::Result<()> {
    let app = raising_app.await;

    let error = app
        .delete_user(&Scope::write(), &User::new("nobody", Sex::Female))
        .await
        .expect_err("unknown user");

    assert_eq!(error.status().map(|it| it.as_u16()), Some(404));

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_stop_bulk_creation_at_first_error(
    #[future] raising_app: TestApp,
) -> anyhow::Result<()> {
    let app = raising_app.await;
    let users = [
        User::new("uPolicy3", Sex::Male),
        User::new("uPolicy3", Sex::Male),
        User::new("uPolicy4", Sex::Female),
    ];

    let result = app.create_users(&Scope::write(), &users).await;

    assert!(
        matches!(result, Err(ApiClientError::RemoteError { .. })),
        "{result:?}"
    );
    let listed = app.get_users(&Scope::read(), &[]).await?;
    assert!(listed.contains("uPolicy3"), "{}", listed.body());
    assert!(!listed.contains("uPolicy4"), "{}", listed.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_keep_successes_under_raise(#[future] raising_app: TestApp) -> anyhow::Result<()> {
    let app = raising_app.await;

    let response = app.get_zip_codes(&Scope::read()).await?;

    assert!(response.is_success());

    Ok(())
}
