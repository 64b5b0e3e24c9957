#![allow(missing_docs)]

use rstest::{fixture, rstest};
use userzip_client::ApiClientError;

mod common;
pub use self::common::*;

#[fixture]
async fn app_with_zip_codes(#[future] app: TestApp) -> TestApp {
    let app = app.await;
    let zip_codes = ["oz", "oz1", "oz2", "oz3", "oz4", "oz5", "oz6", "oz7"];
    match app.expand_zip_codes(&Scope::write(), &zip_codes).await {
        Ok(_) => app,
        Err(error) => panic!("fail to expand zip codes: {error:?}"),
    }
}

const VALID_USERS: &str = r#"[
    { "name": "uploaduser1", "sex": "MALE", "age": 33, "zipCode": "oz" },
    { "name": "uploaduser1b", "sex": "FEMALE", "zipCode": "oz1" }
]"#;

const WRONG_ZIP_USERS: &str = r#"[
    { "name": "uploaduser2", "sex": "MALE", "zipCode": "oz2" },
    { "name": "uploaduser2b", "sex": "FEMALE", "zipCode": "no-such-zip" }
]"#;

const MISSING_FIELD_USERS: &str = r#"[
    { "name": "uploaduser3", "sex": "MALE", "zipCode": "oz3" },
    { "name": "uploaduser3b", "zipCode": "oz4" }
]"#;

#[rstest]
#[tokio::test]
async fn should_upload_users(#[future] app_with_zip_codes: TestApp) -> anyhow::Result<()> {
    let app = app_with_zip_codes.await;
    let file = users_file(VALID_USERS)?;

    let response = app.upload_users_file(&Scope::write(), file.path()).await?;

    assert_eq!(response.status(), 201, "{}", response.body());
    insta::assert_snapshot!(response.body(), @r#"{"created":2}"#);
    let users = app.get_users(&Scope::read(), &[]).await?;
    assert!(users.contains("uploaduser1"), "{}", users.body());
    assert!(users.contains("uploaduser1b"), "{}", users.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_upload_nothing_with_wrong_zip_code(
    #[future] app_with_zip_codes: TestApp,
) -> anyhow::Result<()> {
    let app = app_with_zip_codes.await;
    let file = users_file(WRONG_ZIP_USERS)?;

    let response = app.upload_users_file(&Scope::write(), file.path()).await?;

    assert_eq!(response.status(), 424);
    assert!(response.contains("FailedDependency"), "{}", response.body());
    let users = app.get_users(&Scope::read(), &[]).await?;
    assert!(!users.contains("uploaduser2"), "{}", users.body());
    let zip_codes = app.get_zip_codes(&Scope::read()).await?;
    assert!(zip_codes.contains("oz2"), "{}", zip_codes.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_upload_nothing_with_missing_field(
    #[future] app_with_zip_codes: TestApp,
) -> anyhow::Result<()> {
    let app = app_with_zip_codes.await;
    let file = users_file(MISSING_FIELD_USERS)?;

    let response = app.upload_users_file(&Scope::write(), file.path()).await?;

    assert_eq!(response.status(), 409);
    assert!(response.contains("Conflict"), "{}", response.body());
    let users = app.get_users(&Scope::read(), &[]).await?;
    assert!(!users.contains("uploaduser3"), "{}", users.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_reject_file_that_is_not_a_user_list(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let file = users_file("name,sex\nuploaduser4,MALE\n")?;

    let response = app.upload_users_file(&Scope::write(), file.path()).await?;

    assert_eq!(response.status(), 400, "{}", response.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_fail_before_any_request_without_file(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing-users.json");

    let result = app.upload_users_file(&Scope::write(), &missing).await;

    assert!(
        matches!(result, Err(ApiClientError::InvalidArgument { .. })),
        "{result:?}"
    );
    assert_eq!(app.issued_tokens().await, 0);

    Ok(())
}
