#![allow(missing_docs)]

use rstest::rstest;
use userzip_client::{ApiClient, ApiClientError, AuthenticationError, Sex, User};

mod common;
pub use self::common::*;

#[rstest]
#[tokio::test]
async fn should_fetch_one_token_per_scope(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    app.get_zip_codes(&Scope::read()).await?;
    app.get_users(&Scope::read(), &[]).await?;
    assert_eq!(app.issued_tokens().await, 1);

    app.expand_zip_codes(&Scope::write(), &["oz"]).await?;
    assert_eq!(app.issued_tokens().await, 2);
    assert_eq!(app.cached_scopes().await, vec![Scope::read(), Scope::write()]);

    Ok(())
}

async fn read_token(client: &ApiClient) -> Option<String> {
    client
        .scoped(Scope::read())
        .await
        .authenticator()
        .cached_token()
        .map(|it| it.access_token().to_string())
}

#[rstest]
#[tokio::test]
async fn should_reuse_first_token_when_switching_back(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    app.get_zip_codes(&Scope::read()).await?;
    let first = read_token(&app).await;
    app.expand_zip_codes(&Scope::write(), &["oz"]).await?;
    app.get_users(&Scope::read(), &[]).await?;
    let third = read_token(&app).await;

    assert!(first.is_some());
    assert_eq!(first, third);
    assert_eq!(app.issued_tokens().await, 2);

    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_fetch_single_token_on_concurrent_first_use(
    #[future] app: TestApp,
) -> anyhow::Result<()> {
    let app = app.await;

    let calls = (0..8)
        .map(|_| {
            let client = app.client();
            tokio::spawn(async move { client.get_zip_codes(&Scope::read()).await })
        })
        .collect::<Vec<_>>();

    for call in calls {
        let response = call.await??;
        assert_eq!(response.status(), 200, "{}", response.body());
    }
    assert_eq!(app.issued_tokens().await, 1);
    assert_eq!(app.cached_scopes().await, vec![Scope::read()]);

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_use_distinct_tokens_per_scope(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    app.get_zip_codes(&Scope::read()).await?;
    app.expand_zip_codes(&Scope::write(), &["oz"]).await?;

    let read = app.scoped(Scope::read()).await;
    let write = app.scoped(Scope::write()).await;

    let read_token = read.authenticator().cached_token().map(|it| it.access_token().to_string());
    let write_token = write.authenticator().cached_token().map(|it| it.access_token().to_string());
    assert!(read_token.is_some());
    assert!(write_token.is_some());
    assert_ne!(read_token, write_token);

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_share_scoped_clients_between_clones(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let other = app.client();

    app.get_zip_codes(&Scope::read()).await?;
    other.get_zip_codes(&Scope::read()).await?;

    assert_eq!(app.issued_tokens().await, 1);
    assert!(app.scoped(Scope::read()).await.same_as(&other.scoped(Scope::read()).await));

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_fetch_new_token_after_discarding_scope(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    app.get_zip_codes(&Scope::read()).await?;

    assert!(app.discard_scope(&Scope::read()).await);
    assert!(!app.discard_scope(&Scope::read()).await);
    app.get_zip_codes(&Scope::read()).await?;

    assert_eq!(app.issued_tokens().await, 2);

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_forbid_write_with_read_scope(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let user = User::new("uScopesTests1", Sex::Male);

    let response = app.create_user(&Scope::read(), &user).await?;

    assert_eq!(response.status(), 403);
    let users = app.get_users(&Scope::read(), &[]).await?;
    assert!(!users.contains("uScopesTests1"));

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_forbid_unknown_scope(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;

    let response = app.get_zip_codes(&Scope::new("admin")).await?;

    assert_eq!(response.status(), 403);
    assert!(response.contains("Forbidden"), "{}", response.body());

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_fail_with_wrong_credentials(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let client = app.client_with_credentials(CLIENT_ID, "wrong-secret")?;

    let result = client.get_zip_codes(&Scope::read()).await;

    assert!(
        matches!(
            result,
            Err(ApiClientError::Authentication(AuthenticationError::TokenRejected {
                status: 401,
                ..
            }))
        ),
        "{result:?}"
    );
    assert_eq!(app.issued_tokens().await, 0);

    Ok(())
}

#[rstest]
#[tokio::test]
async fn should_retry_token_after_failure(#[future] app: TestApp) -> anyhow::Result<()> {
    let app = app.await;
    let client = app.client_with_credentials("unknown", CLIENT_SECRET)?;

    let first = client.get_zip_codes(&Scope::read()).await;
    let second = client.get_zip_codes(&Scope::read()).await;

    assert!(first.is_err());
    assert!(second.is_err());
    let scoped = client.scoped(Scope::read()).await;
    assert!(scoped.authenticator().cached_token().is_none());

    Ok(())
}
