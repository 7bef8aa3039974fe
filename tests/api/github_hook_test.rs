use std::sync::Arc;

use actix_http::StatusCode;
use actix_web::test;

use crate::common::{self, github_payload, FailingQueue, TestContext};

async fn post_payload(ctx: &TestContext, payload: &str) -> (StatusCode, String) {
    let app = common::initialize_app(&ctx.state()).await;
    let req = test::TestRequest::post()
        .uri("/github-hook/")
        .set_form([("payload", payload)])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    (status, common::body_string(resp).await)
}

#[actix_web::test]
async fn test_github_hook_with_active_version_expect_build_started_for_version() {
    let ctx = TestContext::new().await;
    let foo = ctx
        .create_project(&common::project("foo", "https://github.com/x/foo"))
        .await;
    ctx.create_version(foo, "latest", "master", true).await;
    let dev = ctx.create_version(foo, "dev", "dev", true).await;

    let payload = github_payload("Foo", "https://github.com/x/foo", "dev");
    let (status, body) = post_payload(&ctx, &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Build Started: dev");
    let jobs = ctx.jobs(foo).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].version, Some(dev));
    assert_eq!(jobs[0].force, 1);
    assert!(ctx.notifier.messages().is_empty());
}

#[actix_web::test]
async fn test_github_hook_on_default_branch_expect_latest_not_branch_version() {
    let ctx = TestContext::new().await;
    let mut project = common::project("foo", "github.com/x/foo");
    project.default_branch = Some("main".to_owned());
    let foo = ctx.create_project(&project).await;
    ctx.create_version(foo, "main", "main", true).await;
    let latest = ctx.create_version(foo, "latest", "main", true).await;

    let payload = github_payload("Foo", "https://github.com/x/foo", "main");
    let (status, body) = post_payload(&ctx, &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Build Started: latest");
    let jobs = ctx.jobs(foo).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].version, Some(latest));
}

#[actix_web::test]
async fn test_github_hook_on_vcs_fallback_branch_expect_latest() {
    let ctx = TestContext::new().await;
    let foo = ctx
        .create_project(&common::project("foo", "github.com/x/foo"))
        .await;
    let latest = ctx.create_version(foo, "latest", "master", true).await;

    let payload = github_payload("Foo", "https://github.com/x/foo", "master");
    let (status, body) = post_payload(&ctx, &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Build Started: latest");
    assert_eq!(ctx.jobs(foo).await[0].version, Some(latest));
}

#[actix_web::test]
async fn test_github_hook_with_inactive_version_expect_not_building_and_no_job() {
    let ctx = TestContext::new().await;
    let foo = ctx
        .create_project(&common::project("foo", "github.com/x/foo"))
        .await;
    ctx.create_version(foo, "latest", "master", true).await;
    ctx.create_version(foo, "old", "old", false).await;

    let payload = github_payload("Foo", "https://github.com/x/foo", "old");
    let (status, body) = post_payload(&ctx, &payload).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Building: old");
    assert!(ctx.jobs(foo).await.is_empty());
    assert!(ctx.notifier.messages().is_empty());
}

#[actix_web::test]
async fn test_github_hook_with_unknown_branch_expect_latest_without_version() {
    let ctx = TestContext::new().await;
    let foo = ctx
        .create_project(&common::project("foo", "github.com/x/foo"))
        .await;

    let payload = github_payload("Foo", "https://github.com/x/foo", "feature/new");
    let (status, body) = post_payload(&ctx, &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Build Started: latest");
    let jobs = ctx.jobs(foo).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].version, None);
}

#[actix_web::test]
async fn test_github_hook_with_remote_tracking_branch_expect_version_built() {
    let ctx = TestContext::new().await;
    let foo = ctx
        .create_project(&common::project("foo", "github.com/x/foo"))
        .await;
    let feature = ctx
        .create_version(foo, "feature", "remotes/origin/feature", true)
        .await;

    let payload = github_payload("Foo", "https://github.com/x/foo", "feature");
    let (_, body) = post_payload(&ctx, &payload).await;

    assert_eq!(body, "Build Started: feature");
    assert_eq!(ctx.jobs(foo).await[0].version, Some(feature));
}

#[actix_web::test]
async fn test_github_hook_when_repo_has_git_suffix_expect_scheme_insensitive_match() {
    let ctx = TestContext::new().await;
    let repo = ctx
        .create_project(&common::project("repo", "github.com/org/repo.git"))
        .await;

    for url in ["https://github.com/org/repo", "http://github.com/org/repo"] {
        let payload = github_payload("repo", url, "topic");
        let (status, body) = post_payload(&ctx, &payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Build Started: latest");
    }
    assert_eq!(ctx.jobs(repo).await.len(), 2);
}

#[actix_web::test]
async fn test_github_hook_with_unknown_repository_expect_build_failed_and_admins_notified() {
    let ctx = TestContext::new().await;
    ctx.create_project(&common::project("foo", "github.com/x/foo"))
        .await;

    let payload = github_payload("Bar", "https://github.com/x/bar", "main");
    let (status, body) = post_payload(&ctx, &payload).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Build Failed");
    let messages = ctx.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "Build Failure");
    assert!(messages[0].1.starts_with("Bar failed to build via github."));
}

#[actix_web::test]
async fn test_github_hook_with_malformed_payload_expect_build_failed() {
    let ctx = TestContext::new().await;
    for payload in ["not json", r#"{"repository":{"name":"Foo"}}"#] {
        let (status, body) = post_payload(&ctx, payload).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Build Failed");
    }
    let messages = ctx.notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].1.starts_with("Foo failed to build via github."));
}

#[actix_web::test]
async fn test_github_hook_without_payload_field_expect_build_failed() {
    let ctx = TestContext::new().await;
    let app = common::initialize_app(&ctx.state()).await;
    let req = test::TestRequest::post().uri("/github-hook/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::body_string(resp).await, "Build Failed");
    assert_eq!(ctx.notifier.messages().len(), 1);
}

#[actix_web::test]
async fn test_github_hook_on_default_branch_without_latest_version_expect_build_failed() {
    let ctx = TestContext::new().await;
    let foo = ctx
        .create_project(&common::project("foo", "github.com/x/foo"))
        .await;
    ctx.create_version(foo, "master", "master", true).await;

    let payload = github_payload("Foo", "https://github.com/x/foo", "master");
    let (status, body) = post_payload(&ctx, &payload).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Build Failed");
    assert!(ctx.jobs(foo).await.is_empty());
}

#[actix_web::test]
async fn test_github_hook_when_queue_refuses_expect_build_failed() {
    let ctx = TestContext::new().await;
    ctx.create_project(&common::project("foo", "github.com/x/foo"))
        .await;
    let app = common::initialize_app(&ctx.state_with_queue(Arc::new(FailingQueue))).await;
    let payload = github_payload("Foo", "https://github.com/x/foo", "dev");
    let req = test::TestRequest::post()
        .uri("/github-hook/")
        .set_form([("payload", payload.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::body_string(resp).await, "Build Failed");
    let messages = ctx.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].1.contains("enqueue failed"));
}

#[actix_web::test]
async fn test_github_hook_get_expect_informational_page() {
    let ctx = TestContext::new().await;
    let app = common::initialize_app(&ctx.state()).await;
    let req = test::TestRequest::get().uri("/github-hook/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::body_string(resp).await.contains("Post-commit hooks"));
}
