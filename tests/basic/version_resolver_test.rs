use docserve::resolver::version::{resolve, Resolution};

use crate::common::{self, TestContext};

#[actix_web::test]
async fn test_resolve_when_branch_has_active_version_expect_that_version() {
    let ctx = TestContext::new().await;
    let mut project = common::project("foo", "github.com/x/foo");
    project.id = ctx.create_project(&project).await;
    let dev = ctx.create_version(project.id, "dev", "dev", true).await;

    let actual = resolve(&ctx.db, &project, "dev").await.unwrap();
    let expected = Resolution::Build {
        version: Some(dev),
        slug: "dev".to_owned(),
    };
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_resolve_when_branch_untracked_expect_latest_without_version() {
    let ctx = TestContext::new().await;
    let mut project = common::project("foo", "github.com/x/foo");
    project.id = ctx.create_project(&project).await;

    let actual = resolve(&ctx.db, &project, "topic").await.unwrap();
    let expected = Resolution::Build {
        version: None,
        slug: "latest".to_owned(),
    };
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_resolve_when_inactive_version_expect_inactive() {
    let ctx = TestContext::new().await;
    let mut project = common::project("foo", "github.com/x/foo");
    project.id = ctx.create_project(&project).await;
    ctx.create_version(project.id, "old", "old", false).await;

    let actual = resolve(&ctx.db, &project, "old").await.unwrap();
    let expected = Resolution::Inactive {
        branch: "old".to_owned(),
    };
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_resolve_when_default_branch_version_inactive_expect_latest_anyway() {
    let ctx = TestContext::new().await;
    let mut project = common::project("foo", "hg.example.org/foo");
    project.repo_type = "hg".to_owned();
    project.id = ctx.create_project(&project).await;
    ctx.create_version(project.id, "default", "default", false).await;
    let latest = ctx.create_version(project.id, "latest", "tip", true).await;

    let actual = resolve(&ctx.db, &project, "default").await.unwrap();
    let expected = Resolution::Build {
        version: Some(latest),
        slug: "latest".to_owned(),
    };
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_resolve_when_branch_and_remote_branch_tracked_expect_direct_match() {
    let ctx = TestContext::new().await;
    let mut project = common::project("foo", "github.com/x/foo");
    project.id = ctx.create_project(&project).await;
    ctx.create_version(project.id, "remote-dev", "remotes/origin/dev", true)
        .await;
    let dev = ctx.create_version(project.id, "dev", "dev", true).await;

    let actual = resolve(&ctx.db, &project, "dev").await.unwrap();
    let expected = Resolution::Build {
        version: Some(dev),
        slug: "dev".to_owned(),
    };
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_resolve_when_default_branch_without_latest_expect_error() {
    let ctx = TestContext::new().await;
    let mut project = common::project("foo", "github.com/x/foo");
    project.id = ctx.create_project(&project).await;
    ctx.create_version(project.id, "master", "master", true).await;

    let actual = resolve(&ctx.db, &project, "master").await.unwrap_err();
    assert!(actual.to_string().contains("no 'latest' version"));
}
