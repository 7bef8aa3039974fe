use actix_http::StatusCode;
use actix_web::test;

use crate::common::{self, TestContext};

#[actix_web::test]
async fn test_generic_build_without_version_expect_latest_build() {
    let ctx = TestContext::new().await;
    let pip = ctx
        .create_project(&common::project("pip", "github.com/pypa/pip"))
        .await;
    let app = common::initialize_app(&ctx.state()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/build/{pip}/"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(common::body_string(resp).await, "Build Started");
    let jobs = ctx.jobs(pip).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].version, None);
    assert_eq!(jobs[0].force, 1);
}

#[actix_web::test]
async fn test_generic_build_with_version_slug_expect_version_build() {
    let ctx = TestContext::new().await;
    let pip = ctx
        .create_project(&common::project("pip", "github.com/pypa/pip"))
        .await;
    let stable = ctx.create_version(pip, "stable", "1.0", true).await;
    let app = common::initialize_app(&ctx.state()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/build/{pip}/"))
        .set_form([("version_slug", "stable")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.jobs(pip).await[0].version, Some(stable));
}

#[actix_web::test]
async fn test_generic_build_with_unknown_version_slug_expect_server_error() {
    let ctx = TestContext::new().await;
    let pip = ctx
        .create_project(&common::project("pip", "github.com/pypa/pip"))
        .await;
    let app = common::initialize_app(&ctx.state()).await;

    let req = test::TestRequest::post()
        .uri(&format!("/build/{pip}/"))
        .set_form([("version_slug", "nope")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(ctx.jobs(pip).await.is_empty());
}

#[actix_web::test]
async fn test_generic_build_with_unknown_project_expect_not_found() {
    let ctx = TestContext::new().await;
    let app = common::initialize_app(&ctx.state()).await;

    for method in [test::TestRequest::post(), test::TestRequest::get()] {
        let req = method.uri("/build/42/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn test_generic_build_get_expect_informational_page() {
    let ctx = TestContext::new().await;
    let pip = ctx
        .create_project(&common::project("pip", "github.com/pypa/pip"))
        .await;
    let app = common::initialize_app(&ctx.state()).await;

    let req = test::TestRequest::get()
        .uri(&format!("/build/{pip}/"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(ctx.jobs(pip).await.is_empty());
}
