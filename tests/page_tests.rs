
use actix_web::{
    cookie::Cookie,
    http::{header, StatusCode},
    test::TestRequest,
};
use serde_json::json;
use test_utils::*;

#[actix_rt::test]
async fn about_page_renders_html_shell_for_browsers() {
    let res = send(TestRequest::get().uri("/about")).await;

    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let html = body_string(res).await;
    assert!(html.contains("<title>Portfolio Test</title>"));
    assert!(html.contains("data-page="));
}

#[actix_rt::test]
async fn about_page_returns_page_object_for_client_router() {
    let res = send(inertia(TestRequest::get().uri("/about"))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-inertia").unwrap(), "true");

    let body = body_json(res).await;
    assert_eq!(body["component"], "About");
    assert_eq!(body["url"], "/about");
    assert_eq!(body["version"], "test");
    assert_eq!(body["props"]["appName"], "Portfolio Test");
    assert_eq!(body["props"]["storageUrl"], "/storage");
}

#[actix_rt::test]
async fn trailing_slash_is_normalized() {
    let res = send(inertia(TestRequest::get().uri("/about/"))).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["component"], "About");
}

#[actix_rt::test]
async fn stale_client_version_gets_conflict() {
    let req = TestRequest::get()
        .uri("/contact")
        .insert_header(("X-Inertia", "true"))
        .insert_header(("X-Inertia-Version", "outdated"));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(res.headers().get("x-inertia-location").unwrap(), "/contact");
}

#[actix_rt::test]
async fn flash_is_shown_once_and_then_cleared() {
    let flash = urlencoding::encode(r#"{"success":"Saved!","error":null}"#).into_owned();
    let req = inertia(TestRequest::get().uri("/contact")).cookie(Cookie::new("flash", flash));
    let res = send(req).await;

    let cleared = res
        .response()
        .cookies()
        .find(|c| c.name() == "flash")
        .expect("flash cookie is expired");
    assert_eq!(cleared.value(), "");

    let body = body_json(res).await;
    assert_eq!(body["component"], "Contact/Create");
    assert_eq!(body["props"]["flash"]["success"], "Saved!");
}

#[actix_rt::test]
async fn invalid_contact_submission_rerenders_form_with_errors() {
    let req = inertia(TestRequest::post().uri("/contact"))
        .set_json(json!({ "name": "  ", "email": "nope", "message": "" }));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["component"], "Contact/Create");
    assert_eq!(body["props"]["errors"]["email"], "Please enter a valid email address.");
    assert!(body["props"]["errors"]["name"].is_string());
    assert!(body["props"]["errors"]["message"].is_string());
    assert_eq!(body["props"]["old"]["email"], "nope");
}

#[actix_rt::test]
async fn urlencoded_contact_submission_is_validated_too() {
    let req = TestRequest::post()
        .uri("/contact")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("name=Jane&email=bad&message=Hello");
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(res).await;
    assert!(html.contains("data-page="));
    assert!(html.contains("Please enter a valid email address."));
}

#[actix_rt::test]
async fn malformed_admin_id_is_a_bad_request_page() {
    let req = inertia(TestRequest::get().uri("/admin/blogs/not-a-uuid")).cookie(session_cookie(true));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["component"], "Error");
    assert_eq!(body["props"]["status"], 400);
    assert_eq!(body["props"]["auth"]["user"]["is_admin"], true);
}

#[actix_rt::test]
async fn method_override_reaches_the_delete_route() {
    let req = TestRequest::post()
        .uri("/admin/contacts/not-a-uuid?_method=DELETE")
        .insert_header((header::ACCEPT, "application/json"))
        .cookie(session_cookie(true));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn plain_post_to_delete_only_route_is_not_allowed() {
    let req = TestRequest::post()
        .uri("/admin/contacts/not-a-uuid")
        .cookie(session_cookie(true));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_rt::test]
async fn unknown_route_renders_not_found_page() {
    let res = send(inertia(TestRequest::get().uri("/no-such-page"))).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["component"], "Error");
    assert_eq!(body["props"]["status"], 404);
}

#[actix_rt::test]
async fn malformed_json_body_is_a_bad_request() {
    let req = TestRequest::post()
        .uri("/contact")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .insert_header((header::ACCEPT, "application/json"))
        .set_payload("{not json");
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
