
use actix_web::{
    http::{header, StatusCode},
    test::TestRequest,
};
use test_utils::*;

#[actix_rt::test]
async fn guest_is_sent_to_login_from_admin() {
    let res = send(TestRequest::get().uri("/admin")).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_rt::test]
async fn guest_is_sent_to_login_from_user_dashboard() {
    let res = send(TestRequest::get().uri("/dashboard")).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_rt::test]
async fn non_admin_gets_forbidden_error_page() {
    let req = inertia(TestRequest::get().uri("/admin/blogs")).cookie(session_cookie(false));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = body_json(res).await;
    assert_eq!(body["component"], "Error");
    assert_eq!(body["props"]["status"], 403);
}

#[actix_rt::test]
async fn json_client_keeps_json_error_body() {
    let req = TestRequest::get()
        .uri("/admin/blogs")
        .insert_header((header::ACCEPT, "application/json"))
        .cookie(session_cookie(false));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = body_json(res).await;
    assert!(body["error"].is_string());
}

#[actix_rt::test]
async fn forged_session_cookie_is_treated_as_guest() {
    let req = TestRequest::get()
        .uri("/admin")
        .cookie(actix_web::cookie::Cookie::new("portfolio_session", "not-a-token"));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
}

#[actix_rt::test]
async fn bearer_token_is_accepted_like_the_cookie() {
    let token = session_cookie(true).value().to_string();
    let req = TestRequest::get()
        .uri("/admin/blogs/not-a-uuid")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .insert_header((header::ACCEPT, "application/json"));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn login_page_renders_for_guests() {
    let res = send(inertia(TestRequest::get().uri("/login"))).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["component"], "Auth/Login");
    assert_eq!(body["props"]["auth"]["user"], serde_json::Value::Null);
}

#[actix_rt::test]
async fn signed_in_admin_is_redirected_away_from_login() {
    let res = send(TestRequest::get().uri("/login").cookie(session_cookie(true))).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/admin");
}

#[actix_rt::test]
async fn signed_in_user_is_redirected_away_from_register() {
    let res = send(TestRequest::get().uri("/register").cookie(session_cookie(false))).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/dashboard");
}

#[actix_rt::test]
async fn logout_clears_the_session_cookie() {
    let res = send(TestRequest::post().uri("/logout").cookie(session_cookie(false))).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/");

    let cleared = res
        .response()
        .cookies()
        .find(|c| c.name() == "portfolio_session")
        .expect("session cookie is overwritten");
    assert_eq!(cleared.value(), "");
}

#[actix_rt::test]
async fn invalid_login_is_rejected_before_any_lookup() {
    let req = inertia(TestRequest::post().uri("/login"))
        .set_json(serde_json::json!({ "email": "not-an-email", "password": "" }));
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["component"], "Auth/Login");
    assert!(body["props"]["errors"]["email"].is_string());
    assert_eq!(body["props"]["old"]["email"], "not-an-email");
}
