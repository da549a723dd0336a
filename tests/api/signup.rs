use wiremock::matchers::{
    any,
    body_json,
    method,
    path,
};
use wiremock::{
    Mock,
    ResponseTemplate,
};

use crate::helpers::*;

#[actix_rt::test]
async fn signup_get_renders_the_form() {
    let test_app = spawn_app().await;

    let response =
        send_get_request(&format!("{}/newsletter/signup", test_app.address)).await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("Sign up now"));
}

#[actix_rt::test]
async fn valid_signup_issues_one_subscribe_call_and_renders_success() {
    let test_app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/subscribe"))
        .and(body_json(serde_json::json!({
            "email": "user@example.com",
            "newsletters": "firefox-tips",
            "format": "text",
            "country": "us",
            "lang": "en"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/signup", test_app.address),
        "email=user%40example.com&newsletter=firefox-tips&format=text&country=us&lang=en"
            .to_string(),
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("Thanks for subscribing!"));
}

#[actix_rt::test]
async fn invalid_email_renders_field_error_without_a_remote_call() {
    let test_app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/signup", test_app.address),
        "email=not-an-email&newsletter=firefox-tips".to_string(),
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("Enter a valid email address."));
    assert!(!body.contains("Thanks for subscribing!"));
}

#[actix_rt::test]
async fn failed_subscribe_attaches_the_generic_error_to_the_form() {
    let test_app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/subscribe"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "status": "error",
            "code": 400,
            "desc": "unknown newsletter"
        })))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/signup", test_app.address),
        "email=user%40example.com&newsletter=firefox-tips".to_string(),
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("problem with our system"));
    assert!(!body.contains("Thanks for subscribing!"));
}
