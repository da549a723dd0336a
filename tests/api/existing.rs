use std::time::Duration;

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
async fn existing_redirects_malformed_tokens_to_recovery_without_a_remote_call() {
    let test_app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.remote_server)
        .await;

    let response = send_get_request(&format!(
        "{}/newsletter/existing/definitely-not-a-uuid",
        test_app.address
    ))
    .await;

    assert_eq!(303, response.status().as_u16());
    assert_eq!(
        location(&response),
        "/newsletter/recovery?flash=bad-token"
    );
}

#[actix_rt::test]
async fn existing_without_token_redirects_to_recovery() {
    let test_app = spawn_app().await;

    let response =
        send_get_request(&format!("{}/newsletter/existing", test_app.address)).await;

    assert_eq!(303, response.status().as_u16());
    assert_eq!(location(&response), "/newsletter/recovery");
}

#[actix_rt::test]
async fn existing_renders_shown_and_subscribed_newsletters_only() {
    let test_app = spawn_app().await;
    let token = valid_token();
    mock_user_and_catalog(&test_app, &token).await;

    let response = send_get_request(&format!(
        "{}/newsletter/existing/{}",
        test_app.address, token
    ))
    .await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("Firefox Tips"));
    // hidden but already subscribed, so it must be listed and pre-checked
    assert!(body.contains(r#"value="mobile" checked"#));
    assert!(body.contains("Beta Builds"));
    assert!(!body.contains("Hidden List"));
    // mobile has order 1, so it must come before the others
    let mobile = body.find("Mobile News").unwrap();
    let tips = body.find("Firefox Tips").unwrap();
    assert!(mobile < tips);
}

#[actix_rt::test]
async fn existing_redirects_to_recovery_when_the_user_lookup_is_rejected() {
    let test_app = spawn_app().await;
    let token = valid_token();

    Mock::given(method("GET"))
        .and(path(format!("/user/{}", token)))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "status": "error",
            "code": 404,
            "desc": "unknown token"
        })))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;

    let response = send_get_request(&format!(
        "{}/newsletter/existing/{}",
        test_app.address, token
    ))
    .await;

    assert_eq!(303, response.status().as_u16());
    assert_eq!(
        location(&response),
        "/newsletter/recovery?flash=bad-token"
    );
}

#[actix_rt::test]
async fn existing_renders_generic_error_in_place_when_the_service_times_out() {
    let test_app = spawn_app().await;
    let token = valid_token();

    // longer than the 2s client timeout configured by spawn_app
    Mock::given(method("GET"))
        .and(path(format!("/user/{}", token)))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(4)))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;

    let response = send_get_request(&format!(
        "{}/newsletter/existing/{}",
        test_app.address, token
    ))
    .await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("problem with our system"));
}

#[actix_rt::test]
async fn remove_all_issues_exactly_one_opt_out_unsubscribe() {
    let test_app = spawn_app().await;
    let token = valid_token();
    mock_user_and_catalog(&test_app, &token).await;

    Mock::given(method("POST"))
        .and(path(format!("/unsubscribe/{}", token)))
        .and(body_json(serde_json::json!({
            "email": "user@example.com",
            "optout": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/user/{}", token)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.remote_server)
        .await;

    // the stale newsletter selection must not matter once remove_all is set
    let response = send_post_request(
        &format!("{}/newsletter/existing/{}", test_app.address, token),
        "lang=en&format=html&country=us&remove_all=on&newsletters=no-such-list".to_string(),
    )
    .await;

    assert_eq!(303, response.status().as_u16());
    assert_eq!(
        location(&response),
        format!("/newsletter/updated?unsub=1&token={}", token)
    );
}

#[actix_rt::test]
async fn identical_preferences_issue_no_remote_write() {
    let test_app = spawn_app().await;
    let token = valid_token();
    mock_user_and_catalog(&test_app, &token).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/existing/{}", test_app.address, token),
        "lang=en&format=html&country=us&newsletters=firefox-tips&newsletters=mobile".to_string(),
    )
    .await;

    assert_eq!(303, response.status().as_u16());
    assert_eq!(location(&response), "/newsletter/updated");
}

#[actix_rt::test]
async fn changing_only_the_language_sends_exactly_that_field() {
    let test_app = spawn_app().await;
    let token = valid_token();
    mock_user_and_catalog(&test_app, &token).await;

    Mock::given(method("POST"))
        .and(path(format!("/user/{}", token)))
        .and(body_json(serde_json::json!({ "lang": "de" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/existing/{}", test_app.address, token),
        "lang=de&format=html&country=us&newsletters=firefox-tips&newsletters=mobile".to_string(),
    )
    .await;

    assert_eq!(303, response.status().as_u16());
    assert_eq!(location(&response), "/newsletter/updated");
}

#[actix_rt::test]
async fn changed_newsletter_selection_sends_the_full_membership() {
    let test_app = spawn_app().await;
    let token = valid_token();
    mock_user_and_catalog(&test_app, &token).await;

    Mock::given(method("POST"))
        .and(path(format!("/user/{}", token)))
        .and(body_json(serde_json::json!({
            "newsletters": "beta,firefox-tips"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/existing/{}", test_app.address, token),
        "lang=en&format=html&country=us&newsletters=firefox-tips&newsletters=beta".to_string(),
    )
    .await;

    assert_eq!(303, response.status().as_u16());
}

#[actix_rt::test]
async fn failed_write_rerenders_with_generic_error() {
    let test_app = spawn_app().await;
    let token = valid_token();
    mock_user_and_catalog(&test_app, &token).await;

    Mock::given(method("POST"))
        .and(path(format!("/user/{}", token)))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/existing/{}", test_app.address, token),
        "lang=de&format=html&country=us&newsletters=firefox-tips".to_string(),
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("problem with our system"));
}

#[actix_rt::test]
async fn invalid_form_rerenders_with_field_errors_and_no_write() {
    let test_app = spawn_app().await;
    let token = valid_token();
    mock_user_and_catalog(&test_app, &token).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/existing/{}", test_app.address, token),
        "lang=en&format=html&country=us&newsletters=no-such-list".to_string(),
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("not available here"));
}
