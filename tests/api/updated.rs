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

use preference_center::l10n::{
    Localizer,
    UNSUB_REASON_KEYS,
};

use crate::helpers::*;

#[actix_rt::test]
async fn updated_shows_the_thank_you_message_by_default() {
    let test_app = spawn_app().await;

    let response =
        send_get_request(&format!("{}/newsletter/updated", test_app.address)).await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("Thanks for updating your email preferences."));
}

#[actix_rt::test]
async fn unparseable_unsub_counts_as_a_plain_update() {
    let test_app = spawn_app().await;

    let response = send_get_request(&format!(
        "{}/newsletter/updated?unsub=banana",
        test_app.address
    ))
    .await;

    let body = response.text().await.unwrap();
    assert!(body.contains("Thanks for updating your email preferences."));
}

#[actix_rt::test]
async fn unsub_one_shows_the_reason_form() {
    let test_app = spawn_app().await;
    let token = valid_token();

    let response = send_get_request(&format!(
        "{}/newsletter/updated?unsub=1&token={}",
        test_app.address, token
    ))
    .await;

    let body = response.text().await.unwrap();
    assert!(body.contains("You have been unsubscribed"));
    assert!(body.contains(r#"name="reason0""#));
    assert!(body.contains(r#"name="reason4""#));
    assert!(!body.contains("Thanks for updating your email preferences."));
}

#[actix_rt::test]
async fn submitted_reasons_are_forwarded_once_in_index_order() {
    let test_app = spawn_app().await;
    let token = valid_token();
    let localizer = Localizer::builtin();

    let expected_reason = format!(
        "{}\n\n{}\n\nspam\n\n",
        localizer.fallback_text(UNSUB_REASON_KEYS[0]),
        localizer.fallback_text(UNSUB_REASON_KEYS[3]),
    );

    Mock::given(method("POST"))
        .and(path("/custom_unsub_reason"))
        .and(body_json(serde_json::json!({
            "token": token,
            "reason": expected_reason
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .expect(1)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!(
            "{}/newsletter/updated?unsub=2&token={}",
            test_app.address, token
        ),
        "reason0=on&reason3=on&reason-text-p=on&reason-text=spam".to_string(),
    )
    .await;

    assert_eq!(200, response.status().as_u16());
    let body = response.text().await.unwrap();
    assert!(body.contains("Thanks for telling us why"));
}

#[actix_rt::test]
async fn reasons_without_a_valid_token_are_not_forwarded() {
    let test_app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.remote_server)
        .await;

    let response = send_post_request(
        &format!("{}/newsletter/updated?unsub=2", test_app.address),
        "reason0=on".to_string(),
    )
    .await;

    assert_eq!(200, response.status().as_u16());

    let response = send_post_request(
        &format!(
            "{}/newsletter/updated?unsub=2&token=not-a-uuid",
            test_app.address
        ),
        "reason0=on".to_string(),
    )
    .await;

    assert_eq!(200, response.status().as_u16());
}
