use std::convert::TryFrom;

use actix_web::http::Method;
use actix_web::{
    web,
    HttpRequest,
    HttpResponse,
};
use askama::Template;

use crate::domain::{
    AppBaseUrl,
    SubscriberEmail,
};
use crate::l10n::{
    keys,
    FlashMessage,
    Localizer,
};
use crate::routes::forms::FormValues;
use crate::routes::pages::{
    render,
    request_locale,
    see_other,
};
use crate::routes::RouteError;
use crate::subscriber_client::SubscriberClient;

pub const RECOVERY_PATH: &str = "/newsletter/recovery";

#[derive(Template)]
#[template(path = "recovery.html")]
struct RecoveryPage {
    flashes: Vec<FlashMessage>,
    show_form: bool,
    form_errors: Vec<String>,
    email: String,
}

/// Let a subscriber who lost their management link request a fresh one by
/// email. A successful submission redirects to `?success` so a refresh
/// cannot trigger a second message.
#[tracing::instrument(
    name = "recovering preference link",
    skip(request, body, client, localizer, base_url)
)]
pub async fn recovery(
    request: HttpRequest,
    body: web::Bytes,
    client: web::Data<SubscriberClient>,
    localizer: web::Data<Localizer>,
    base_url: web::Data<AppBaseUrl>,
) -> Result<HttpResponse, RouteError> {
    let locale = request_locale(&request);
    let values = FormValues::merged(request.query_string(), &body);

    if request.method() == Method::POST {
        let raw_email = values.first("email").unwrap_or_default().to_string();
        let email = match SubscriberEmail::try_from(raw_email.clone()) {
            Ok(email) => email,
            Err(_) => {
                return render(&RecoveryPage {
                    flashes: Vec::new(),
                    show_form: true,
                    form_errors: vec![localizer.text(&locale, keys::INVALID_EMAIL)],
                    email: raw_email,
                });
            }
        };

        return match client.send_recovery_message(&email).await {
            Ok(()) => Ok(see_other(&format!("{}?success", RECOVERY_PATH))),
            Err(error) => {
                let form_errors = if error.rejection_code() == Some(404) {
                    // Unknown address: actionable message with a signup link
                    let signup_url = format!(
                        "{}/newsletter/signup",
                        base_url.0.trim_end_matches('/')
                    );
                    vec![localizer
                        .text(&locale, keys::UNKNOWN_ADDRESS)
                        .replace("{url}", &signup_url)]
                } else {
                    tracing::error!("error sending recovery message: {}", error);
                    vec![localizer.text(&locale, keys::GENERAL_ERROR)]
                };
                render(&RecoveryPage {
                    flashes: Vec::new(),
                    show_form: true,
                    form_errors,
                    email: raw_email,
                })
            }
        };
    }

    let mut flashes = Vec::new();
    let mut show_form = true;
    if values.contains("success") {
        // Redirected here after a successful submission; the message
        // replaces the form.
        flashes.push(FlashMessage::info(
            localizer.text(&locale, keys::RECOVERY_SUCCESS),
        ));
        show_form = false;
    } else if values.first("flash") == Some("bad-token") {
        flashes.push(FlashMessage::error(localizer.text(&locale, keys::BAD_TOKEN)));
    }

    render(&RecoveryPage {
        flashes,
        show_form,
        form_errors: Vec::new(),
        email: String::new(),
    })
}
