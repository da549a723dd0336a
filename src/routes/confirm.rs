use std::convert::TryFrom;

use actix_web::{
    web,
    HttpRequest,
    HttpResponse,
};
use askama::Template;

use crate::domain::SubscriberToken;
use crate::l10n::{
    keys,
    FlashMessage,
    Localizer,
};
use crate::routes::pages::{
    render,
    request_locale,
};
use crate::routes::RouteError;
use crate::subscriber_client::SubscriberClient;

#[derive(Template)]
#[template(path = "confirm.html")]
struct ConfirmPage {
    flashes: Vec<FlashMessage>,
    success: bool,
    token_error: bool,
    generic_error: bool,
    bad_token_text: String,
    general_error_text: String,
}

/// Confirm a pending signup addressed by token.
#[tracing::instrument(
    name = "confirming subscription",
    skip(request, client, localizer),
    fields(token = %token)
)]
pub async fn confirm(
    request: HttpRequest,
    token: web::Path<String>,
    client: web::Data<SubscriberClient>,
    localizer: web::Data<Localizer>,
) -> Result<HttpResponse, RouteError> {
    let locale = request_locale(&request);
    let mut success = false;
    let mut token_error = false;
    let mut generic_error = false;

    match SubscriberToken::try_from(token.into_inner()) {
        // A malformed token can never be known to the remote service, so it
        // is not worth a round trip.
        Err(_) => token_error = true,
        Ok(token) => match client.confirm(&token).await {
            Ok(()) => success = true,
            Err(error) => {
                tracing::error!("error confirming token {}: {}", token.as_ref(), error);
                if error.rejection_code() == Some(403) {
                    token_error = true;
                } else {
                    generic_error = true;
                }
            }
        },
    }

    render(&ConfirmPage {
        flashes: Vec::new(),
        success,
        token_error,
        generic_error,
        bad_token_text: localizer.text(&locale, keys::BAD_TOKEN),
        general_error_text: localizer.text(&locale, keys::GENERAL_ERROR),
    })
}
