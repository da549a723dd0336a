use std::convert::TryFrom;

use actix_web::http::Method;
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
    UNSUB_REASON_KEYS,
};
use crate::routes::forms::FormValues;
use crate::routes::pages::{
    render,
    request_locale,
};
use crate::routes::RouteError;
use crate::subscriber_client::SubscriberClient;

pub const UPDATED_PATH: &str = "/newsletter/updated";

/// The user just unsubscribed from everything; ask them why.
pub const UNSUB_UNSUBSCRIBED_ALL: u8 = 1;
/// The user submitted their reasons; show the final thank-you.
pub const UNSUB_REASONS_SUBMITTED: u8 = 2;

struct ReasonRow {
    index: usize,
    text: String,
}

#[derive(Template)]
#[template(path = "updated.html")]
struct UpdatedPage {
    flashes: Vec<FlashMessage>,
    unsubscribed_all: bool,
    reasons_submitted: bool,
    token: Option<String>,
    reasons: Vec<ReasonRow>,
}

/// Landing page after a preference update.
///
/// Branches on the `unsub` parameter: absent or unparseable counts as a
/// plain update and earns the thank-you flash.
#[tracing::instrument(
    name = "post-update landing",
    skip(request, body, client, localizer)
)]
pub async fn updated(
    request: HttpRequest,
    body: web::Bytes,
    client: web::Data<SubscriberClient>,
    localizer: web::Data<Localizer>,
) -> Result<HttpResponse, RouteError> {
    let locale = request_locale(&request);
    let values = FormValues::merged(request.query_string(), &body);

    let unsub: u8 = values
        .first("unsub")
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);
    let unsubscribed_all = unsub == UNSUB_UNSUBSCRIBED_ALL;
    let reasons_submitted = unsub == UNSUB_REASONS_SUBMITTED;

    // The token only travels along on the unsubscribe-all path.
    let token = values
        .first("token")
        .map(str::to_string)
        .and_then(|token| SubscriberToken::try_from(token).ok());

    let mut flashes = Vec::new();
    if unsub == 0 {
        flashes.push(FlashMessage::info(localizer.text(&locale, keys::THANK_YOU)));
    }

    if request.method() == Method::POST && reasons_submitted {
        if let Some(token) = &token {
            let reason_text = collect_reasons(&values, &localizer);
            if let Err(error) = client.custom_unsub_reason(token, &reason_text).await {
                tracing::error!("error recording unsubscribe reason: {}", error);
                flashes.push(FlashMessage::error(
                    localizer.text(&locale, keys::GENERAL_ERROR),
                ));
            }
        }
    }

    render(&UpdatedPage {
        flashes,
        unsubscribed_all,
        reasons_submitted,
        token: token.map(|token| token.as_ref().to_string()),
        reasons: UNSUB_REASON_KEYS
            .iter()
            .enumerate()
            .map(|(index, key)| ReasonRow {
                index,
                text: localizer.text(&locale, key),
            })
            .collect(),
    })
}

/// Paste the checked predefined reasons and the optional free text into one
/// blob, each entry followed by a blank line. Predefined reasons go out in
/// fallback-locale wording so the people reading them on the other side
/// can.
fn collect_reasons(values: &FormValues, localizer: &Localizer) -> String {
    let mut reasons = Vec::new();
    for (index, key) in UNSUB_REASON_KEYS.iter().enumerate() {
        if values.contains(&format!("reason{}", index)) {
            reasons.push(localizer.fallback_text(key));
        }
    }
    if values.contains("reason-text-p") {
        reasons.push(values.first("reason-text").unwrap_or_default().to_string());
    }
    format!("{}\n\n", reasons.join("\n\n"))
}
