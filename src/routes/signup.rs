use std::convert::TryFrom;

use actix_web::http::Method;
use actix_web::{
    web,
    HttpRequest,
    HttpResponse,
};
use askama::Template;

use crate::domain::{
    EmailFormat,
    NewSignup,
    SubscriberEmail,
};
use crate::l10n::{
    keys,
    FlashMessage,
    Localizer,
};
use crate::routes::forms::{
    FieldErrors,
    FormValues,
};
use crate::routes::pages::{
    render,
    request_locale,
};
use crate::routes::RouteError;
use crate::subscriber_client::SubscriberClient;

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupPage {
    flashes: Vec<FlashMessage>,
    success: bool,
    form_errors: Vec<String>,
    email: String,
    newsletter: String,
    country: String,
    lang: String,
    source_url: String,
}

impl SignupPage {
    fn blank() -> Self {
        Self {
            flashes: Vec::new(),
            success: false,
            form_errors: Vec::new(),
            email: String::new(),
            newsletter: String::new(),
            country: String::new(),
            lang: String::new(),
            source_url: String::new(),
        }
    }
}

/// Embeddable single-newsletter signup form. Renders in place on both
/// outcomes so it can live inside any page footer.
#[tracing::instrument(
    name = "single newsletter signup",
    skip(request, body, client, localizer)
)]
pub async fn signup(
    request: HttpRequest,
    body: web::Bytes,
    client: web::Data<SubscriberClient>,
    localizer: web::Data<Localizer>,
) -> Result<HttpResponse, RouteError> {
    let locale = request_locale(&request);

    if request.method() != Method::POST {
        return render(&SignupPage::blank());
    }

    let values = FormValues::parse(&body);
    let mut page = SignupPage {
        email: values.first("email").unwrap_or_default().to_string(),
        newsletter: values.first("newsletter").unwrap_or_default().to_string(),
        country: values.first("country").unwrap_or_default().to_string(),
        lang: values.first("lang").unwrap_or_default().to_string(),
        source_url: values.first("source_url").unwrap_or_default().to_string(),
        ..SignupPage::blank()
    };

    match validate_signup_form(&values, &localizer, &locale) {
        Err(errors) => page.form_errors = errors.flattened(),
        Ok(signup) => match client.subscribe(&signup).await {
            Ok(()) => page.success = true,
            Err(error) => {
                tracing::error!(
                    "error subscribing {} to {}: {}",
                    signup.email.as_ref(),
                    signup.newsletter,
                    error
                );
                page.form_errors = vec![localizer.text(&locale, keys::GENERAL_ERROR)];
            }
        },
    }

    render(&page)
}

fn validate_signup_form(
    values: &FormValues,
    localizer: &Localizer,
    locale: &str,
) -> Result<NewSignup, FieldErrors> {
    let mut errors = FieldErrors::default();

    let email = match SubscriberEmail::try_from(
        values.first("email").unwrap_or_default().to_string(),
    ) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.add("email", localizer.text(locale, keys::INVALID_EMAIL));
            None
        }
    };

    let newsletter = values
        .first("newsletter")
        .unwrap_or_default()
        .trim()
        .to_string();
    if newsletter.is_empty()
        || !newsletter
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.add(
            "newsletter",
            localizer.text(locale, keys::UNKNOWN_NEWSLETTER),
        );
    }

    // embedding forms that offer no choice default to html
    let format = match values.first("format") {
        None | Some("") => EmailFormat::Html,
        Some(raw) => match EmailFormat::try_from(raw.to_string()) {
            Ok(format) => format,
            Err(_) => {
                errors.add("format", localizer.text(locale, keys::INVALID_FORMAT));
                EmailFormat::Html
            }
        },
    };

    let optional = |name: &str| {
        values
            .first(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    match email {
        Some(email) if errors.is_empty() => Ok(NewSignup {
            email,
            newsletter,
            format,
            country: optional("country"),
            lang: optional("lang"),
            source_url: optional("source_url"),
        }),
        _ => Err(errors),
    }
}
