use std::collections::BTreeSet;
use std::convert::TryFrom;

use actix_web::http::Method;
use actix_web::{
    web,
    HttpRequest,
    HttpResponse,
};
use askama::Template;

use crate::catalog::{
    subscription_choices,
    NewsletterChoice,
};
use crate::domain::{
    reconcile,
    EmailFormat,
    ManagedPreferences,
    Subscriber,
    SubscriberToken,
    UpdatePlan,
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
    see_other,
};
use crate::routes::{
    RouteError,
    RECOVERY_PATH,
    UNSUB_UNSUBSCRIBED_ALL,
    UPDATED_PATH,
};
use crate::subscriber_client::{
    SubscriberApiError,
    SubscriberClient,
};

#[derive(Template)]
#[template(path = "existing.html")]
struct ExistingPage {
    flashes: Vec<FlashMessage>,
    body: Option<ExistingBody>,
}

struct ExistingBody {
    token: String,
    email: String,
    lang: String,
    format_html: bool,
    format_text: bool,
    country: String,
    choices: Vec<NewsletterChoice>,
    form_errors: Vec<String>,
}

impl ExistingBody {
    fn new(
        token: &SubscriberToken,
        user: &Subscriber,
        choices: Vec<NewsletterChoice>,
        form_errors: Vec<String>,
    ) -> Self {
        Self {
            token: token.as_ref().to_string(),
            email: user.email.as_ref().to_string(),
            lang: user.lang.clone(),
            format_html: user.format == EmailFormat::Html,
            format_text: user.format == EmailFormat::Text,
            country: user.country.clone(),
            choices,
            form_errors,
        }
    }
}

/// The manage page is only addressable through a tokened link.
pub async fn existing_without_token() -> HttpResponse {
    see_other(RECOVERY_PATH)
}

/// Manage subscriptions: display the current record pre-filled on GET,
/// reconcile and push the submitted preferences on POST.
#[tracing::instrument(
    name = "managing subscriptions",
    skip(request, body, client, localizer),
    fields(token = %token)
)]
pub async fn existing(
    request: HttpRequest,
    token: web::Path<String>,
    body: web::Bytes,
    client: web::Data<SubscriberClient>,
    localizer: web::Data<Localizer>,
) -> Result<HttpResponse, RouteError> {
    let locale = request_locale(&request);

    let token = match SubscriberToken::try_from(token.into_inner()) {
        Ok(token) => token,
        // Bad token: nothing to look up remotely, point at the recovery page
        Err(_) => return Ok(redirect_to_recovery()),
    };

    let user = match client.user(&token).await {
        Ok(user) => user,
        Err(error) if error.is_network() => {
            // The backend is down; a write would fail the same way.
            tracing::error!("subscription service unreachable: {}", error);
            return render_bare(&localizer, &locale);
        }
        Err(error) => {
            tracing::error!("error fetching user for token {}: {}", token.as_ref(), error);
            return Ok(redirect_to_recovery());
        }
    };

    let catalog = match client.newsletters().await {
        Ok(catalog) => catalog,
        Err(error) => {
            tracing::error!("error fetching newsletter catalog: {}", error);
            return render_bare(&localizer, &locale);
        }
    };
    let choices = subscription_choices(&catalog, &user.newsletters);

    if request.method() != Method::POST {
        return render(&ExistingPage {
            flashes: Vec::new(),
            body: Some(ExistingBody::new(&token, &user, choices, Vec::new())),
        });
    }

    let values = FormValues::parse(&body);
    let permitted: BTreeSet<String> = choices
        .iter()
        .map(|choice| choice.newsletter.clone())
        .collect();
    let submitted = match validate_manage_form(&values, &permitted, &localizer, &locale) {
        Ok(submitted) => submitted,
        Err(errors) => {
            return render(&ExistingPage {
                flashes: Vec::new(),
                body: Some(ExistingBody::new(
                    &token,
                    &user,
                    choices,
                    errors.flattened(),
                )),
            });
        }
    };

    match apply_update_plan(&client, &token, &user, &submitted).await {
        Ok(location) => Ok(see_other(&location)),
        Err(error) => {
            tracing::error!("error updating subscriber record: {}", error);
            render_bare(&localizer, &locale)
        }
    }
}

fn redirect_to_recovery() -> HttpResponse {
    see_other(&format!("{}?flash=bad-token", RECOVERY_PATH))
}

fn render_bare(localizer: &Localizer, locale: &str) -> Result<HttpResponse, RouteError> {
    render(&ExistingPage {
        flashes: vec![FlashMessage::error(
            localizer.text(locale, keys::GENERAL_ERROR),
        )],
        body: None,
    })
}

/// Run the reconciler and issue the one remote write it calls for, if any.
/// Returns the landing-page location for the success redirect.
#[tracing::instrument(
    name = "applying subscription update",
    skip(client, user, submitted)
)]
async fn apply_update_plan(
    client: &SubscriberClient,
    token: &SubscriberToken,
    user: &Subscriber,
    submitted: &ManagedPreferences,
) -> Result<String, SubscriberApiError> {
    match reconcile(user, submitted) {
        UpdatePlan::NoChange => {}
        UpdatePlan::Update(update) => client.update_user(token, &update).await?,
        UpdatePlan::UnsubscribeAll => {
            client.unsubscribe(token, &user.email, true).await?;
            // The landing page needs the token to collect an unsubscribe
            // reason.
            return Ok(format!(
                "{}?unsub={}&token={}",
                UPDATED_PATH,
                UNSUB_UNSUBSCRIBED_ALL,
                token.as_ref()
            ));
        }
    }
    Ok(UPDATED_PATH.to_string())
}

/// Validate the posted preferences.
///
/// `remove_all` is read first: when set, the newsletter selection is not
/// validated at all, so a submission that only wants out of everything
/// cannot fail on stale checkbox state.
fn validate_manage_form(
    values: &FormValues,
    permitted: &BTreeSet<String>,
    localizer: &Localizer,
    locale: &str,
) -> Result<ManagedPreferences, FieldErrors> {
    let mut errors = FieldErrors::default();
    let remove_all = values.flag("remove_all");

    let lang = values.first("lang").unwrap_or_default().trim().to_string();
    if lang.is_empty()
        || !lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        errors.add("lang", localizer.text(locale, keys::INVALID_LANG));
    }

    let country = values
        .first("country")
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.add("country", localizer.text(locale, keys::INVALID_COUNTRY));
    }

    let format = match EmailFormat::try_from(
        values.first("format").unwrap_or_default().to_string(),
    ) {
        Ok(format) => format,
        Err(_) => {
            errors.add("format", localizer.text(locale, keys::INVALID_FORMAT));
            EmailFormat::Html
        }
    };

    let mut newsletters = BTreeSet::new();
    if !remove_all {
        for selected in values.all("newsletters") {
            if permitted.contains(selected) {
                newsletters.insert(selected.to_string());
            } else {
                errors.add(
                    "newsletters",
                    localizer.text(locale, keys::UNKNOWN_NEWSLETTER),
                );
            }
        }
    }

    errors.into_result(ManagedPreferences {
        lang,
        format,
        country,
        newsletters,
        remove_all,
    })
}
