use crate::domain::email_format::EmailFormat;
use crate::domain::subscriber_email::SubscriberEmail;

/// A single-newsletter signup parsed from the embeddable footer form.
#[derive(Debug)]
pub struct NewSignup {
    pub email: SubscriberEmail,
    pub newsletter: String,
    pub format: EmailFormat,
    pub country: Option<String>,
    pub lang: Option<String>,
    pub source_url: Option<String>,
}
