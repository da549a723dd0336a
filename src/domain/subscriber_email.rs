use std::convert::TryFrom;

use validator::validate_email;

use crate::domain::errors::MalformedInput;

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct SubscriberEmail(String);

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubscriberEmail {
    type Error = MalformedInput;

    fn try_from(email: String) -> Result<Self, Self::Error> {
        if validate_email(email.clone()) {
            Ok(SubscriberEmail(email))
        } else {
            Err(MalformedInput::InvalidEmail { email })
        }
    }
}
