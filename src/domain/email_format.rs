use std::convert::TryFrom;

use crate::domain::errors::MalformedInput;

/// Email rendering preference held by the remote service for a subscriber.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailFormat {
    Html,
    Text,
}

impl TryFrom<String> for EmailFormat {
    type Error = MalformedInput;

    fn try_from(format: String) -> Result<Self, Self::Error> {
        match format.as_str() {
            "html" => Ok(EmailFormat::Html),
            "text" => Ok(EmailFormat::Text),
            _ => Err(MalformedInput::InvalidFormat { format }),
        }
    }
}
