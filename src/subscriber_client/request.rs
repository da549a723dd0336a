use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{
    EmailFormat,
    NewSignup,
    UserUpdate,
};

/// Partial user update. `newsletters` is the comma-joined full replacement
/// membership the remote service expects.
#[derive(Debug, Serialize)]
pub struct UserUpdateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<EmailFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newsletters: Option<String>,
}

impl<'a> UserUpdateRequest<'a> {
    pub fn from_update(update: &'a UserUpdate) -> Self {
        Self {
            lang: update.lang.as_deref(),
            format: update.format,
            country: update.country.as_deref(),
            newsletters: update.newsletters.as_ref().map(join_newsletters),
        }
    }
}

pub fn join_newsletters(newsletters: &BTreeSet<String>) -> String {
    newsletters
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Serialize)]
pub struct UnsubscribeRequest<'a> {
    pub email: &'a str,
    pub optout: bool,
}

#[derive(Debug, Serialize)]
pub struct SubscribeRequest<'a> {
    pub email: &'a str,
    pub newsletters: &'a str,
    pub format: EmailFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<&'a str>,
}

impl<'a> SubscribeRequest<'a> {
    pub fn from_signup(signup: &'a NewSignup) -> Self {
        Self {
            email: signup.email.as_ref(),
            newsletters: &signup.newsletter,
            format: signup.format,
            country: signup.country.as_deref(),
            lang: signup.lang.as_deref(),
            source_url: signup.source_url.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecoverRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UnsubReasonRequest<'a> {
    pub token: &'a str,
    pub reason: &'a str,
}
