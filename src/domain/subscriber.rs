use std::collections::BTreeSet;

use serde::Deserialize;

use crate::domain::{
    EmailFormat,
    SubscriberEmail,
};

/// Snapshot of a subscriber record as held by the remote service.
///
/// Fetched fresh for every request and never persisted locally; the remote
/// service stays the single system of record.
#[derive(Clone, Debug, Deserialize)]
pub struct Subscriber {
    pub email: SubscriberEmail,
    pub token: String,
    pub lang: String,
    pub format: EmailFormat,
    pub country: String,
    #[serde(default)]
    pub newsletters: BTreeSet<String>,
    /// Opaque creation metadata, passed through untouched.
    #[serde(default, rename = "created-date")]
    pub created_date: Option<String>,
}
