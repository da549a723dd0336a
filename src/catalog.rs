//! Newsletter catalog supplied by the remote service, and the logic deciding
//! which newsletters a given subscriber may see and toggle.

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use serde::Deserialize;

/// Descriptor of one newsletter as published by the remote catalog.
#[derive(Clone, Debug, Deserialize)]
pub struct Newsletter {
    pub title: String,
    pub description: String,
    pub languages: Vec<String>,
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub order: Option<i32>,
}

/// One row of the manage-subscriptions form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewsletterChoice {
    pub newsletter: String,
    pub title: String,
    pub description: String,
    pub subscribed: bool,
    pub english_only: bool,
    pub order: Option<i32>,
}

/// Build the list of newsletters a subscriber may toggle.
///
/// A newsletter is listed when it is flagged for display or the subscriber
/// is already on it. The list sorts by `order` when the first built row
/// carries one, by title otherwise; the key choice is all-or-nothing.
pub fn subscription_choices(
    catalog: &BTreeMap<String, Newsletter>,
    subscribed: &BTreeSet<String>,
) -> Vec<NewsletterChoice> {
    let mut choices: Vec<NewsletterChoice> = catalog
        .iter()
        .filter(|(id, newsletter)| newsletter.show || subscribed.contains(*id))
        .map(|(id, newsletter)| NewsletterChoice {
            newsletter: id.clone(),
            title: newsletter.title.clone(),
            description: newsletter.description.clone(),
            subscribed: subscribed.contains(id),
            english_only: newsletter.languages.len() == 1
                && newsletter.languages[0].starts_with("en"),
            order: newsletter.order,
        })
        .collect();

    match choices.first().map(|choice| choice.order.is_some()) {
        Some(true) => choices.sort_by_key(|choice| choice.order.unwrap_or(i32::MAX)),
        _ => choices.sort_by(|a, b| a.title.cmp(&b.title)),
    }
    choices
}
