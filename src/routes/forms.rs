//! Typed decoding of submitted forms.
//!
//! actix's `Form` extractor cannot represent repeated keys (newsletter and
//! reason checkboxes), so the multi-value handlers decode the raw body
//! themselves and validate into plain structs, collecting field-keyed
//! error messages.

use std::collections::BTreeMap;

use url::form_urlencoded;

#[derive(Clone, Debug, Default)]
pub struct FormValues(Vec<(String, String)>);

impl FormValues {
    pub fn parse(raw: &[u8]) -> Self {
        Self(form_urlencoded::parse(raw).into_owned().collect())
    }

    /// Pairs from the form body and the query string. Posted values come
    /// first, so they win on single-value lookup.
    pub fn merged(query: &str, body: &[u8]) -> Self {
        let mut pairs: Vec<(String, String)> =
            form_urlencoded::parse(body).into_owned().collect();
        pairs.extend(form_urlencoded::parse(query.as_bytes()).into_owned());
        Self(pairs)
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.0
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    /// Checkbox semantics: present with a truthy value.
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.first(name),
            Some("on") | Some("true") | Some("1") | Some("yes")
        )
    }
}

/// The key for errors that do not belong to a single field.
pub const FORM_WIDE: &str = "form";

/// Field-keyed validation messages.
#[derive(Clone, Debug, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One displayable line per message, field-prefixed except for
    /// form-wide entries.
    pub fn flattened(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |message| {
                    if field == FORM_WIDE {
                        message.clone()
                    } else {
                        format!("{}: {}", field, message)
                    }
                })
            })
            .collect()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}
