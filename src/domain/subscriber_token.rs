use std::convert::TryFrom;

use crate::domain::errors::MalformedInput;

// A token looks like: f81d4fae-7dec-11d0-a765-00a0c91e6bf6
const GROUP_LENGTHS: [usize; 5] = [8, 4, 4, 4, 12];

/// Opaque credential identifying a subscriber to the remote service, handed
/// out in every newsletter so subscriptions can be managed without an
/// account.
///
/// Only the canonical hyphenated UUID form is accepted: five groups of
/// 8-4-4-4-12 hex digits, case-insensitive, matched against the full string.
/// Anything else never reaches the remote service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriberToken(String);

impl SubscriberToken {
    pub fn has_uuid_shape(candidate: &str) -> bool {
        let groups: Vec<&str> = candidate.split('-').collect();
        groups.len() == GROUP_LENGTHS.len()
            && groups
                .iter()
                .zip(GROUP_LENGTHS.iter())
                .all(|(group, expected)| {
                    group.len() == *expected && group.chars().all(|c| c.is_ascii_hexdigit())
                })
    }
}

impl TryFrom<String> for SubscriberToken {
    type Error = MalformedInput;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        if SubscriberToken::has_uuid_shape(&token) {
            Ok(Self(token))
        } else {
            Err(MalformedInput::InvalidToken { token })
        }
    }
}

impl AsRef<str> for SubscriberToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
