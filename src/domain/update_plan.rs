use std::collections::BTreeSet;

use crate::domain::{
    EmailFormat,
    Subscriber,
};

/// Preferences posted from the manage-subscriptions form, validated field by
/// field before they get here.
#[derive(Clone, Debug)]
pub struct ManagedPreferences {
    pub lang: String,
    pub format: EmailFormat,
    pub country: String,
    pub newsletters: BTreeSet<String>,
    pub remove_all: bool,
}

/// Partial update payload for the remote service.
///
/// `newsletters` carries the full replacement membership, not a delta: the
/// remote service treats subscription lists as replacements.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserUpdate {
    pub lang: Option<String>,
    pub format: Option<EmailFormat>,
    pub country: Option<String>,
    pub newsletters: Option<BTreeSet<String>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.lang.is_none()
            && self.format.is_none()
            && self.country.is_none()
            && self.newsletters.is_none()
    }
}

/// Remote writes required to honor a submission: none, one combined update,
/// or one opt-out unsubscribe. Never more than one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UpdatePlan {
    NoChange,
    Update(UserUpdate),
    UnsubscribeAll,
}

/// Diff the current record against the submitted preferences.
///
/// `remove_all` short-circuits every comparison: the only remote write is
/// the opt-out unsubscribe. Otherwise each locale field is included only
/// when it changed, and the newsletter membership only when the desired set
/// differs from the current one. An empty diff means no remote call at all.
pub fn reconcile(current: &Subscriber, submitted: &ManagedPreferences) -> UpdatePlan {
    if submitted.remove_all {
        return UpdatePlan::UnsubscribeAll;
    }

    let mut update = UserUpdate::default();
    if submitted.lang != current.lang {
        update.lang = Some(submitted.lang.clone());
    }
    if submitted.format != current.format {
        update.format = Some(submitted.format);
    }
    if submitted.country != current.country {
        update.country = Some(submitted.country.clone());
    }
    if submitted.newsletters != current.newsletters {
        update.newsletters = Some(submitted.newsletters.clone());
    }

    if update.is_empty() {
        UpdatePlan::NoChange
    } else {
        UpdatePlan::Update(update)
    }
}
