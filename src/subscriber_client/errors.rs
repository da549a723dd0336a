/// Failures talking to the remote subscription service, classified the way
/// handlers need to react to them.
#[derive(thiserror::Error, Debug)]
pub enum SubscriberApiError {
    /// The service could not be reached at all (connect error or timeout).
    /// Never retried: the remote side gives no idempotency guarantee.
    #[error("error reaching subscription service during {operation}: {source}")]
    Network {
        operation: &'static str,
        source: reqwest::Error,
    },
    /// The service answered with an error response carrying a status code,
    /// e.g. 403 for a bad token or 404 for an unknown email.
    #[error("subscription service rejected {operation} with code {code}: {desc}")]
    Rejected {
        operation: &'static str,
        code: u16,
        desc: String,
    },
    /// Successful transport whose body did not carry an `ok` status.
    #[error("subscription service returned unexpected status {status:?} for {operation}")]
    UnexpectedStatus {
        operation: &'static str,
        status: String,
    },
}

impl SubscriberApiError {
    /// Status code of a rejected request; `None` for transport failures and
    /// contract violations.
    pub fn rejection_code(&self) -> Option<u16> {
        match self {
            SubscriberApiError::Rejected { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, SubscriberApiError::Network { .. })
    }
}
