use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use derivative::Derivative;
use reqwest::{
    Client,
    Response,
    Url,
};
use serde::Deserialize;

use crate::catalog::Newsletter;
use crate::domain::{
    NewSignup,
    Subscriber,
    SubscriberEmail,
    SubscriberToken,
    UserUpdate,
};
use crate::subscriber_client::errors::SubscriberApiError;
use crate::subscriber_client::request::{
    RecoverRequest,
    SubscribeRequest,
    UnsubReasonRequest,
    UnsubscribeRequest,
    UserUpdateRequest,
};

/// Client for the remote subscription service, the system of record for all
/// subscriber data. One instance is built at startup and shared.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct SubscriberClient {
    http_client: Client,
    base_url: Url,
    #[derivative(Debug = "ignore")]
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    status: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    desc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewslettersBody {
    newsletters: BTreeMap<String, Newsletter>,
}

impl SubscriberClient {
    pub fn new(base_url: Url, api_key: String, timeout_secs: u64) -> Result<Self, anyhow::Error> {
        Ok(Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .context(format!(
                    "Error creating subscriber client with:\nbase_url: {}\ntimeout_secs: {}",
                    base_url, timeout_secs
                ))?,
            base_url,
            api_key,
        })
    }

    /// Mark a pending signup as confirmed.
    #[tracing::instrument(name = "confirming pending signup", skip(self))]
    pub async fn confirm(&self, token: &SubscriberToken) -> Result<(), SubscriberApiError> {
        let request = self
            .http_client
            .post(self.endpoint(&format!("confirm/{}", token.as_ref())));
        let response = self.send("confirm", request).await?;
        Self::expect_ok("confirm", response).await
    }

    /// Fetch the current subscription state for a token.
    #[tracing::instrument(name = "fetching subscriber record", skip(self))]
    pub async fn user(&self, token: &SubscriberToken) -> Result<Subscriber, SubscriberApiError> {
        let request = self
            .http_client
            .get(self.endpoint(&format!("user/{}", token.as_ref())));
        let response = self.send("user", request).await?;
        let body = Self::checked_body("user", response).await?;
        serde_json::from_str(&body).map_err(|_| SubscriberApiError::UnexpectedStatus {
            operation: "user",
            status: "malformed body".to_string(),
        })
    }

    /// Partial update of locale fields and/or full replacement of the
    /// newsletter membership.
    #[tracing::instrument(name = "updating subscriber record", skip(self, update))]
    pub async fn update_user(
        &self,
        token: &SubscriberToken,
        update: &UserUpdate,
    ) -> Result<(), SubscriberApiError> {
        let request = self
            .http_client
            .post(self.endpoint(&format!("user/{}", token.as_ref())))
            .json(&UserUpdateRequest::from_update(update));
        let response = self.send("update_user", request).await?;
        Self::expect_ok("update_user", response).await
    }

    /// Remove all subscriptions; `optout` signals global opt-out semantics
    /// to the remote service.
    #[tracing::instrument(name = "unsubscribing from everything", skip(self))]
    pub async fn unsubscribe(
        &self,
        token: &SubscriberToken,
        email: &SubscriberEmail,
        optout: bool,
    ) -> Result<(), SubscriberApiError> {
        let request = self
            .http_client
            .post(self.endpoint(&format!("unsubscribe/{}", token.as_ref())))
            .json(&UnsubscribeRequest {
                email: email.as_ref(),
                optout,
            });
        let response = self.send("unsubscribe", request).await?;
        Self::expect_ok("unsubscribe", response).await
    }

    /// Create a new single-newsletter subscription.
    #[tracing::instrument(name = "subscribing new signup", skip(self, signup), fields(newsletter = %signup.newsletter))]
    pub async fn subscribe(&self, signup: &NewSignup) -> Result<(), SubscriberApiError> {
        let request = self
            .http_client
            .post(self.endpoint("subscribe"))
            .json(&SubscribeRequest::from_signup(signup));
        let response = self.send("subscribe", request).await?;
        Self::expect_ok("subscribe", response).await
    }

    /// Ask the service to email a management link to a known address.
    #[tracing::instrument(name = "requesting recovery message", skip(self, email))]
    pub async fn send_recovery_message(
        &self,
        email: &SubscriberEmail,
    ) -> Result<(), SubscriberApiError> {
        let request = self
            .http_client
            .post(self.endpoint("recover"))
            .json(&RecoverRequest {
                email: email.as_ref(),
            });
        let response = self.send("recover", request).await?;
        Self::expect_ok("recover", response).await
    }

    /// Record the free-text reason a subscriber gave for opting out.
    #[tracing::instrument(name = "recording unsubscribe reason", skip(self, reason))]
    pub async fn custom_unsub_reason(
        &self,
        token: &SubscriberToken,
        reason: &str,
    ) -> Result<(), SubscriberApiError> {
        let request = self
            .http_client
            .post(self.endpoint("custom_unsub_reason"))
            .json(&UnsubReasonRequest {
                token: token.as_ref(),
                reason,
            });
        let response = self.send("custom_unsub_reason", request).await?;
        Self::expect_ok("custom_unsub_reason", response).await
    }

    /// Fetch the newsletter catalog.
    #[tracing::instrument(name = "fetching newsletter catalog", skip(self))]
    pub async fn newsletters(
        &self,
    ) -> Result<BTreeMap<String, Newsletter>, SubscriberApiError> {
        let request = self.http_client.get(self.endpoint("newsletters"));
        let response = self.send("newsletters", request).await?;
        let body = Self::checked_body("newsletters", response).await?;
        let newsletters: NewslettersBody =
            serde_json::from_str(&body).map_err(|_| SubscriberApiError::UnexpectedStatus {
                operation: "newsletters",
                status: "malformed body".to_string(),
            })?;
        Ok(newsletters.newsletters)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, SubscriberApiError> {
        request
            .header("x-api-key", self.api_key.as_str())
            .send()
            .await
            .map_err(|source| SubscriberApiError::Network { operation, source })
    }

    /// Resolve the transport outcome: reject non-2xx responses with the
    /// status code carried in the error body (falling back to the HTTP
    /// status), hand back the raw body otherwise.
    async fn checked_body(
        operation: &'static str,
        response: Response,
    ) -> Result<String, SubscriberApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| SubscriberApiError::Network { operation, source })?;
        if !status.is_success() {
            let error_body: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
            return Err(SubscriberApiError::Rejected {
                operation,
                code: error_body.code.unwrap_or_else(|| status.as_u16()),
                desc: error_body.desc.unwrap_or_else(|| status.to_string()),
            });
        }
        Ok(body)
    }

    async fn expect_ok(
        operation: &'static str,
        response: Response,
    ) -> Result<(), SubscriberApiError> {
        let body = Self::checked_body(operation, response).await?;
        let api_status: ApiStatus =
            serde_json::from_str(&body).map_err(|_| SubscriberApiError::UnexpectedStatus {
                operation,
                status: "malformed body".to_string(),
            })?;
        if api_status.status == "ok" {
            Ok(())
        } else {
            Err(SubscriberApiError::UnexpectedStatus {
                operation,
                status: api_status.status,
            })
        }
    }
}
