pub use app_base_url::AppBaseUrl;
pub use email_format::EmailFormat;
pub use errors::MalformedInput;
pub use new_signup::NewSignup;
pub use subscriber::Subscriber;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_token::SubscriberToken;
pub use update_plan::{
    reconcile,
    ManagedPreferences,
    UpdatePlan,
    UserUpdate,
};

mod app_base_url;
mod email_format;
mod errors;
mod new_signup;
mod subscriber;
mod subscriber_email;
mod subscriber_token;
mod update_plan;
