pub use confirm::confirm;
pub use errors::RouteError;
pub use existing::{
    existing,
    existing_without_token,
};
pub use health_check::health_check;
pub use recovery::{
    recovery,
    RECOVERY_PATH,
};
pub use signup::signup;
pub use updated::{
    updated,
    UNSUB_REASONS_SUBMITTED,
    UNSUB_UNSUBSCRIBED_ALL,
    UPDATED_PATH,
};

mod confirm;
mod errors;
mod existing;
mod forms;
mod health_check;
mod pages;
mod recovery;
mod signup;
mod updated;
