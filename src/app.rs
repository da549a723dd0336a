pub use configuration::*;
pub use startup::PreferenceCenterApp;
pub use telemetry::setup_tracing;

mod configuration;
mod startup;
mod telemetry;
