use std::env;
use std::env::VarError;

use config::{
    Config,
    ConfigError,
    File,
};
use custom_error::custom_error;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub subscriber_api: SubscriberApiSettings,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct ApplicationSettings {
    pub base_url: String,
    pub host: String,
    pub l10n_dir: Option<String>,
    pub max_pending_connections: u32,
    pub port: u16,
}

/// Connection details for the remote subscription service.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct SubscriberApiSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApplicationSettings {
    pub fn binding_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

custom_error! {
///! Custom error for missing env variable or invalid configuration files.
pub ConfigurationError
    MissingAppEnv{source:VarError} = "`APP_ENVIRONMENT` is not set \
    (possible values: [`local`|`production`]).",
    InvalidConfig{source:ConfigError} = "{source}",
}

/// Load the configuration from the directory: `configuration`.
///
/// It fails if:
/// - the `APP_ENVIRONMENT` env variable is not set
/// - the `configuration/base` file is missing
/// - the `configuration/${APP_ENVIRONMENT}` file is missing
/// - the `configuration/*` files have missing or unexpected fields
///
/// # Examples
///
/// ```rust
/// use preference_center::app::load_configuration;
///
/// std::env::set_var("APP_ENVIRONMENT", "local");
/// assert!(load_configuration().is_ok());
/// ```
pub fn load_configuration() -> Result<Settings, ConfigurationError> {
    let mut config = Config::new();
    config.merge(File::with_name("configuration/base").required(true))?;
    let app_environment = env::var("APP_ENVIRONMENT")?;
    config.merge(File::with_name(&format!("configuration/{}", app_environment)).required(true))?;

    // Add in settings from environment variables (with a prefix of APP and '__' as
    // separator) E.g. `APP_APPLICATION__PORT=5001 would set
    // `Settings.application.port`
    config.merge(config::Environment::with_prefix("app").separator("__"))?;

    config.try_into().map(Ok)?
}
