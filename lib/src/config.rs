use serde::Deserialize;

pub const DEFAULT_PATH: &str = "/etc/courier/courier.toml";
const ENV_PREFIX: &str = "COURIER";

/// SMTP relay settings consumed by the transport.
///
/// The relay must support STARTTLS and PLAIN authentication.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Loads courier config from filesystem and merges it with any
/// environment variables prefixed with COURIER_.
///
/// This function will panic on error.
pub fn load_config(path: Option<&str>) -> Config {
    let mut settings = config::Config::default();

    settings
        .merge(config::File::with_name(path.unwrap_or(DEFAULT_PATH)))
        .unwrap()
        .merge(config::Environment::with_prefix(ENV_PREFIX))
        .unwrap();

    settings.try_into::<Config>().unwrap()
}
