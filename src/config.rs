use std::{env, fmt, path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use ranobes_meta::{Credentials, FailurePolicy, MetaError, ranobes::DEFAULT_BASE_URL};
use serde::Deserialize;

const ENV_PREFIX: &str = "RANOBES_CONF_";

/// Config keys holding session cookie values. They may also be given under
/// their plain upper case names, the way they are usually exported.
const CREDENTIAL_KEYS: [&str; 3] = ["dle_user_id", "dle_password", "phpsessid"];

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_host")]
    pub web_host: String,
    #[serde(default = "default_port")]
    pub web_port: u16,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    #[serde(default)]
    pub dle_user_id: Option<String>,
    #[serde(default)]
    pub dle_password: Option<String>,
    #[serde(default)]
    pub phpsessid: Option<String>,
}

impl Config {
    /// Cookie values are taken from the environment verbatim. `Env` would
    /// parse `007` as a number and lose the leading zeros.
    pub fn figment(config_file: &Path) -> Figment {
        let mut figment = Figment::new().merge(Toml::file(config_file));
        for key in CREDENTIAL_KEYS {
            if let Ok(value) = env::var(key.to_ascii_uppercase()) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&CREDENTIAL_KEYS));
        for key in CREDENTIAL_KEYS {
            let var = format!("{ENV_PREFIX}{}", key.to_ascii_uppercase());
            if let Ok(value) = env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    pub fn load(config_file: &Path) -> Result<Self, figment::Error> {
        Self::figment(config_file).extract()
    }

    /// Missing credentials are not a startup error, every search checks them.
    pub fn credentials(&self) -> Result<Credentials, MetaError> {
        Credentials::from_parts(
            self.dle_user_id.as_deref(),
            self.dle_password.as_deref(),
            self.phpsessid.as_deref(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_host: default_host(),
            web_port: default_port(),
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            failure_policy: FailurePolicy::default(),
            dle_user_id: None,
            dle_password: None,
            phpsessid: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Config")
            .field("web_host", &self.web_host)
            .field("web_port", &self.web_port)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("failure_policy", &self.failure_policy)
            .field("dle_user_id", &set(&self.dle_user_id))
            .field("dle_password", &set(&self.dle_password))
            .field("phpsessid", &set(&self.phpsessid))
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8000
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_request_timeout() -> u64 {
    20
}
