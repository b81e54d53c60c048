use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub fn compose_config<'de, CFG: Deserialize<'de>>(external_path: &str, env_prefix: &str) -> Result<CFG, ConfigError> {
    Config::builder()

        // Add in a local configuration file
        .add_source(File::with_name(external_path).required(false))

        // Add in settings from the environment (e.g. WFO_API_TIMEOUT_SECS)
        .add_source(Environment::with_prefix(env_prefix))

        .build()?
        .try_deserialize()
}

#[derive(Clone, Debug, Deserialize)]
pub struct OperatorConfig {
    /// Watch a single namespace, all namespaces when unset
    #[serde(default)]
    pub namespace: Option<String>,
    /// Directory holding the resource templates, the bundled ones are used when unset
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
    #[serde(default = "default_field_manager")]
    pub field_manager: String,
    #[serde(default = "default_api_timeout")]
    pub api_timeout_secs: u64,
    #[serde(default = "default_resync_interval")]
    pub resync_interval_secs: u64,
    #[serde(default)]
    pub patch_fallback: PatchFallback,
    #[serde(default = "default_retry_base")]
    pub retry_base_secs: u64,
    #[serde(default = "default_retry_max")]
    pub retry_max_secs: u64,
    #[serde(default)]
    pub metrics_address: Option<SocketAddr>,
}

/// Which patch failures are answered with a create-or-replace of the whole object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchFallback {
    /// Only a missing object is created, any other failure fails the attempt
    #[default]
    NotFound,
    /// Every patch failure is followed by a create-or-replace
    AnyError,
}

fn default_field_manager() -> String {
    String::from("worker-fleet-operator")
}

fn default_api_timeout() -> u64 {
    10
}

fn default_resync_interval() -> u64 {
    300
}

fn default_retry_base() -> u64 {
    5
}

fn default_retry_max() -> u64 {
    300
}

impl OperatorConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs)
    }

    pub fn retry_base(&self) -> Duration {
        Duration::from_secs(self.retry_base_secs)
    }

    pub fn retry_max(&self) -> Duration {
        Duration::from_secs(self.retry_max_secs.max(self.retry_base_secs))
    }
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            templates_dir: None,
            field_manager: default_field_manager(),
            api_timeout_secs: default_api_timeout(),
            resync_interval_secs: default_resync_interval(),
            patch_fallback: PatchFallback::default(),
            retry_base_secs: default_retry_base(),
            retry_max_secs: default_retry_max(),
            metrics_address: None,
        }
    }
}
