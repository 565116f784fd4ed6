use crate::error::{FaultlineError, Result};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

mod handler;

pub use handler::{ConfigurationBuilder, HandlerConfiguration};

/// Key holding the deployment environment
pub const ENVIRONMENT_KEY: &str = "APP_ENVIRONMENT";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Load every process environment variable
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Deployment environment, `Production` when unset
    pub fn environment(&self) -> Result<Environment> {
        match self.get(ENVIRONMENT_KEY) {
            Some(value) => Environment::from_str(value.trim())
                .map_err(|_| FaultlineError::invalid_config(ENVIRONMENT_KEY, value)),
            None => Ok(Environment::Production),
        }
    }
}

/// Deployment environment.
///
/// Only `Development` changes handler output: indented JSON and exception
/// details in internal error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}
