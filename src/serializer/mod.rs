//! JSON rendering of response envelopes.

use crate::config::Environment;
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

mod envelope;

pub use envelope::{DomainEnvelope, ExceptionDetail, ForbiddenEnvelope, InternalEnvelope};

/// Deepest nesting level written to a response body
pub const MAX_DEPTH: usize = 10;

/// Content type of every body written by the handler
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Renders envelopes and ad-hoc payloads to JSON.
///
/// Null fields are dropped and containers nested deeper than [`MAX_DEPTH`]
/// are cut off. Output is indented in development and compact otherwise.
#[derive(Debug, Clone, Copy)]
pub struct ResponseSerializer {
    pretty: bool,
}

impl ResponseSerializer {
    pub fn new(environment: Environment) -> Self {
        Self {
            pretty: environment.is_development(),
        }
    }

    pub fn to_json<T: Serialize + ?Sized>(&self, payload: &T) -> Result<String> {
        let mut value = serde_json::to_value(payload)?;
        prune(&mut value, 1);

        let json = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(json)
    }
}

fn prune(value: &mut Value, depth: usize) {
    let keep_containers = depth < MAX_DEPTH;
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null() && (keep_containers || !is_container(v)));
            map.values_mut().for_each(|v| prune(v, depth + 1));
        }
        Value::Array(items) => {
            items.retain(|v| keep_containers || !is_container(v));
            items.iter_mut().for_each(|v| prune(v, depth + 1));
        }
        _ => {}
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}
