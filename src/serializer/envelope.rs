use crate::exception::{DetailItem, Fault, keys};
use crate::serializer::MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::error::Error;
use uuid::Uuid;

/// Body for faults handled as client errors.
///
/// Domain errors fill every field. Any other fault handled as a client error
/// only exposes its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<DetailItem>>,
}

impl From<&Fault> for DomainEnvelope {
    fn from(fault: &Fault) -> Self {
        match fault.as_domain() {
            Some(error) => Self {
                key: Some(error.key().to_string()),
                message: error.message().to_string(),
                items: Some(error.items().to_vec()),
            },
            None => Self {
                key: None,
                message: fault.to_string(),
                items: None,
            },
        }
    }
}

/// Body for faults handled as server errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalEnvelope {
    pub log_entry_id: Uuid,
    /// Only set in development
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionDetail>,
}

/// Fixed body for authorization denials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForbiddenEnvelope {
    pub key: String,
    pub message: String,
}

impl Default for ForbiddenEnvelope {
    fn default() -> Self {
        Self {
            key: keys::FORBIDDEN.to_string(),
            message: "Access to this resource is forbidden.".to_string(),
        }
    }
}

/// The innermost cause of an error, reduced to its message.
///
/// Nothing else about the error (type names, source chain, backtraces) is
/// ever exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetail {
    pub message: String,
}

impl ExceptionDetail {
    /// Walk the source chain down to its base error.
    ///
    /// The walk stops at a source already visited or after `MAX_DEPTH` links.
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut current = error;
        let mut visited = vec![address(current)];

        while let Some(source) = current.source() {
            if visited.len() >= MAX_DEPTH || visited.contains(&address(source)) {
                break;
            }
            visited.push(address(source));
            current = source;
        }

        Self {
            message: current.to_string(),
        }
    }
}

fn address(error: &(dyn Error + 'static)) -> *const () {
    error as *const dyn Error as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::DomainError;
    use std::fmt;

    #[derive(Debug)]
    struct Layered {
        message: &'static str,
        source: Option<Box<Layered>>,
    }

    impl fmt::Display for Layered {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for Layered {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.source.as_deref().map(|s| s as &(dyn Error + 'static))
        }
    }

    /// Reports itself as its own source.
    #[derive(Debug)]
    struct SelfReferential;

    impl fmt::Display for SelfReferential {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("loop")
        }
    }

    impl Error for SelfReferential {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(self)
        }
    }

    fn chain(depth: usize) -> Layered {
        let mut error = Layered {
            message: "level 0",
            source: None,
        };
        for _ in 1..depth {
            error = Layered {
                message: "outer",
                source: Some(Box::new(error)),
            };
        }
        error
    }

    #[test]
    fn test_detail_uses_base_error() {
        let detail = ExceptionDetail::from_error(&chain(3));
        assert_eq!(detail.message, "level 0");
    }

    #[test]
    fn test_detail_depth_is_capped() {
        let detail = ExceptionDetail::from_error(&chain(MAX_DEPTH + 5));
        assert_eq!(detail.message, "outer");
    }

    #[test]
    fn test_detail_breaks_cycles() {
        let detail = ExceptionDetail::from_error(&SelfReferential);
        assert_eq!(detail.message, "loop");
    }

    #[test]
    fn test_domain_envelope_from_fault() {
        let fault = Fault::from(DomainError::model_validation(["a", "b"]));
        let envelope = DomainEnvelope::from(&fault);

        assert_eq!(envelope.key.as_deref(), Some(keys::MODEL_VALIDATION));
        assert_eq!(envelope.items.unwrap().len(), 2);
    }

    #[test]
    fn test_non_domain_envelope_only_has_message() {
        let envelope = DomainEnvelope::from(&Fault::unexpected("quota exceeded"));

        assert_eq!(envelope.key, None);
        assert_eq!(envelope.items, None);
        assert_eq!(envelope.message, "quota exceeded");
    }
}
