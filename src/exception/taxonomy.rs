//! Default classification, used when neither an interception event nor a
//! registered behavior decided how a fault is handled.

use crate::behavior::Behavior;
use crate::exception::Fault;
use axum::http::StatusCode;

/// Default outcome for a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    pub behavior: Behavior,
}

impl Classification {
    const fn client(status: StatusCode) -> Self {
        Self {
            status,
            behavior: Behavior::ClientError,
        }
    }

    const fn server() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            behavior: Behavior::ServerError,
        }
    }
}

/// Classify a fault by its kind and domain key.
///
/// Precedence: model validation (406), resource not found (404), any other
/// domain error (400), authorization denied (403), everything else (500).
/// Aggregates are never classified as a whole; the handler fans out over
/// their members, so they land on the server-error default here.
pub fn classify(fault: &Fault) -> Classification {
    match fault {
        Fault::Domain(error) if error.is_model_validation() => {
            Classification::client(StatusCode::NOT_ACCEPTABLE)
        }
        Fault::Domain(error) if error.is_resource_not_found() => {
            Classification::client(StatusCode::NOT_FOUND)
        }
        Fault::Domain(_) => Classification::client(StatusCode::BAD_REQUEST),
        Fault::Forbidden(_) => Classification::client(StatusCode::FORBIDDEN),
        Fault::Aggregate(_) | Fault::Internal(_) => Classification::server(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::{DetailItem, DomainError};

    #[test]
    fn test_model_validation_is_not_acceptable() {
        let fault = Fault::from(DomainError::model_validation(["email is invalid"]));
        let classification = classify(&fault);

        assert_eq!(classification.status, StatusCode::NOT_ACCEPTABLE);
        assert_eq!(classification.behavior, Behavior::ClientError);
    }

    #[test]
    fn test_resource_not_found() {
        let fault = Fault::from(DomainError::resource_not_found([DetailItem::new(
            "Order", "42",
        )]));

        assert_eq!(classify(&fault).status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_domain_errors_are_bad_request() {
        for key in ["Conflict", "modelvalidation", ""] {
            let fault = Fault::from(DomainError::new(key, "nope"));
            assert_eq!(classify(&fault), Classification::client(StatusCode::BAD_REQUEST));
        }
    }

    #[test]
    fn test_unexpected_is_server_error() {
        let classification = classify(&Fault::unexpected("boom"));

        assert_eq!(classification.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(classification.behavior, Behavior::ServerError);
    }

    #[test]
    fn test_classification_is_stable() {
        let fault = Fault::from(DomainError::new("Conflict", "Duplicate."));
        assert_eq!(classify(&fault), classify(&fault));
    }
}
