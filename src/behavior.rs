//! Handling behaviors and the registry that maps fault types to them.

use crate::exception::{Fault, taxonomy};
use axum::http::StatusCode;
use std::borrow::Cow;
use strum_macros::{Display, EnumString};

/// How a fault is answered and logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Behavior {
    /// Expected, caller-caused. Logged at info, body describes the fault.
    ClientError,
    /// Unexpected. Logged at error with a correlation id.
    ServerError,
}

impl Behavior {
    /// Status used when an override does not name one and the default
    /// classification disagrees with the behavior.
    pub fn default_status(self) -> StatusCode {
        match self {
            Behavior::ClientError => StatusCode::BAD_REQUEST,
            Behavior::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A registered behavior with an optional status code override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorOverride {
    pub behavior: Behavior,
    pub status: Option<StatusCode>,
}

impl BehaviorOverride {
    pub fn new(behavior: Behavior, status: Option<StatusCode>) -> Self {
        Self { behavior, status }
    }

    /// Status to answer `fault` with under this override.
    ///
    /// Without an explicit status the default classification's status is
    /// kept if it agrees on the behavior, e.g. a `ModelValidation` error
    /// registered as a client error still answers 406.
    pub fn status_for(&self, fault: &Fault) -> StatusCode {
        if let Some(status) = self.status {
            return status;
        }
        let classification = taxonomy::classify(fault);
        if classification.behavior == self.behavior {
            classification.status
        } else {
            self.behavior.default_status()
        }
    }
}

/// The type a behavior is registered for.
///
/// `Domain` covers every domain error while `DomainKey` covers the ones with
/// one key, mirroring a base type and one of its subtypes. The same holds for
/// `Internal` and `InternalKind`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FaultType {
    Domain,
    DomainKey(Cow<'static, str>),
    Forbidden,
    Internal,
    InternalKind(Cow<'static, str>),
}

impl FaultType {
    pub fn domain_key(key: impl Into<Cow<'static, str>>) -> Self {
        Self::DomainKey(key.into())
    }

    pub fn internal_kind(kind: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalKind(kind.into())
    }

    /// Whether `fault` is an instance of this type, directly or through its family.
    pub fn matches(&self, fault: &Fault) -> bool {
        match (self, fault) {
            (FaultType::Domain, Fault::Domain(_)) => true,
            (FaultType::DomainKey(key), Fault::Domain(error)) => error.key() == key.as_ref(),
            (FaultType::Forbidden, Fault::Forbidden(_)) => true,
            (FaultType::Internal, Fault::Internal(_)) => true,
            (FaultType::InternalKind(kind), Fault::Internal(error)) => {
                error.kind() == Some(kind.as_ref())
            }
            _ => false,
        }
    }
}

/// Ordered mapping from fault types to behaviors
#[derive(Debug, Clone, Default)]
pub struct BehaviorRegistry {
    entries: Vec<(FaultType, BehaviorOverride)>,
}

impl BehaviorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior for a fault type.
    ///
    /// Registering the same type again replaces the earlier entry in place,
    /// so it keeps its original position in the lookup order.
    pub fn register(&mut self, fault_type: FaultType, behavior: BehaviorOverride) {
        match self.entries.iter_mut().find(|(ty, _)| *ty == fault_type) {
            Some(entry) => entry.1 = behavior,
            None => self.entries.push((fault_type, behavior)),
        }
    }

    /// Find the behavior registered for `fault`.
    ///
    /// Entries are tried in registration order and the first match wins.
    /// When both a family and one of its members are registered (say
    /// `Domain` and `DomainKey("Conflict")`), whichever was registered first
    /// decides; register the specific type first to have it take precedence.
    pub fn lookup(&self, fault: &Fault) -> Option<&BehaviorOverride> {
        self.entries
            .iter()
            .find(|(ty, _)| ty.matches(fault))
            .map(|(_, behavior)| behavior)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
