use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use strum_macros::Display;
use thiserror::Error;

mod domain;
pub mod http;
pub mod taxonomy;

pub use domain::{DetailItem, DomainError, keys};

/// Type-erased error accepted at the pipeline boundary
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Discriminant of a [`Fault`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FaultKind {
    Domain,
    Forbidden,
    Aggregate,
    Internal,
}

/// An error caught while handling a request.
///
/// Business code returns `Result<T, Fault>` (or `Result<T, DomainError>`)
/// and the fault is classified once, at the pipeline boundary.
#[derive(Debug, Clone, Error)]
pub enum Fault {
    /// Expected business-rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Authorization denied.
    ///
    /// Answered with a fixed body; the message only reaches the body when an
    /// interception event routes the fault to the client-error response.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Several independent faults, each handled on its own
    #[error("{} errors occurred", .0.len())]
    Aggregate(Vec<Fault>),

    /// Anything unexpected
    #[error(transparent)]
    Internal(InternalFault),
}

impl Fault {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn aggregate(faults: impl IntoIterator<Item = Fault>) -> Self {
        Self::Aggregate(faults.into_iter().collect())
    }

    /// Wrap an unexpected error, remembering its type name as the kind.
    pub fn internal<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Internal(InternalFault::new(Some(short_type_name::<E>().into()), Arc::new(error)))
    }

    /// Wrap an unexpected error under an explicit kind.
    pub fn internal_with_kind<E>(kind: impl Into<Cow<'static, str>>, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Internal(InternalFault::new(Some(kind.into()), Arc::new(error)))
    }

    /// An unexpected failure described only by a message.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Internal(InternalFault::new(
            None,
            Arc::new(UnexpectedError(message.into())),
        ))
    }

    /// Recover a fault from a type-erased error.
    ///
    /// Faults and domain errors keep their identity; everything else is internal.
    pub fn from_boxed(error: BoxError) -> Self {
        let error = match error.downcast::<Fault>() {
            Ok(fault) => return *fault,
            Err(error) => error,
        };
        match error.downcast::<DomainError>() {
            Ok(domain) => Self::Domain(*domain),
            Err(error) => Self::Internal(InternalFault::new(None, Arc::from(error))),
        }
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Domain(_) => FaultKind::Domain,
            Self::Forbidden(_) => FaultKind::Forbidden,
            Self::Aggregate(_) => FaultKind::Aggregate,
            Self::Internal(_) => FaultKind::Internal,
        }
    }

    /// Domain key, when this is a domain error
    pub fn key(&self) -> Option<&str> {
        self.as_domain().map(DomainError::key)
    }

    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate(_))
    }

    /// Nested faults of an aggregate; empty for every other kind
    pub fn nested(&self) -> &[Fault] {
        match self {
            Self::Aggregate(faults) => faults,
            _ => &[],
        }
    }
}

impl From<anyhow::Error> for Fault {
    fn from(error: anyhow::Error) -> Self {
        // Boxing an anyhow error hides the concrete type, so downcast first.
        let error = match error.downcast::<Fault>() {
            Ok(fault) => return fault,
            Err(error) => error,
        };
        match error.downcast::<DomainError>() {
            Ok(domain) => Self::Domain(domain),
            Err(error) => Self::from_boxed(error.into()),
        }
    }
}

impl From<InternalFault> for Fault {
    fn from(error: InternalFault) -> Self {
        Self::Internal(error)
    }
}

/// An unexpected error with an optional kind used for behavior matching.
#[derive(Clone)]
pub struct InternalFault {
    kind: Option<Cow<'static, str>>,
    error: Arc<dyn Error + Send + Sync>,
}

impl InternalFault {
    pub fn new(kind: Option<Cow<'static, str>>, error: Arc<dyn Error + Send + Sync>) -> Self {
        Self { kind, error }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.error.as_ref()
    }
}

impl fmt::Debug for InternalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternalFault")
            .field("kind", &self.kind)
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for InternalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl Error for InternalFault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct UnexpectedError(String);

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Drop generic arguments before taking the last path segment.
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
