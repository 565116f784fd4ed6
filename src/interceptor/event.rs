use crate::exception::Fault;
use crate::interceptor::{ExceptionEvent, Interception};
use axum::http::StatusCode;

/// An event built from a pair of closures
///
/// ```
/// use faultline::prelude::*;
///
/// let teapot = FnEvent::new(
///     "teapot",
///     |_, fault| fault.key() == Some("Teapot"),
///     |_, fault| Interception::new(StatusCode::IM_A_TEAPOT, fault).with_behavior(Behavior::ClientError),
/// );
/// ```
pub struct FnEvent<P, I> {
    name: String,
    eligible: P,
    intercept: I,
}

impl<P, I> FnEvent<P, I>
where
    P: Fn(StatusCode, &Fault) -> bool + Send + Sync + 'static,
    I: Fn(StatusCode, Fault) -> Interception + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, eligible: P, intercept: I) -> Self {
        Self {
            name: name.into(),
            eligible,
            intercept,
        }
    }
}

impl<P, I> ExceptionEvent for FnEvent<P, I>
where
    P: Fn(StatusCode, &Fault) -> bool + Send + Sync + 'static,
    I: Fn(StatusCode, Fault) -> Interception + Send + Sync + 'static,
{
    fn is_eligible(&self, status: StatusCode, fault: &Fault) -> bool {
        (self.eligible)(status, fault)
    }

    fn intercept(&self, status: StatusCode, fault: Fault) -> Interception {
        (self.intercept)(status, fault)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
