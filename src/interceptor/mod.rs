use crate::behavior::Behavior;
use crate::exception::Fault;
use axum::http::StatusCode;

mod event;
mod pipeline;

pub use event::FnEvent;
pub use pipeline::InterceptionPipeline;

/// Working state threaded through the interception events
#[derive(Debug, Clone)]
pub struct Interception {
    pub status: StatusCode,
    pub fault: Fault,
    /// `None` leaves the decision to the registry and default classification
    pub behavior: Option<Behavior>,
}

impl Interception {
    pub fn new(status: StatusCode, fault: Fault) -> Self {
        Self {
            status,
            fault,
            behavior: None,
        }
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }
}

/// The ExceptionEvent trait
///
/// Events run before a fault is classified and may rewrite the status code,
/// replace the fault, or decide the behavior outright.
///
/// # Example
/// ```
/// use faultline::prelude::*;
///
/// /// Upstream timeouts are the gateway's problem, not ours.
/// struct GatewayTimeout;
///
/// impl ExceptionEvent for GatewayTimeout {
///     fn is_eligible(&self, _status: StatusCode, fault: &Fault) -> bool {
///         FaultType::internal_kind("Elapsed").matches(fault)
///     }
///
///     fn intercept(&self, _status: StatusCode, fault: Fault) -> Interception {
///         Interception::new(StatusCode::GATEWAY_TIMEOUT, fault).with_behavior(Behavior::ServerError)
///     }
/// }
/// ```
pub trait ExceptionEvent: Send + Sync + 'static {
    fn is_eligible(&self, status: StatusCode, fault: &Fault) -> bool;

    fn intercept(&self, status: StatusCode, fault: Fault) -> Interception;

    /// Name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
