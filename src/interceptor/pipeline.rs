use crate::exception::Fault;
use crate::interceptor::{ExceptionEvent, Interception};
use axum::http::StatusCode;
use std::fmt;
use std::sync::Arc;

/// Ordered chain of [`ExceptionEvent`]s
///
/// Every eligible event runs, in registration order. Each one is checked and
/// invoked against the state left by the previous one; there is no early exit.
#[derive(Clone, Default)]
pub struct InterceptionPipeline {
    events: Vec<Arc<dyn ExceptionEvent>>,
}

impl InterceptionPipeline {
    pub fn new(events: Vec<Arc<dyn ExceptionEvent>>) -> Self {
        Self { events }
    }

    pub fn push(&mut self, event: Arc<dyn ExceptionEvent>) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Arc<dyn ExceptionEvent>] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Run the chain over a fault and the current response status.
    ///
    /// The triple returned by an event replaces the working state as a whole,
    /// behavior included.
    pub fn apply(&self, status: StatusCode, fault: Fault) -> Interception {
        let mut state = Interception::new(status, fault);

        for event in &self.events {
            if !event.is_eligible(state.status, &state.fault) {
                continue;
            }

            state = event.intercept(state.status, state.fault);

            tracing::debug!(
                event = event.name(),
                status = state.status.as_u16(),
                behavior = ?state.behavior,
                "Interception event applied"
            );
        }

        state
    }
}

impl fmt::Debug for InterceptionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.events.iter().map(|event| event.name()))
            .finish()
    }
}
