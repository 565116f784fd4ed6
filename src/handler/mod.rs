//! The fault handler: the terminal catcher of a request.
//!
//! ```text
//! fault ─▶ interception events ─▶ aggregate? ──yes──▶ handle each member
//!                                     │ no
//!                                     ▼
//!                  behavior decided by an event? ──no──▶ forbidden? ──yes──▶ 403
//!                                     │ yes                  │ no
//!                                     │                      ▼
//!                                     │          registry, then default classification
//!                                     ▼                      │
//!                  ClientError: info log + domain envelope ◀─┤
//!                  ServerError: error log + internal envelope ◀┘
//! ```

use crate::behavior::Behavior;
use crate::config::HandlerConfiguration;
use crate::error::Result;
use crate::exception::{Fault, taxonomy};
use crate::interceptor::Interception;
use crate::serializer::{
    DomainEnvelope, ExceptionDetail, ForbiddenEnvelope, InternalEnvelope, JSON_CONTENT_TYPE,
    ResponseSerializer,
};
use axum::http::StatusCode;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

mod context;
mod logger;

pub use context::{BufferedResponse, ResponseContext};
pub use logger::{FaultLogger, TracingFaultLogger};

/// Future returned by [`ExceptionHandler::handle`]
pub type HandleFuture<'a> = Pin<Box<dyn Future<Output = Result<StatusCode>> + Send + 'a>>;

/// Converts a fault into a classified JSON response.
///
/// # Example
/// ```
/// use faultline::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> faultline::Result<()> {
/// let handler = ExceptionHandler::new(Arc::new(HandlerConfiguration::default()));
/// let mut response = BufferedResponse::new();
///
/// let fault = DomainError::resource_not_found([DetailItem::new("User", "id 7")]);
/// let status = handler.handle(fault.into(), &mut response).await?;
///
/// assert_eq!(status, StatusCode::NOT_FOUND);
/// # Ok(())
/// # }
/// ```
pub struct ExceptionHandler {
    configuration: Arc<HandlerConfiguration>,
    logger: Arc<dyn FaultLogger>,
    serializer: ResponseSerializer,
}

impl ExceptionHandler {
    /// Create a handler logging through `tracing`
    pub fn new(configuration: Arc<HandlerConfiguration>) -> Self {
        Self::with_logger(configuration, Arc::new(TracingFaultLogger))
    }

    pub fn with_logger(configuration: Arc<HandlerConfiguration>, logger: Arc<dyn FaultLogger>) -> Self {
        let serializer = ResponseSerializer::new(configuration.environment());
        Self {
            configuration,
            logger,
            serializer,
        }
    }

    pub fn configuration(&self) -> &HandlerConfiguration {
        &self.configuration
    }

    /// Handle a fault, writing the response body and status to `context`.
    ///
    /// Returns the final status code. For an aggregate every member is
    /// handled and written in turn, and the last member's status is returned.
    /// Write failures are returned as is. A failed write inside an aggregate
    /// stops it: the remaining members are neither logged nor written.
    pub fn handle<'a, C>(&'a self, fault: Fault, context: &'a mut C) -> HandleFuture<'a>
    where
        C: ResponseContext + ?Sized + 'a,
    {
        Box::pin(async move {
            let Interception {
                status,
                fault,
                behavior,
            } = self.configuration.pipeline().apply(context.status(), fault);
            context.set_status(status);

            let fault = match fault {
                Fault::Aggregate(faults) => {
                    for nested in faults {
                        self.handle(nested, &mut *context).await?;
                    }
                    return Ok(context.status());
                }
                fault => fault,
            };

            let behavior = match behavior {
                Some(behavior) => behavior,
                None if fault.is_forbidden() => {
                    context.set_status(StatusCode::FORBIDDEN);
                    return self.respond_forbidden(&fault, context).await;
                }
                None => self.resolve_behavior(&fault, context),
            };

            match behavior {
                Behavior::ClientError => self.respond_client_error(&fault, context).await,
                Behavior::ServerError => self.respond_server_error(&fault, context).await,
            }
        })
    }

    /// Registered behavior first, default classification otherwise
    fn resolve_behavior<C>(&self, fault: &Fault, context: &mut C) -> Behavior
    where
        C: ResponseContext + ?Sized,
    {
        if self.configuration.has_behaviors() {
            if let Some(registered) = self.configuration.lookup(fault) {
                context.set_status(registered.status_for(fault));
                return registered.behavior;
            }
        }

        let classification = taxonomy::classify(fault);
        context.set_status(classification.status);
        classification.behavior
    }

    async fn respond_client_error<C>(&self, fault: &Fault, context: &mut C) -> Result<StatusCode>
    where
        C: ResponseContext + ?Sized,
    {
        self.logger.log_info("A business error occurred.", fault);
        self.write(&DomainEnvelope::from(fault), context).await
    }

    async fn respond_forbidden<C>(&self, fault: &Fault, context: &mut C) -> Result<StatusCode>
    where
        C: ResponseContext + ?Sized,
    {
        self.logger.log_info("An unauthorized access occurred.", fault);
        self.write(&ForbiddenEnvelope::default(), context).await
    }

    async fn respond_server_error<C>(&self, fault: &Fault, context: &mut C) -> Result<StatusCode>
    where
        C: ResponseContext + ?Sized,
    {
        let log_entry_id = Uuid::new_v4();
        self.logger.log_error(
            &format!("{}: An unexpected error occurred.", log_entry_id),
            fault,
            log_entry_id,
        );

        let envelope = InternalEnvelope {
            log_entry_id,
            exception: self
                .configuration
                .is_development()
                .then(|| ExceptionDetail::from_error(fault)),
        };
        self.write(&envelope, context).await
    }

    async fn write<T, C>(&self, payload: &T, context: &mut C) -> Result<StatusCode>
    where
        T: Serialize + Sync,
        C: ResponseContext + ?Sized,
    {
        let body = self.serializer.to_json(payload)?;
        context.write_body(body, JSON_CONTENT_TYPE).await?;
        Ok(context.status())
    }
}
