//! # Faultline
//!
//! Turns errors raised while handling an HTTP request into classified JSON
//! responses.
//!
//! Every fault goes through the same steps:
//!
//! - **Interception**: registered [`ExceptionEvent`](interceptor::ExceptionEvent)s
//!   may rewrite the status code, replace the fault or decide its behavior
//! - **Behavior lookup**: behaviors registered per fault type at startup
//! - **Default classification**: `ModelValidation` → 406, `ResourceNotFound` → 404,
//!   other domain errors → 400, authorization denied → 403, anything else → 500
//! - **Response**: client errors are logged at info and described in the body;
//!   server errors are logged at error under a fresh correlation id, which is
//!   the only thing the body reveals outside development
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faultline::prelude::*;
//!
//! async fn create_user() -> std::result::Result<Json<&'static str>, Fault> {
//!     Err(DomainError::model_validation(["email is required"]).into())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     tracing_subscriber::fmt::init();
//!
//!     let config = ConfigService::new();
//!     let configuration = ConfigurationBuilder::from_config(&config)?
//!         .for_exception_with_status(
//!             FaultType::domain_key("PaymentDeclined"),
//!             Behavior::ClientError,
//!             StatusCode::PAYMENT_REQUIRED,
//!         )
//!         .build();
//!     let handler = ExceptionHandler::new(Arc::new(configuration));
//!
//!     let app = Router::new()
//!         .route("/users", axum::routing::post(create_user))
//!         .layer(ExceptionHandlingLayer::new(Arc::new(handler)));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod behavior;
pub mod config;
pub mod error;
pub mod exception;
pub mod handler;
pub mod interceptor;
pub mod layer;
pub mod serializer;

// Re-export core types
pub use behavior::{Behavior, FaultType};
pub use config::{ConfigurationBuilder, Environment, HandlerConfiguration};
pub use error::{FaultlineError, Result};
pub use exception::{DetailItem, DomainError, Fault};
pub use handler::ExceptionHandler;
pub use layer::ExceptionHandlingLayer;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use faultline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::behavior::{Behavior, BehaviorOverride, FaultType};
    pub use crate::config::{ConfigService, ConfigurationBuilder, Environment, HandlerConfiguration};
    pub use crate::error::{FaultlineError, Result};
    pub use crate::exception::{DetailItem, DomainError, Fault, FaultKind, keys};
    pub use crate::handler::{
        BufferedResponse, ExceptionHandler, FaultLogger, ResponseContext, TracingFaultLogger,
    };
    pub use crate::interceptor::{ExceptionEvent, FnEvent, Interception};
    pub use crate::layer::ExceptionHandlingLayer;
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
