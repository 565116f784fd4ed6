use crate::behavior::{Behavior, BehaviorOverride, BehaviorRegistry, FaultType};
use crate::config::{ConfigService, Environment};
use crate::error::Result;
use crate::exception::Fault;
use crate::interceptor::{ExceptionEvent, InterceptionPipeline};
use axum::http::StatusCode;
use std::sync::Arc;

/// Immutable handler configuration
///
/// Built once at startup and shared with every request through an `Arc`.
///
/// # Example
/// ```
/// use faultline::prelude::*;
///
/// let configuration = HandlerConfiguration::configure(|cfg| {
///     cfg.for_exception_with_status(
///         FaultType::domain_key("PaymentDeclined"),
///         Behavior::ClientError,
///         StatusCode::PAYMENT_REQUIRED,
///     )
///     .for_exception(FaultType::internal_kind("Elapsed"), Behavior::ServerError)
/// });
/// assert!(configuration.has_behaviors());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HandlerConfiguration {
    behaviors: BehaviorRegistry,
    pipeline: InterceptionPipeline,
    environment: Environment,
}

impl HandlerConfiguration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Build a configuration from a single configuration function
    pub fn configure<F>(configure: F) -> Self
    where
        F: FnOnce(ConfigurationBuilder) -> ConfigurationBuilder,
    {
        configure(ConfigurationBuilder::new()).build()
    }

    /// Whether any behavior is registered; lookups are skipped otherwise
    pub fn has_behaviors(&self) -> bool {
        !self.behaviors.is_empty()
    }

    /// Behavior registered for `fault`, see [`BehaviorRegistry::lookup`]
    /// for the precedence between overlapping registrations.
    pub fn lookup(&self, fault: &Fault) -> Option<&BehaviorOverride> {
        self.behaviors.lookup(fault)
    }

    pub fn pipeline(&self) -> &InterceptionPipeline {
        &self.pipeline
    }

    pub fn events(&self) -> &[Arc<dyn ExceptionEvent>] {
        self.pipeline.events()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Builder for [`HandlerConfiguration`]
#[derive(Default)]
pub struct ConfigurationBuilder {
    behaviors: BehaviorRegistry,
    pipeline: InterceptionPipeline,
    environment: Environment,
}

impl ConfigurationBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the environment recorded in a config service
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        Ok(Self::new().environment(config.environment()?))
    }

    /// Handle faults of `fault_type` with `behavior`.
    ///
    /// The status code follows the default classification when it agrees
    /// with `behavior`, and the behavior's own default otherwise.
    pub fn for_exception(mut self, fault_type: FaultType, behavior: Behavior) -> Self {
        self.behaviors
            .register(fault_type, BehaviorOverride::new(behavior, None));
        self
    }

    /// Handle faults of `fault_type` with `behavior` and answer with `status`.
    pub fn for_exception_with_status(
        mut self,
        fault_type: FaultType,
        behavior: Behavior,
        status: StatusCode,
    ) -> Self {
        self.behaviors
            .register(fault_type, BehaviorOverride::new(behavior, Some(status)));
        self
    }

    /// Append an interception event
    pub fn add_event<E: ExceptionEvent>(mut self, event: E) -> Self {
        self.pipeline.push(Arc::new(event));
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn build(self) -> HandlerConfiguration {
        tracing::debug!(
            behaviors = self.behaviors.len(),
            events = ?self.pipeline,
            environment = %self.environment,
            "Fault handler configured"
        );

        HandlerConfiguration {
            behaviors: self.behaviors,
            pipeline: self.pipeline,
            environment: self.environment,
        }
    }
}
