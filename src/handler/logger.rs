use crate::exception::Fault;
use uuid::Uuid;

/// Sink for the single log entry written per handled fault
pub trait FaultLogger: Send + Sync + 'static {
    /// Expected faults
    fn log_info(&self, message: &str, fault: &Fault);

    /// Unexpected faults, tagged with the correlation id sent to the client
    fn log_error(&self, message: &str, fault: &Fault, correlation_id: Uuid);
}

/// Default logger, emitting `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFaultLogger;

impl FaultLogger for TracingFaultLogger {
    fn log_info(&self, message: &str, fault: &Fault) {
        tracing::info!(
            fault.kind = %fault.kind(),
            fault.key = fault.key(),
            error = %fault,
            "{}",
            message
        );
    }

    fn log_error(&self, message: &str, fault: &Fault, correlation_id: Uuid) {
        tracing::error!(
            log_entry_id = %correlation_id,
            fault.kind = %fault.kind(),
            error = ?fault,
            "{}",
            message
        );
    }
}
