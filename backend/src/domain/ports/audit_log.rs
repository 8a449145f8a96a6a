//! Append-only audit sink.
use async_trait::async_trait;

use crate::domain::AuditEvent;

use super::define_port_error;

define_port_error! {
    /// Failures raised while appending to the audit trail.
    pub enum AuditLogError {
        /// Sink could not be reached.
        Unavailable { message: String } => "audit log unavailable: {message}",
        /// Sink rejected the event.
        Rejected { message: String } => "audit log rejected event: {message}",
    }
}

/// Driven port appending audit events. Events are never read back or
/// removed through this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditLogError>;
}
