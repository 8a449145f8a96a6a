//! Mirror audit events into the `audit` tracing target.

use tracing::info;

use crate::domain::AuditEvent;

/// Emit `event` as a structured log line. Every audit adapter calls this
/// after a successful append.
pub(crate) fn trace_audit_event(event: &AuditEvent) {
    let actor = event.actor.map(|id| id.to_string());
    info!(
        target: "audit",
        event_id = %event.id,
        recorded_at = %event.recorded_at.to_rfc3339(),
        actor = actor.as_deref().unwrap_or("anonymous"),
        action = event.action.as_str(),
        target_entity = event.target.as_str(),
        outcome = event.outcome.as_str(),
        detail = event.detail.as_deref().unwrap_or(""),
        "audit event recorded"
    );
}
