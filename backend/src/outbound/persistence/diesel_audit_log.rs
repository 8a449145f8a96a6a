//! PostgreSQL-backed append-only `AuditLog`.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::AuditEvent;
use crate::domain::ports::{AuditLog, AuditLogError};
use crate::outbound::audit_trace::trace_audit_event;

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewAuditEventRow;
use super::pool::DbPool;
use super::schema::audit_events;

/// Appends audit events to the `audit_events` table. A database trigger
/// rejects updates and deletes on that table.
#[derive(Clone)]
pub struct DieselAuditLog {
    pool: DbPool,
}

impl DieselAuditLog {
    /// Create a new audit log with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLog for DieselAuditLog {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditLogError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, AuditLogError::unavailable))?;
        let row = NewAuditEventRow {
            id: event.id,
            recorded_at: event.recorded_at,
            actor_id: event.actor.map(|id| *id.as_uuid()),
            action: event.action.as_str(),
            target: &event.target,
            outcome: event.outcome.as_str(),
            detail: event.detail.as_deref(),
        };
        diesel::insert_into(audit_events::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                map_basic_diesel_error(err, AuditLogError::rejected, AuditLogError::unavailable)
            })?;
        trace_audit_event(event);
        Ok(())
    }
}
