use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 스냅샷 DB 모델
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SnapshotRecord {
    pub id: i64,
    pub version: i64,
    pub payload: String,
    pub saved_at: i64,
}

/// 감사 로그 DB 모델
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogRecord {
    pub id: String,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Option<String>,
    pub location: String,
    pub timestamp: i64,
}
