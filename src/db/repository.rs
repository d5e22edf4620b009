use super::models::{AuditLogRecord, SnapshotRecord};
use crate::audit::AuditLogEntry;
use sqlx::sqlite::{SqlitePool, Sqlite};
use sqlx::{Error as SqlxError, Transaction};

/// 스냅샷 저장소
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 스냅샷 추가
    pub async fn insert(
        tx: &mut Transaction<'_, Sqlite>,
        version: u32,
        payload: &str,
        saved_at: i64,
    ) -> Result<(), SqlxError> {
        sqlx::query(
            "INSERT INTO snapshots (version, payload, saved_at)
             VALUES (?, ?, ?)"
        )
        .bind(i64::from(version))
        .bind(payload)
        .bind(saved_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// 최근 `keep`개를 제외한 스냅샷 삭제
    pub async fn prune(tx: &mut Transaction<'_, Sqlite>, keep: i64) -> Result<(), SqlxError> {
        sqlx::query(
            "DELETE FROM snapshots
             WHERE id NOT IN (SELECT id FROM snapshots ORDER BY id DESC LIMIT ?)"
        )
        .bind(keep)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// 가장 최근 스냅샷 조회
    pub async fn find_latest(&self) -> Result<Option<SnapshotRecord>, SqlxError> {
        let record = sqlx::query_as::<_, SnapshotRecord>(
            "SELECT id, version, payload, saved_at
             FROM snapshots
             ORDER BY id DESC
             LIMIT 1"
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

/// 감사 로그 저장소
pub struct AuditLogRepository {
    pool: SqlitePool,
}

impl AuditLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 로그 기록 (같은 ID는 무시)
    pub async fn insert(
        tx: &mut Transaction<'_, Sqlite>,
        entry: &AuditLogEntry,
    ) -> Result<(), SqlxError> {
        sqlx::query(
            "INSERT OR IGNORE INTO audit_logs
             (id, event_type, entity_type, entity_id, details, location, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&entry.id)
        .bind(entry.action.as_str())
        .bind(entry.entity_type.as_str())
        .bind(&entry.entity_id)
        .bind(&entry.details)
        .bind(&entry.location)
        .bind(entry.timestamp.timestamp_millis())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// 엔티티별 로그 조회 (기록 순)
    pub async fn find_by_entity(&self, entity_id: &str) -> Result<Vec<AuditLogRecord>, SqlxError> {
        let logs = sqlx::query_as::<_, AuditLogRecord>(
            "SELECT id, event_type, entity_type, entity_id, details, location, timestamp
             FROM audit_logs
             WHERE entity_id = ?
             ORDER BY timestamp ASC, rowid ASC"
        )
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
