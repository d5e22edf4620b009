pub mod models;
pub mod repository;

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Error as SqlxError;

use crate::store::{snapshot, StateStore, StorageError, StudioState, SCHEMA_VERSION};
use repository::{AuditLogRepository, SnapshotRepository};

/// 보관할 최근 스냅샷 수
const SNAPSHOT_RETENTION: i64 = 20;

/// SQLite 데이터베이스 초기화 및 연결
pub async fn init_database(database_url: &str) -> Result<SqlitePool, SqlxError> {
    info!("🗄️  SQLite 데이터베이스 초기화 중... ({})", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // 인메모리 DB는 연결마다 별도 DB가 되므로 연결 하나만 사용
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    // 연결 풀 생성
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    // 테이블 생성
    create_tables(&pool).await?;

    info!("✅ 데이터베이스 초기화 완료");

    Ok(pool)
}

/// 필요한 테이블 생성
async fn create_tables(pool: &SqlitePool) -> Result<(), SqlxError> {
    // 상태 스냅샷 테이블
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            version INTEGER NOT NULL,
            payload TEXT NOT NULL,
            saved_at INTEGER NOT NULL
        )"
    )
    .execute(pool)
    .await?;

    // 감사 로그 테이블 (스냅샷과 별도로 조회용 사본 유지)
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS audit_logs (
            id TEXT PRIMARY KEY,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            details TEXT,
            location TEXT NOT NULL,
            timestamp INTEGER NOT NULL
        )"
    )
    .execute(pool)
    .await?;

    // 인덱스 생성
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_logs_entity ON audit_logs(entity_id)")
        .execute(pool)
        .await?;

    debug!("📋 테이블 생성 완료");

    Ok(())
}

/// SQLite 기반 상태 저장소
///
/// 저장할 때마다 스냅샷 한 행을 추가하고 가장 최근 행을 읽습니다.
/// 새로 추가된 감사 로그는 같은 트랜잭션에서 `audit_logs`에 복사합니다.
pub struct SqliteStore {
    pool: SqlitePool,
    /// `audit_logs`에 이미 복사된 감사 로그 수
    mirrored_audit: AtomicUsize,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = init_database(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            mirrored_audit: AtomicUsize::new(0),
        }
    }

    pub fn audit_logs(&self) -> AuditLogRepository {
        AuditLogRepository::new(self.pool.clone())
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn load(&self) -> Result<Option<StudioState>, StorageError> {
        let record = SnapshotRepository::new(self.pool.clone()).find_latest().await?;
        match record {
            Some(record) => {
                let state = snapshot::decode(&record.payload)?;
                self.mirrored_audit
                    .store(state.audit_log().len(), Ordering::SeqCst);
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, state: &StudioState) -> Result<(), StorageError> {
        let now = Utc::now();
        let payload = snapshot::encode(state, now)?;
        let entries = state.audit_log().entries();
        let already = self.mirrored_audit.load(Ordering::SeqCst).min(entries.len());

        // 단일 트랜잭션으로 스냅샷과 감사 로그 저장
        let mut tx = self.pool.begin().await?;

        SnapshotRepository::insert(&mut tx, SCHEMA_VERSION, &payload, now.timestamp_millis()).await?;
        for entry in &entries[already..] {
            AuditLogRepository::insert(&mut tx, entry).await?;
        }
        SnapshotRepository::prune(&mut tx, SNAPSHOT_RETENTION).await?;

        tx.commit().await?;

        self.mirrored_audit.store(entries.len(), Ordering::SeqCst);
        debug!("스냅샷 저장 완료 (감사 로그 {}건 추가)", entries.len() - already);

        Ok(())
    }
}
