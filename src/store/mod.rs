//! 상태 저장소
//!
//! 스튜디오 상태를 버전이 붙은 스냅샷 단위로 읽고 씁니다. 비즈니스 로직은
//! [`StateStore`] 트레이트만 보므로 백엔드를 바꿔도 영향이 없습니다.

pub mod json_file;
pub mod memory;
pub mod snapshot;
pub mod state;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use log::info;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SCHEMA_VERSION};
pub use state::StudioState;

use crate::db::SqliteStore;

/// 저장소 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("저장소 I/O 오류: {0}")]
  Io(#[from] std::io::Error),
  #[error("스냅샷 직렬화 오류: {0}")]
  Serialization(#[from] serde_json::Error),
  #[error("데이터베이스 오류: {0}")]
  Database(#[from] sqlx::Error),
  #[error("지원하지 않는 스냅샷 버전: {found} (현재 {expected}), 마이그레이션 또는 초기화 필요")]
  UnsupportedVersion { found: u32, expected: u32 },
  #[error("저장소를 사용할 수 없음: {0}")]
  Unavailable(String),
}

/// 스냅샷 저장소 인터페이스
#[async_trait]
pub trait StateStore: Send + Sync {
  /// 마지막 스냅샷을 읽습니다. 저장된 적이 없으면 `None`.
  async fn load(&self) -> Result<Option<StudioState>, StorageError>;

  /// 전체 상태를 저장합니다.
  async fn save(&self, state: &StudioState) -> Result<(), StorageError>;
}

/// 저장소 백엔드 선택
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSpec {
  /// 프로세스 메모리 (재시작 시 유실)
  Memory,
  /// JSON 스냅샷 파일
  JsonFile(PathBuf),
  /// SQLite 데이터베이스 URL
  Sqlite(String),
}

impl FromStr for StoreSpec {
  type Err = String;

  /// `memory`, `json:<path>`, `sqlite:<url>` 형식
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s == "memory" {
      return Ok(StoreSpec::Memory);
    }
    if let Some(path) = s.strip_prefix("json:") {
      if path.is_empty() {
        return Err("json 저장소 경로가 비어 있습니다".to_string());
      }
      return Ok(StoreSpec::JsonFile(PathBuf::from(path)));
    }
    if s.starts_with("sqlite:") {
      return Ok(StoreSpec::Sqlite(s.to_string()));
    }
    Err(format!("알 수 없는 저장소 설정: {}", s))
  }
}

/// 설정에 맞는 저장소를 엽니다.
pub async fn open_store(spec: &StoreSpec) -> Result<Arc<dyn StateStore>, StorageError> {
  match spec {
    StoreSpec::Memory => {
      info!("메모리 저장소 사용");
      Ok(Arc::new(MemoryStore::new()))
    }
    StoreSpec::JsonFile(path) => {
      info!("JSON 스냅샷 저장소 사용: {}", path.display());
      Ok(Arc::new(JsonFileStore::new(path.clone())))
    }
    StoreSpec::Sqlite(url) => {
      info!("SQLite 저장소 사용: {}", url);
      Ok(Arc::new(SqliteStore::connect(url).await?))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_store_spec() {
    assert_eq!("memory".parse::<StoreSpec>().unwrap(), StoreSpec::Memory);
    assert_eq!(
      "json:data/studio.json".parse::<StoreSpec>().unwrap(),
      StoreSpec::JsonFile(PathBuf::from("data/studio.json"))
    );
    assert_eq!(
      "sqlite://studio.db".parse::<StoreSpec>().unwrap(),
      StoreSpec::Sqlite("sqlite://studio.db".to_string())
    );
    assert!("json:".parse::<StoreSpec>().is_err());
    assert!("redis://x".parse::<StoreSpec>().is_err());
  }
}
