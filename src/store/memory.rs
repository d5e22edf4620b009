//! 메모리 저장소
//!
//! 스냅샷을 인코딩된 문자열로 보관하므로 직렬화 경로도 함께 검증됩니다.
//! 테스트용 저장 실패 주입을 지원합니다.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{snapshot, StateStore, StorageError, StudioState};

#[derive(Debug, Default)]
pub struct MemoryStore {
  snapshot: RwLock<Option<String>>,
  fail_on_save: AtomicBool,
  save_count: AtomicU64,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// true로 설정하면 이후 모든 저장이 `Unavailable`로 실패합니다.
  pub fn set_fail_on_save(&self, fail: bool) {
    self.fail_on_save.store(fail, Ordering::SeqCst);
  }

  /// 성공한 저장 횟수
  pub fn save_count(&self) -> u64 {
    self.save_count.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl StateStore for MemoryStore {
  async fn load(&self) -> Result<Option<StudioState>, StorageError> {
    match self.snapshot.read().await.as_deref() {
      Some(raw) => Ok(Some(snapshot::decode(raw)?)),
      None => Ok(None),
    }
  }

  async fn save(&self, state: &StudioState) -> Result<(), StorageError> {
    if self.fail_on_save.load(Ordering::SeqCst) {
      return Err(StorageError::Unavailable("메모리 저장소 저장 실패 (주입)".to_string()));
    }
    let raw = snapshot::encode(state, Utc::now())?;
    *self.snapshot.write().await = Some(raw);
    self.save_count.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Class;

  #[tokio::test]
  async fn test_empty_store_loads_none() {
    let store = MemoryStore::new();
    assert!(store.load().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_save_then_load() {
    let store = MemoryStore::new();
    let mut state = StudioState::new();
    state.insert_class(Class::new("c1", "Spin", 12, "main"));
    store.save(&state).await.unwrap();

    assert_eq!(store.load().await.unwrap(), Some(state));
    assert_eq!(store.save_count(), 1);
  }

  #[tokio::test]
  async fn test_injected_failure() {
    let store = MemoryStore::new();
    store.set_fail_on_save(true);
    let result = store.save(&StudioState::new()).await;
    assert!(matches!(result, Err(StorageError::Unavailable(_))));
    assert_eq!(store.save_count(), 0);
  }
}
