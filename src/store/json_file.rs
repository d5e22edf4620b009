//! JSON 스냅샷 파일 저장소
//!
//! 임시 파일에 쓴 뒤 rename 하여 저장 도중 실패해도 이전 스냅샷이 남도록 합니다.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use uuid::Uuid;

use super::{snapshot, StateStore, StorageError, StudioState};

pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn temp_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(|n| n.to_os_string())
      .unwrap_or_default();
    // 저장마다 다른 임시 파일 (여러 writer가 같은 경로를 써도 임시 파일은 겹치지 않음)
    name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    self.path.with_file_name(name)
  }
}

#[async_trait]
impl StateStore for JsonFileStore {
  async fn load(&self) -> Result<Option<StudioState>, StorageError> {
    match tokio::fs::read_to_string(&self.path).await {
      Ok(raw) => Ok(Some(snapshot::decode(&raw)?)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn save(&self, state: &StudioState) -> Result<(), StorageError> {
    let raw = snapshot::encode(state, Utc::now())?;
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }
    let temp = self.temp_path();
    let written = match tokio::fs::write(&temp, raw.as_bytes()).await {
      Ok(()) => tokio::fs::rename(&temp, &self.path).await,
      Err(e) => Err(e),
    };
    if let Err(e) = written {
      let _ = tokio::fs::remove_file(&temp).await;
      return Err(e.into());
    }
    debug!("스냅샷 저장 완료: {} ({} bytes)", self.path.display(), raw.len());
    Ok(())
  }
}
