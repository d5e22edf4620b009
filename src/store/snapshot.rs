//! 버전 스냅샷 인코딩/디코딩
//!
//! 스냅샷 봉투 `{ version, saved_at, state }`. 알 수 없는 버전은 조용히
//! 읽지 않고 에러로 돌려보냅니다.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use super::{StorageError, StudioState};

/// 현재 스키마 버전
pub const SCHEMA_VERSION: u32 = 2;

/// 스냅샷 봉투
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
  pub version: u32,
  pub saved_at: DateTime<Utc>,
  pub state: serde_json::Value,
}

/// 현재 버전으로 인코딩
pub fn encode(state: &StudioState, saved_at: DateTime<Utc>) -> Result<String, StorageError> {
  let snapshot = Snapshot {
    version: SCHEMA_VERSION,
    saved_at,
    state: serde_json::to_value(state)?,
  };
  Ok(serde_json::to_string(&snapshot)?)
}

/// 디코딩 후 필요하면 마이그레이션
pub fn decode(raw: &str) -> Result<StudioState, StorageError> {
  let snapshot: Snapshot = serde_json::from_str(raw)?;
  migrate(snapshot)
}

/// 스냅샷을 현재 버전 상태로 변환
///
/// - v2: 그대로 사용
/// - v1: 품목 분류가 없던 버전. 분류는 집계 시 추론에 맡기고
///   수업별 예약 수 캐시를 다시 계산합니다.
pub fn migrate(snapshot: Snapshot) -> Result<StudioState, StorageError> {
  match snapshot.version {
    SCHEMA_VERSION => Ok(serde_json::from_value(snapshot.state)?),
    1 => {
      info!("v1 스냅샷 마이그레이션 (저장 시각: {})", snapshot.saved_at);
      let mut state: StudioState = serde_json::from_value(snapshot.state)?;
      state.recount_booked();
      Ok(state)
    }
    found => Err(StorageError::UnsupportedVersion {
      found,
      expected: SCHEMA_VERSION,
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{Booking, Class};
  use chrono::TimeZone;

  fn sample_state() -> StudioState {
    let mut state = StudioState::new();
    state.insert_class(Class::new("c1", "Spin", 2, "main"));
    let t = Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap();
    state.insert_booking(Booking::new("c1", "m1", "Mina", t));
    state
  }

  #[test]
  fn test_current_version_is_read_back() {
    let mut state = sample_state();
    state.recount_booked();
    let raw = encode(&state, Utc::now()).unwrap();
    assert_eq!(decode(&raw).unwrap(), state);
  }

  #[test]
  fn test_v1_snapshot_recounts_bookings() {
    // v1 스냅샷은 booked_count 캐시가 틀려 있을 수 있음
    let state = sample_state();
    let snapshot = Snapshot {
      version: 1,
      saved_at: Utc::now(),
      state: serde_json::to_value(&state).unwrap(),
    };
    let migrated = migrate(snapshot).unwrap();
    assert_eq!(migrated.class("c1").unwrap().booked_count, 1);
  }

  #[test]
  fn test_newer_version_is_rejected() {
    let raw = serde_json::json!({
      "version": SCHEMA_VERSION + 1,
      "saved_at": "2026-10-19T07:00:00Z",
      "state": {}
    })
    .to_string();
    match decode(&raw) {
      Err(StorageError::UnsupportedVersion { found, expected }) => {
        assert_eq!(found, SCHEMA_VERSION + 1);
        assert_eq!(expected, SCHEMA_VERSION);
      }
      other => panic!("unexpected result: {:?}", other),
    }
  }
}
