//! 예약 및 대기자 모델

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 예약 상태
///
/// `booked`에서만 다른 상태로 전이할 수 있습니다.
/// `checked-in`, `cancelled`, `no-show`는 종료 상태입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
  /// 예약됨
  Booked,
  /// 출석 완료 (크레딧 차감됨)
  CheckedIn,
  /// 노쇼
  NoShow,
  /// 취소됨
  Cancelled,
}

impl BookingStatus {
  /// 정원을 점유하는 상태인지 확인
  pub fn is_active(self) -> bool {
    matches!(self, BookingStatus::Booked | BookingStatus::CheckedIn)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      BookingStatus::Booked => "booked",
      BookingStatus::CheckedIn => "checked-in",
      BookingStatus::NoShow => "no-show",
      BookingStatus::Cancelled => "cancelled",
    }
  }
}

impl std::fmt::Display for BookingStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// 수업 예약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
  /// 예약 고유 ID
  pub id: String,
  /// 수업 ID
  pub class_id: String,
  /// 예약자 ID
  pub person_id: String,
  /// 예약 시점의 예약자 이름
  pub person_name: String,
  /// 예약 상태
  pub status: BookingStatus,
  /// 예약 시각
  pub booked_at: DateTime<Utc>,
  /// 출석 시각 (출석 시에만 기록)
  pub checked_in_at: Option<DateTime<Utc>>,
}

impl Booking {
  /// `booked` 상태의 새 예약 생성
  pub fn new(
    class_id: impl Into<String>,
    person_id: impl Into<String>,
    person_name: impl Into<String>,
    booked_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      class_id: class_id.into(),
      person_id: person_id.into(),
      person_name: person_name.into(),
      status: BookingStatus::Booked,
      booked_at,
      checked_in_at: None,
    }
  }

  pub fn is_active(&self) -> bool {
    self.status.is_active()
  }
}

/// 대기자 명단 항목 (수업별 FIFO)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
  pub id: String,
  pub class_id: String,
  pub person_id: String,
  pub person_name: String,
  pub added_at: DateTime<Utc>,
}

impl WaitlistEntry {
  pub fn new(
    class_id: impl Into<String>,
    person_id: impl Into<String>,
    person_name: impl Into<String>,
    added_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      class_id: class_id.into(),
      person_id: person_id.into(),
      person_name: person_name.into(),
      added_at,
    }
  }
}
