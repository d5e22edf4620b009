//! 수업(Class) 모델
//!
//! 요일/시작 시각/정원이 고정된 정기 수업을 표현합니다.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// 정기 수업
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
  /// 수업 고유 ID
  pub id: String,
  /// 수업 이름 (예: "Morning Flow")
  pub name: String,
  /// 수업 종류 (예: "yoga", "hiit")
  pub class_type: String,
  /// 요일
  pub day_of_week: Weekday,
  /// 시작 시각
  pub start_time: NaiveTime,
  /// 진행 시간 (분)
  pub duration_minutes: u32,
  /// 정원 (양의 정수)
  pub capacity: u32,
  /// 담당 코치 ID
  pub coach_id: String,
  /// 지점
  pub location: String,
  /// 활성 예약(booked, checked-in) 수 캐시
  #[serde(default)]
  pub booked_count: u32,
}

impl Class {
  /// 새 수업 생성
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    capacity: u32,
    location: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      class_type: "general".to_string(),
      day_of_week: Weekday::Mon,
      start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
      duration_minutes: 60,
      capacity,
      coach_id: String::new(),
      location: location.into(),
      booked_count: 0,
    }
  }

  /// 정원이 찼는지 확인
  pub fn is_full(&self) -> bool {
    self.booked_count >= self.capacity
  }

  /// 남은 자리 수
  pub fn remaining_spots(&self) -> u32 {
    self.capacity.saturating_sub(self.booked_count)
  }
}
