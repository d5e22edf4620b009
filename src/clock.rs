//! 시각 공급자
//!
//! 예약/출석 시각과 주 시작일 계산이 모두 이 트레이트를 거치므로
//! 테스트에서 시각을 고정할 수 있습니다.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// 시스템 시각
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// 고정 시각 (밀리초 단위로 이동 가능)
#[derive(Debug)]
pub struct FixedClock {
  millis: AtomicI64,
}

impl FixedClock {
  pub fn new(at: DateTime<Utc>) -> Self {
    Self {
      millis: AtomicI64::new(at.timestamp_millis()),
    }
  }

  pub fn set(&self, at: DateTime<Utc>) {
    self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
  }

  pub fn advance(&self, by: Duration) {
    self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
  }
}
