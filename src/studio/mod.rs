/**
* filename : mod
* author : HAMA
* date: 2026. 10. 19.
* description: 스튜디오 서비스 (작업 직렬화, 영속화, 결과 메시지)
**/

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::audit::AuditLogEntry;
use crate::booking::{BookingEngine, Cancellation, CheckIn, CreditDebit, Promotion};
use crate::clock::Clock;
use crate::commission::{self, CommissionRates, CommissionReport, LocationFilter};
use crate::error::{OperationError, OperationResult};
use crate::model::{Booking, Class, Transaction, WaitlistEntry};
use crate::pos::{self, SaleRequest};
use crate::store::{StateStore, StorageError, StudioState};

/// 여러 태스크가 공유하는 스튜디오
pub type SharedStudio = Arc<Mutex<Studio>>;

/// 수업 조회 뷰
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassView {
  pub class: Class,
  pub remaining_spots: u32,
  pub is_full: bool,
  pub bookings: Vec<Booking>,
  pub waitlist: Vec<WaitlistEntry>,
}

/// 스튜디오 서비스
///
/// 모든 변경 작업은 현재 상태의 사본 위에서 실행되고, 저장소에 저장된 뒤에만
/// 현재 상태로 교체됩니다. 저장이 실패하면 상태는 그대로이고 `StorageError`를 돌려줍니다.
pub struct Studio {
  state: StudioState,
  store: Arc<dyn StateStore>,
  clock: Arc<dyn Clock>,
  rates: CommissionRates,
}

impl Studio {
  /// 저장소의 마지막 스냅샷으로 시작합니다. 스냅샷이 없으면 빈 스튜디오.
  pub async fn open(
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    rates: CommissionRates,
  ) -> Result<Self, StorageError> {
    let state = match store.load().await? {
      Some(state) => {
        info!("저장된 스튜디오 상태 로드 완료");
        state
      }
      None => {
        info!("저장된 상태 없음, 빈 스튜디오로 시작");
        StudioState::new()
      }
    };
    Ok(Self::with_state(state, store, clock, rates))
  }

  /// 주어진 상태로 시작합니다. 예약 수 캐시는 예약 목록에서 다시 계산합니다.
  pub fn with_state(
    mut state: StudioState,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    rates: CommissionRates,
  ) -> Self {
    state.recount_booked();
    for class_id in state.capacity_violations() {
      warn!("정원 초과 상태로 로드된 수업: {}", class_id);
    }
    Self {
      state,
      store,
      clock,
      rates,
    }
  }

  pub fn into_shared(self) -> SharedStudio {
    Arc::new(Mutex::new(self))
  }

  /// 현재 상태 (읽기 전용)
  pub fn state(&self) -> &StudioState {
    &self.state
  }

  /// 사본에 작업을 적용하고 저장에 성공하면 교체합니다.
  ///
  /// 도메인 거부는 아무것도 바꾸지 않으므로 저장하지 않습니다.
  async fn apply<T>(
    &mut self,
    operation: &'static str,
    f: impl FnOnce(&mut StudioState, DateTime<Utc>) -> Result<T, OperationError>,
  ) -> Result<Result<T, OperationError>, StorageError> {
    let now = self.clock.now();
    let mut draft = self.state.clone();

    let value = match f(&mut draft, now) {
      Ok(value) => value,
      Err(e) => {
        debug!("{} 거부: {}", operation, e);
        return Ok(Err(e));
      }
    };

    if let Err(e) = self.store.save(&draft).await {
      error!("{} 저장 실패, 변경 취소: {}", operation, e);
      return Err(e);
    }
    self.state = draft;
    Ok(Ok(value))
  }

  fn class_name(&self, class_id: &str) -> String {
    self
      .state
      .class(class_id)
      .map(|c| c.name.clone())
      .unwrap_or_else(|| class_id.to_string())
  }

  // ---- 예약 ----

  /// 수업 예약
  pub async fn book_class(
    &mut self,
    class_id: &str,
    person_id: &str,
    person_name: &str,
  ) -> Result<OperationResult<Booking>, StorageError> {
    let outcome = self
      .apply("book_class", |state, now| {
        BookingEngine::new(state, now).book_class(class_id, person_id, person_name)
      })
      .await?;

    Ok(match outcome {
      Ok(booking) => {
        let message = format!("Booked {} into {}", booking.person_name, self.class_name(class_id));
        OperationResult::ok(message, booking)
      }
      Err(e) => OperationResult::failed(&e),
    })
  }

  /// 대기자 등록
  pub async fn add_to_waitlist(
    &mut self,
    class_id: &str,
    person_id: &str,
    person_name: &str,
  ) -> Result<OperationResult<WaitlistEntry>, StorageError> {
    let outcome = self
      .apply("add_to_waitlist", |state, now| {
        BookingEngine::new(state, now).add_to_waitlist(class_id, person_id, person_name)
      })
      .await?;

    Ok(match outcome {
      Ok(entry) => {
        let position = self.state.waitlist_for_class(class_id).len();
        let message = format!(
          "Added {} to the waitlist for {} (position {})",
          entry.person_name,
          self.class_name(class_id),
          position
        );
        OperationResult::ok(message, entry)
      }
      Err(e) => OperationResult::failed(&e),
    })
  }

  /// 예약 취소 및 대기자 승격
  pub async fn cancel_booking(
    &mut self,
    booking_id: &str,
  ) -> Result<OperationResult<Cancellation>, StorageError> {
    let outcome = self
      .apply("cancel_booking", |state, now| {
        BookingEngine::new(state, now).cancel_booking(booking_id)
      })
      .await?;

    Ok(match outcome {
      Ok(cancellation) => {
        let mut message = format!(
          "Cancelled booking for {} in {}",
          cancellation.booking.person_name,
          self.class_name(&cancellation.booking.class_id)
        );
        match &cancellation.promotion {
          Some(Promotion::Booked { booking }) => {
            message.push_str(&format!("; promoted {} from the waitlist", booking.person_name));
          }
          Some(Promotion::Dropped { entry, reason }) => {
            message.push_str(&format!(
              "; {} could not be promoted ({}) and was removed from the waitlist",
              entry.person_name, reason
            ));
          }
          None => {}
        }
        OperationResult::ok(message, cancellation)
      }
      Err(e) => OperationResult::failed(&e),
    })
  }

  /// 출석 처리 및 크레딧 차감
  pub async fn check_in_member(
    &mut self,
    booking_id: &str,
  ) -> Result<OperationResult<CheckIn>, StorageError> {
    let outcome = self
      .apply("check_in_member", |state, now| {
        BookingEngine::new(state, now).check_in_member(booking_id)
      })
      .await?;

    Ok(match outcome {
      Ok(check_in) => {
        let detail = match &check_in.debit {
          CreditDebit::ClassPack { remaining_classes } => {
            format!("{} classes left on pack", remaining_classes)
          }
          CreditDebit::ClassPackEmpty => "class pack is empty".to_string(),
          CreditDebit::WeeklyUsage { count, .. } => format!("class {} this week", count),
          CreditDebit::NoBalance => "no balance to debit".to_string(),
        };
        let message = format!(
          "Checked in {} to {} ({})",
          check_in.booking.person_name,
          self.class_name(&check_in.booking.class_id),
          detail
        );
        OperationResult::ok(message, check_in)
      }
      Err(e) => OperationResult::failed(&e),
    })
  }

  /// 노쇼 처리
  pub async fn mark_no_show(
    &mut self,
    booking_id: &str,
  ) -> Result<OperationResult<Booking>, StorageError> {
    let outcome = self
      .apply("mark_no_show", |state, now| {
        BookingEngine::new(state, now).mark_no_show(booking_id)
      })
      .await?;

    Ok(match outcome {
      Ok(booking) => {
        let message = format!(
          "Marked {} as a no-show for {}",
          booking.person_name,
          self.class_name(&booking.class_id)
        );
        OperationResult::ok(message, booking)
      }
      Err(e) => OperationResult::failed(&e),
    })
  }

  // ---- POS ----

  pub async fn record_sale(
    &mut self,
    request: &SaleRequest,
  ) -> Result<OperationResult<Transaction>, StorageError> {
    let outcome = self
      .apply("record_sale", |state, now| pos::record_sale(state, now, request))
      .await?;

    Ok(match outcome {
      Ok(transaction) => {
        let message = format!("Recorded sale of {:.2}", transaction.total);
        OperationResult::ok(message, transaction)
      }
      Err(e) => OperationResult::failed(&e),
    })
  }

  // ---- 조회 ----

  pub fn classes(&self) -> Vec<Class> {
    self.state.classes().cloned().collect()
  }

  pub fn class_view(&self, class_id: &str) -> Option<ClassView> {
    let class = self.state.class(class_id)?.clone();
    Some(ClassView {
      remaining_spots: class.remaining_spots(),
      is_full: class.is_full(),
      bookings: self
        .state
        .bookings_for_class(class_id)
        .into_iter()
        .cloned()
        .collect(),
      waitlist: self.waitlist(class_id),
      class,
    })
  }

  pub fn booking(&self, booking_id: &str) -> Option<Booking> {
    self.state.booking(booking_id).cloned()
  }

  /// 이용자의 예약 이력 (예약 시각 순)
  pub fn bookings_for_person(&self, person_id: &str) -> Vec<Booking> {
    self
      .state
      .bookings_for_person(person_id)
      .into_iter()
      .cloned()
      .collect()
  }

  pub fn waitlist(&self, class_id: &str) -> Vec<WaitlistEntry> {
    self
      .state
      .waitlist_for_class(class_id)
      .into_iter()
      .cloned()
      .collect()
  }

  /// 감사 로그 (엔티티 ID로 필터 가능)
  pub fn audit_log(&self, entity_id: Option<&str>) -> Vec<AuditLogEntry> {
    let log = self.state.audit_log();
    match entity_id {
      Some(id) => log.for_entity(id).cloned().collect(),
      None => log.entries().to_vec(),
    }
  }

  pub fn commission_report(
    &self,
    seller_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> CommissionReport {
    commission::commission_report(&self.state, &self.rates, seller_id, start, end)
  }

  pub fn all_commission_reports(
    &self,
    location: &LocationFilter,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Vec<CommissionReport> {
    commission::all_commission_reports(&self.state, &self.rates, location, start, end)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::FixedClock;
  use crate::error::ErrorCode;
  use crate::model::BookingStatus;
  use crate::store::MemoryStore;
  use chrono::TimeZone;

  fn studio(store: Arc<MemoryStore>) -> Studio {
    let mut state = StudioState::new();
    state.insert_class(Class::new("yoga", "Morning Yoga", 1, "main"));
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap()));
    Studio::with_state(state, store, clock, CommissionRates::default())
  }

  #[tokio::test]
  async fn test_success_is_persisted() {
    let store = Arc::new(MemoryStore::new());
    let mut studio = studio(store.clone());

    let result = studio.book_class("yoga", "m1", "Mina").await.unwrap();
    assert!(result.success);
    assert_eq!(result.message, "Booked Mina into Morning Yoga");
    assert_eq!(store.save_count(), 1);

    let saved = store.load().await.unwrap().unwrap();
    assert_eq!(&saved, studio.state());
    assert!(studio.class_view("yoga").unwrap().is_full);
  }

  #[tokio::test]
  async fn test_booking_and_person_history_views() {
    let store = Arc::new(MemoryStore::new());
    let mut studio = studio(store);

    let booking = studio.book_class("yoga", "m1", "Mina").await.unwrap().data.unwrap();
    studio.cancel_booking(&booking.id).await.unwrap();
    let rebooked = studio.book_class("yoga", "m1", "Mina").await.unwrap().data.unwrap();

    assert_eq!(studio.booking(&booking.id).unwrap().status, BookingStatus::Cancelled);
    assert!(studio.booking("missing").is_none());

    let history = studio.bookings_for_person("m1");
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|b| b.id == rebooked.id && b.is_active()));
    assert!(studio.bookings_for_person("nobody").is_empty());
  }

  #[tokio::test]
  async fn test_rejection_is_not_persisted() {
    let store = Arc::new(MemoryStore::new());
    let mut studio = studio(store.clone());

    studio.book_class("yoga", "m1", "Mina").await.unwrap();
    let full = studio.book_class("yoga", "m2", "Jun").await.unwrap();

    assert!(!full.success);
    assert!(full.is_code(ErrorCode::ClassFull));
    assert_eq!(store.save_count(), 1);
  }

  #[tokio::test]
  async fn test_storage_failure_leaves_state_unchanged() {
    let store = Arc::new(MemoryStore::new());
    let mut studio = studio(store.clone());
    let before = studio.state().clone();

    store.set_fail_on_save(true);
    let result = studio.book_class("yoga", "m1", "Mina").await;

    assert!(matches!(result, Err(StorageError::Unavailable(_))));
    assert_eq!(studio.state(), &before);
    assert_eq!(studio.class_view("yoga").unwrap().remaining_spots, 1);
  }

  #[tokio::test]
  async fn test_cancel_message_reports_promotion() {
    let store = Arc::new(MemoryStore::new());
    let mut studio = studio(store);

    let booking = studio.book_class("yoga", "m1", "Mina").await.unwrap().data.unwrap();
    studio.add_to_waitlist("yoga", "m2", "Jun").await.unwrap();
    let result = studio.cancel_booking(&booking.id).await.unwrap();

    assert!(result.success);
    assert!(result.message.ends_with("promoted Jun from the waitlist"));
    assert!(studio.waitlist("yoga").is_empty());
    assert_eq!(studio.audit_log(Some(&booking.id)).len(), 2);
  }
}
